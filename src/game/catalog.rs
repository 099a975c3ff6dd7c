use std::collections::HashMap;

use thiserror::Error;

use crate::game::node::{is_terminal, NodeBody, NodeDescriptor, NodeType};
use crate::game::state::{PlayerProfile, WorldState};

/// Builds a node's content from the current state. Must not mutate anything.
pub type NodeFn = fn(&WorldState, &PlayerProfile) -> NodeBody;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("node '{id}' not found")]
pub struct NodeNotFoundError {
    pub id: String,
}

/// Registry of node builders keyed by node id.
///
/// Descriptors are never cached: every `resolve` runs the builder against the
/// state as it is right now, so text and choices track the world.
#[derive(Debug, Clone, Default)]
pub struct NodeCatalog {
    nodes: HashMap<String, NodeFn>,
}

impl NodeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the builder for `id`.
    pub fn register(&mut self, id: impl Into<String>, build: NodeFn) -> &mut Self {
        self.nodes.insert(id.into(), build);
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn resolve(
        &self,
        id: &str,
        state: &WorldState,
        player: &PlayerProfile,
    ) -> Result<NodeDescriptor, NodeNotFoundError> {
        let build = self
            .nodes
            .get(id)
            .ok_or_else(|| NodeNotFoundError { id: id.to_string() })?;

        Ok(NodeDescriptor {
            id: id.to_string(),
            body: build(state, player),
        })
    }

    /// `(node, target)` pairs whose target is neither registered nor a
    /// terminal signal, as seen from a fresh round. An unknown `entry_id` is
    /// reported with an empty node name.
    ///
    /// Targets that only appear under some other world state are not checked.
    pub fn dangling_targets(&self, entry_id: &str) -> Vec<(String, String)> {
        let state = WorldState::new();
        let player = PlayerProfile::default();
        let mut dangling = Vec::new();

        for id in self.ids() {
            let body = (self.nodes[id])(&state, &player);
            let targets: Vec<&str> = match &body.node_type {
                NodeType::Menu(choices) => choices.iter().map(|c| c.next_id.as_str()).collect(),
                NodeType::TextInput(input) => vec![input.next_id.as_str()],
            };
            for target in targets {
                if !is_terminal(target) && !self.contains(target) {
                    dangling.push((id.to_string(), target.to_string()));
                }
            }
        }

        if !is_terminal(entry_id) && !self.contains(entry_id) {
            dangling.push((String::new(), entry_id.to_string()));
        }

        dangling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::node::{ChoiceDescriptor, TextInput};
    use crate::game::state::StatePatch;

    fn lamp_room(state: &WorldState, _: &PlayerProfile) -> NodeBody {
        if state.flag("lampLit") {
            NodeBody::menu("The room is bright.", vec![ChoiceDescriptor::new("Leave", "hall")])
        } else {
            NodeBody::menu(
                "It is dark.",
                vec![ChoiceDescriptor::new("Light the lamp", "lampRoom")
                    .sets(StatePatch::new().with("lampLit", true))],
            )
        }
    }

    fn hall(_: &WorldState, player: &PlayerProfile) -> NodeBody {
        NodeBody::menu(
            format!("Hello, {}.", player.name),
            vec![ChoiceDescriptor::new("Enter", "lampRoom")],
        )
    }

    fn broken(_: &WorldState, _: &PlayerProfile) -> NodeBody {
        NodeBody::text_input("Say something", TextInput::new("> ", "nowhere"))
    }

    fn catalog() -> NodeCatalog {
        let mut catalog = NodeCatalog::new();
        catalog.register("hall", hall).register("lampRoom", lamp_room);
        catalog
    }

    #[test]
    fn test_resolve_stamps_requested_id() {
        let catalog = catalog();
        let node = catalog
            .resolve("lampRoom", &WorldState::new(), &PlayerProfile::default())
            .unwrap();
        assert_eq!(node.id, "lampRoom");
    }

    #[test]
    fn test_resolve_unknown_id() {
        let err = catalog()
            .resolve("attic", &WorldState::new(), &PlayerProfile::default())
            .unwrap_err();
        assert_eq!(err, NodeNotFoundError { id: "attic".into() });
        assert_eq!(err.to_string(), "node 'attic' not found");
    }

    #[test]
    fn test_resolve_tracks_state_changes() {
        let catalog = catalog();
        let player = PlayerProfile::default();
        let mut state = WorldState::new();

        let dark = catalog.resolve("lampRoom", &state, &player).unwrap();
        assert_eq!(dark.text(), "It is dark.");

        state.set(&StatePatch::new().with("lampLit", true));
        let bright = catalog.resolve("lampRoom", &state, &player).unwrap();
        assert_eq!(bright.text(), "The room is bright.");
    }

    #[test]
    fn test_resolve_is_repeatable() {
        let catalog = catalog();
        let state = WorldState::new();
        let player = PlayerProfile::default();

        let first = catalog.resolve("lampRoom", &state, &player).unwrap();
        let second = catalog.resolve("lampRoom", &state, &player).unwrap();

        assert_eq!(first.text(), second.text());
        let labels = |n: &NodeDescriptor| {
            n.choices()
                .iter()
                .map(|c| (c.text.clone(), c.next_id.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(labels(&first), labels(&second));
        assert!(state.is_empty());
    }

    #[test]
    fn test_resolve_reads_player_name() {
        let player = PlayerProfile {
            name: "Ada".into(),
        };
        let node = catalog().resolve("hall", &WorldState::new(), &player).unwrap();
        assert_eq!(node.text(), "Hello, Ada.");
    }

    #[test]
    fn test_ids_sorted() {
        assert_eq!(catalog().ids(), vec!["hall", "lampRoom"]);
    }

    #[test]
    fn test_dangling_targets() {
        let mut catalog = catalog();
        assert!(catalog.dangling_targets("hall").is_empty());

        catalog.register("broken", broken);
        assert_eq!(
            catalog.dangling_targets("hall"),
            vec![("broken".to_string(), "nowhere".to_string())]
        );
    }

    #[test]
    fn test_dangling_entry() {
        assert_eq!(
            catalog().dangling_targets("cellar"),
            vec![(String::new(), "cellar".to_string())]
        );
    }

    #[test]
    fn test_terminal_entry_is_not_dangling() {
        assert!(catalog().dangling_targets("quit").is_empty());
    }

    #[test]
    fn test_len_and_is_empty() {
        assert!(NodeCatalog::new().is_empty());
        assert_eq!(catalog().len(), 2);
    }
}
