use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::console::{strip_emphasis, Console};
use crate::game::catalog::{NodeCatalog, NodeNotFoundError};
use crate::game::choice::{apply_choice, available_choices, parse_selection};
use crate::game::node::{ChoiceDescriptor, NodeDescriptor, NodeType, TextInput, QUIT};
use crate::game::state::Session;

/// Accepted (case-insensitively) at a node with nothing to choose.
pub const QUIT_TOKEN: &str = "q";

const MENU_PROMPT: &str = "> ";
const SEPARATOR_WIDTH: usize = 25;

/// How a single turn ended.
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// Moved on. `choice` is set only when a menu entry was picked.
    Advanced {
        next_id: String,
        choice: Option<ChoiceDescriptor>,
    },
    /// The node id was not in the catalog.
    NodeMissing(NodeNotFoundError),
    /// Input ran out while waiting for the player.
    InputClosed,
}

impl TurnOutcome {
    /// Where to go next. Failures degrade to `quit`.
    pub fn next_id(&self) -> &str {
        match self {
            TurnOutcome::Advanced { next_id, .. } => next_id,
            TurnOutcome::NodeMissing(_) | TurnOutcome::InputClosed => QUIT,
        }
    }

    pub fn choice(&self) -> Option<&ChoiceDescriptor> {
        match self {
            TurnOutcome::Advanced { choice, .. } => choice.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug)]
enum TurnState {
    Rendering,
    AwaitingFreeTextInput(TextInput),
    AwaitingChoiceSelection(Vec<ChoiceDescriptor>),
    Resolved(TurnOutcome),
    Error(NodeNotFoundError),
}

/// Plays one node: resolve, render, read input, transition.
pub struct NodeRunner<'a, C: Console> {
    catalog: &'a NodeCatalog,
    console: &'a mut C,
    title: &'a str,
}

impl<'a, C: Console> NodeRunner<'a, C> {
    pub fn new(catalog: &'a NodeCatalog, console: &'a mut C, title: &'a str) -> Self {
        Self {
            catalog,
            console,
            title,
        }
    }

    /// Run one turn at `node_id`.
    ///
    /// Bad input never ends the turn; it re-prompts. Only I/O failures are
    /// returned as errors.
    pub fn run_turn(&mut self, node_id: &str, session: &mut Session) -> Result<TurnOutcome> {
        let mut state = TurnState::Rendering;
        loop {
            debug!("Node '{node_id}': {state:?}");
            state = match state {
                TurnState::Rendering => {
                    match self.catalog.resolve(node_id, &session.world, &session.player) {
                        Ok(node) => {
                            self.render(&node)?;
                            let choices: Vec<ChoiceDescriptor> =
                                available_choices(&node, &session.world)
                                    .into_iter()
                                    .cloned()
                                    .collect();
                            match node.body.node_type {
                                NodeType::TextInput(input) => {
                                    TurnState::AwaitingFreeTextInput(input)
                                }
                                NodeType::Menu(_) => TurnState::AwaitingChoiceSelection(choices),
                            }
                        }
                        Err(err) => TurnState::Error(err),
                    }
                }
                TurnState::AwaitingFreeTextInput(input) => self.read_text(input, session)?,
                TurnState::AwaitingChoiceSelection(choices) => {
                    self.read_selection(node_id, choices, session)?
                }
                TurnState::Resolved(outcome) => return Ok(outcome),
                TurnState::Error(err) => {
                    debug!("Lookup failed: {err}");
                    self.console
                        .write_line(&format!("Error: Node '{}' not found!", err.id))?;
                    return Ok(TurnOutcome::NodeMissing(err));
                }
            };
        }
    }

    fn render(&mut self, node: &NodeDescriptor) -> Result<()> {
        debug!(
            "Rendering '{}' (hide_back_button={})",
            node.id, node.body.hide_back_button
        );
        self.console.clear_screen()?;
        self.console.write_line(&format!("--- {} ---", self.title))?;
        self.console.write_line(&strip_emphasis(node.text()))?;
        self.console.write_line(&"-".repeat(SEPARATOR_WIDTH))
    }

    fn read_text(&mut self, input: TextInput, session: &mut Session) -> Result<TurnState> {
        let Some(line) = self.console.read_line(&input.prompt)? else {
            warn!("Input closed at text prompt");
            return Ok(TurnState::Resolved(TurnOutcome::InputClosed));
        };

        if let Some(handler) = input.after_input {
            handler(&mut session.player, line.trim());
            info!("Player profile now: {:?}", session.player);
        }

        Ok(TurnState::Resolved(TurnOutcome::Advanced {
            next_id: input.next_id,
            choice: None,
        }))
    }

    fn read_selection(
        &mut self,
        node_id: &str,
        choices: Vec<ChoiceDescriptor>,
        session: &mut Session,
    ) -> Result<TurnState> {
        if choices.is_empty() {
            return self.read_quit_token();
        }

        for (i, choice) in choices.iter().enumerate() {
            self.console
                .write_line(&format!("{}. {}", i + 1, strip_emphasis(&choice.text)))?;
        }

        loop {
            let Some(line) = self.console.read_line(MENU_PROMPT)? else {
                warn!("Input closed at menu of '{node_id}'");
                return Ok(TurnState::Resolved(TurnOutcome::InputClosed));
            };

            let index = match parse_selection(&line, choices.len()) {
                Ok(index) => index,
                Err(err) => {
                    debug!("Rejected selection {:?}: {err:?}", line.trim());
                    self.console.write_line(&err.to_string())?;
                    continue;
                }
            };

            let choice = choices[index].clone();
            let next_id = apply_choice(&choice, &mut session.world).to_string();
            if let Some(patch) = &choice.set_state {
                let shown = serde_json::to_string(patch).context("failed to render state patch")?;
                self.console
                    .write_line(&format!("(State updated: {shown})"))?;
            }

            return Ok(TurnState::Resolved(TurnOutcome::Advanced {
                next_id,
                choice: Some(choice),
            }));
        }
    }

    /// Dead end: nothing but the quit token gets the player out.
    fn read_quit_token(&mut self) -> Result<TurnState> {
        self.console.write_line("")?;
        self.console.write_line("There are no choices here.")?;
        self.console
            .write_line(&format!("{}. Quit", QUIT_TOKEN.to_uppercase()))?;

        loop {
            let Some(line) = self.console.read_line(MENU_PROMPT)? else {
                warn!("Input closed at dead end");
                return Ok(TurnState::Resolved(TurnOutcome::InputClosed));
            };
            if line.trim().eq_ignore_ascii_case(QUIT_TOKEN) {
                return Ok(TurnState::Resolved(TurnOutcome::Advanced {
                    next_id: QUIT.to_string(),
                    choice: None,
                }));
            }
            // Nothing is in range here, so every other line is rejected.
            if let Err(err) = parse_selection(&line, 0) {
                debug!("Rejected dead-end input {:?}: {err:?}", line.trim());
                self.console.write_line(&err.to_string())?;
            }
        }
    }
}
