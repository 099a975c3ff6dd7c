use crate::game::state::{PlayerProfile, StatePatch, WorldState};

/// Reserved target that ends the game.
pub const QUIT: &str = "quit";
/// Reserved target that starts a fresh round.
pub const RESTART: &str = "restart";

/// Whether `id` is one of the reserved terminal signals rather than a node.
pub fn is_terminal(id: &str) -> bool {
    id == QUIT || id == RESTART
}

/// Invoked with the trimmed line captured by a text-input node.
pub type InputHandler = fn(&mut PlayerProfile, &str);

/// A fully resolved node, built fresh on every visit.
#[derive(Debug, Clone)]
pub struct NodeDescriptor {
    /// Always the id the node was resolved with.
    pub id: String,
    pub body: NodeBody,
}

impl NodeDescriptor {
    pub fn text(&self) -> &str {
        &self.body.text
    }

    /// Declared choices, before any filtering. Empty for text-input nodes.
    pub fn choices(&self) -> &[ChoiceDescriptor] {
        match &self.body.node_type {
            NodeType::Menu(choices) => choices,
            NodeType::TextInput(_) => &[],
        }
    }
}

/// What a catalog entry produces: everything about a node except its id,
/// which the catalog stamps on.
#[derive(Debug, Clone)]
pub struct NodeBody {
    /// Display text, may contain `**bold**` / `*italic*` markers.
    pub text: String,
    pub node_type: NodeType,
    /// Presentation hint only; the console has no back button.
    pub hide_back_button: bool,
}

impl NodeBody {
    pub fn menu(text: impl Into<String>, choices: Vec<ChoiceDescriptor>) -> Self {
        Self {
            text: text.into(),
            node_type: NodeType::Menu(choices),
            hide_back_button: false,
        }
    }

    pub fn text_input(text: impl Into<String>, input: TextInput) -> Self {
        Self {
            text: text.into(),
            node_type: NodeType::TextInput(input),
            hide_back_button: false,
        }
    }

    pub fn hide_back_button(mut self) -> Self {
        self.hide_back_button = true;
        self
    }
}

#[derive(Debug, Clone)]
pub enum NodeType {
    /// Numbered menu of choices (possibly empty).
    Menu(Vec<ChoiceDescriptor>),
    /// Single line of free text, then a fixed transition.
    TextInput(TextInput),
}

#[derive(Debug, Clone)]
pub struct TextInput {
    pub prompt: String,
    pub next_id: String,
    pub after_input: Option<InputHandler>,
}

impl TextInput {
    pub fn new(prompt: impl Into<String>, next_id: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            next_id: next_id.into(),
            after_input: None,
        }
    }

    pub fn after_input(mut self, handler: InputHandler) -> Self {
        self.after_input = Some(handler);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ChoiceDescriptor {
    pub text: String,
    pub required_state: Option<Condition>,
    pub set_state: Option<StatePatch>,
    pub next_id: String,
}

impl ChoiceDescriptor {
    pub fn new(text: impl Into<String>, next_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            required_state: None,
            set_state: None,
            next_id: next_id.into(),
        }
    }

    pub fn requires(mut self, condition: Condition) -> Self {
        self.required_state = Some(condition);
        self
    }

    pub fn sets(mut self, patch: StatePatch) -> Self {
        self.set_state = Some(patch);
        self
    }
}

/// Predicate over the world state that gates a choice.
#[derive(Debug, Clone)]
pub enum Condition {
    /// The flag holds `true`.
    FlagSet(String),
}

impl Condition {
    pub fn flag_set(key: impl Into<String>) -> Self {
        Condition::FlagSet(key.into())
    }

    pub fn evaluate(&self, state: &WorldState) -> bool {
        match self {
            Condition::FlagSet(key) => state.flag(key),
        }
    }
}
