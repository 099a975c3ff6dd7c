use crate::game::catalog::NodeCatalog;
use crate::game::node::{ChoiceDescriptor, Condition, NodeBody, TextInput, QUIT, RESTART};
use crate::game::state::{PlayerProfile, StatePatch, WorldState, DEFAULT_PLAYER_NAME};

pub const ENTRY_NODE: &str = "intro";

const HAS_KEY: &str = "hasKey";

// ---------------------------------------------------------------------------
// The Simple Choice
// ---------------------------------------------------------------------------

pub fn simple_choice_catalog() -> NodeCatalog {
    let mut catalog = NodeCatalog::new();
    catalog
        .register("intro", intro)
        .register("askName", ask_name)
        .register("greeting", greeting)
        .register("redRoom", red_room)
        .register("blueRoom", blue_room)
        .register("secretEnding", secret_ending)
        .register("deadEnd", dead_end);
    catalog
}

fn intro(_: &WorldState, _: &PlayerProfile) -> NodeBody {
    NodeBody::menu(
        "Welcome! This is a tiny demonstration.\n\nPlease make  a choice.",
        vec![ChoiceDescriptor::new("Next", "askName")],
    )
    .hide_back_button()
}

fn ask_name(_: &WorldState, _: &PlayerProfile) -> NodeBody {
    NodeBody::text_input(
        "What is your name?",
        TextInput::new("Enter your name: ", "greeting").after_input(set_player_name),
    )
}

/// Input arrives trimmed; nothing left means keep the default name.
fn set_player_name(player: &mut PlayerProfile, input: &str) {
    player.name = if input.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        input.to_string()
    };
}

fn greeting(_: &WorldState, player: &PlayerProfile) -> NodeBody {
    NodeBody::menu(
        format!(
            "Hello, **{}**! You find yourself in a room with two doors.\n\
             One is *red*, the other is *blue*.",
            player.name
        ),
        vec![
            ChoiceDescriptor::new("Open the red door", "redRoom"),
            ChoiceDescriptor::new("Open the blue door", "blueRoom"),
        ],
    )
}

fn red_room(_: &WorldState, _: &PlayerProfile) -> NodeBody {
    NodeBody::menu(
        "You enter a room that is entirely red. It feels warm.\n\
         There's nothing else obvious here.",
        vec![
            ChoiceDescriptor::new("Go back", "greeting"),
            ChoiceDescriptor::new("Check for secrets (requires key)", "secretEnding")
                .requires(Condition::flag_set(HAS_KEY)),
        ],
    )
}

fn blue_room(state: &WorldState, _: &PlayerProfile) -> NodeBody {
    if state.flag(HAS_KEY) {
        NodeBody::menu(
            "You are back in the blue room. It feels cool.\n\
             You already took the small key.",
            vec![ChoiceDescriptor::new("Go back", "greeting")],
        )
    } else {
        NodeBody::menu(
            "You enter a room that is entirely blue. It feels cool.\n\
             You find a small **key**!",
            vec![ChoiceDescriptor::new("Take the key and go back", "greeting")
                .sets(StatePatch::new().with(HAS_KEY, true))],
        )
    }
}

fn secret_ending(_: &WorldState, player: &PlayerProfile) -> NodeBody {
    NodeBody::menu(
        format!(
            "Using the key you found in the blue room, \
             you unlock a hidden panel in the red room!\n\n\
             **Congratulations, {}!** You found the secret exit!",
            player.name
        ),
        vec![
            ChoiceDescriptor::new("Play Again?", RESTART),
            ChoiceDescriptor::new("Quit", QUIT),
        ],
    )
}

fn dead_end(_: &WorldState, _: &PlayerProfile) -> NodeBody {
    NodeBody::menu("You reached a dead end with no choices.", vec![])
}
