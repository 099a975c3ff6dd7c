use log::debug;
use thiserror::Error;

use crate::game::node::{ChoiceDescriptor, NodeDescriptor};
use crate::game::state::WorldState;

/// Why a menu selection was rejected. Both are recovered by re-prompting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Please enter the number of your choice.")]
    InvalidFormat,
    #[error("Invalid choice number.")]
    OutOfRange,
}

/// The node's choices that are currently available, in declared order.
///
/// Display numbering is 1-based over this list only.
pub fn available_choices<'a>(
    node: &'a NodeDescriptor,
    state: &WorldState,
) -> Vec<&'a ChoiceDescriptor> {
    node.choices()
        .iter()
        .filter(|choice| {
            choice
                .required_state
                .as_ref()
                .map_or(true, |cond| cond.evaluate(state))
        })
        .collect()
}

/// Merge the choice's patch (if any) into `state` and return its target.
pub fn apply_choice<'a>(choice: &'a ChoiceDescriptor, state: &mut WorldState) -> &'a str {
    if let Some(patch) = &choice.set_state {
        debug!("Applying state patch from '{}': {:?}", choice.text, patch);
        state.set(patch);
    }
    &choice.next_id
}

/// Parse a menu selection against `count` available choices.
///
/// Surrounding whitespace is ignored. Returns the 0-based index.
pub fn parse_selection(input: &str, count: usize) -> Result<usize, SelectionError> {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SelectionError::InvalidFormat);
    }

    // Digits that overflow usize are simply too large.
    let n: usize = input.parse().map_err(|_| SelectionError::OutOfRange)?;
    if (1..=count).contains(&n) {
        Ok(n - 1)
    } else {
        Err(SelectionError::OutOfRange)
    }
}
