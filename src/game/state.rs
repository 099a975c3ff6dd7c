use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name used until the player enters one, and whenever they enter nothing.
pub const DEFAULT_PLAYER_NAME: &str = "Wanderer";

/// A single world flag value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        FlagValue::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        FlagValue::Int(value)
    }
}

impl From<i32> for FlagValue {
    fn from(value: i32) -> Self {
        FlagValue::Int(value.into())
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        FlagValue::Text(value.to_string())
    }
}

/// A partial world state. Merging it overwrites only the keys it names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatePatch(BTreeMap<String, FlagValue>);

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FlagValue)> {
        self.0.iter()
    }
}

/// Flags and progress for the current round.
///
/// Keys appear lazily as choices set them; reading a key that was never set
/// is not an error, it is simply absent (and reads as `false` via [`flag`]).
///
/// [`flag`]: WorldState::flag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    flags: BTreeMap<String, FlagValue>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        self.flags.get(key)
    }

    /// True only when `key` holds `Bool(true)`.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(FlagValue::Bool(true)))
    }

    /// Merge `patch` into the state. Keys not named in the patch are kept.
    pub fn set(&mut self, patch: &StatePatch) {
        for (key, value) in patch.iter() {
            self.flags.insert(key.clone(), value.clone());
        }
    }

    pub fn reset(&mut self) {
        self.flags.clear();
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// The player's profile. Only free-text input handlers mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
}

impl PlayerProfile {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            name: DEFAULT_PLAYER_NAME.to_string(),
        }
    }
}

/// Everything a round mutates. Reset at the start of each round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub world: WorldState,
    pub player: PlayerProfile,
}

impl Session {
    pub fn reset(&mut self) {
        self.world.reset();
        self.player.reset();
    }
}
