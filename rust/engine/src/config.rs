use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// Largest accepted `starting_stack`. Both stacks together must fit the
/// signed deltas paid out at the end of a round.
pub const MAX_STARTING_STACK: u32 = i32::MAX as u32 / 2;

/// Fixed parameters of the variant. Threaded by value through every round
/// state instead of living in globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Chips each player starts every round with
    pub starting_stack: u32,
    pub big_blind: u32,
    pub small_blind: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_stack: 400,
            big_blind: 2,
            small_blind: 1,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.small_blind == 0 || self.big_blind == 0 {
            return Err(GameError::InvalidConfig("blinds must be >0".into()));
        }
        if self.small_blind > self.big_blind {
            return Err(GameError::InvalidConfig(
                "small_blind must not exceed big_blind".into(),
            ));
        }
        if self.starting_stack <= self.big_blind {
            return Err(GameError::InvalidConfig(
                "starting_stack must exceed big_blind".into(),
            ));
        }
        if self.starting_stack > MAX_STARTING_STACK {
            return Err(GameError::InvalidConfig(format!(
                "starting_stack must not exceed {MAX_STARTING_STACK}"
            )));
        }
        Ok(())
    }
}
