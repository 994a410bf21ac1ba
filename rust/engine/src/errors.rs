use thiserror::Error;

use crate::action::ActionKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cannot deal {requested} cards, only {remaining} remain")]
    DeckExhausted { requested: usize, remaining: usize },
    #[error("Illegal action: {kind:?} is not available to the active player")]
    IllegalAction { kind: ActionKind },
    #[error("Raise to {amount} outside bounds [{min}, {max}]")]
    RaiseOutOfBounds { amount: u32, min: u32, max: u32 },
    #[error("Invalid card: '{0}'")]
    InvalidCard(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
