use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A decision by the active player.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Give up the pot
    Fold,
    /// Match the opponent's street total
    Call,
    /// Pass with nothing to call
    Check,
    /// Raise to an absolute street total (not an increment)
    Raise(u32),
}

/// The payload-free tag of an [`Action`], used for legality sets.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum ActionKind {
    Fold,
    Call,
    Check,
    Raise,
}

/// The moves open to the active player, in a stable order.
pub type LegalActions = BTreeSet<ActionKind>;

impl Action {
    pub const fn kind(self) -> ActionKind {
        match self {
            Action::Fold => ActionKind::Fold,
            Action::Call => ActionKind::Call,
            Action::Check => ActionKind::Check,
            Action::Raise(_) => ActionKind::Raise,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => write!(f, "folds"),
            Action::Call => write!(f, "calls"),
            Action::Check => write!(f, "checks"),
            Action::Raise(amount) => write!(f, "raises to {amount}"),
        }
    }
}
