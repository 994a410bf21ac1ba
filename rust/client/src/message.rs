//! Logical messages exchanged with a bot.
//!
//! Every request and reply is a JSON object tagged by `type`. Cards travel as
//! their short text form (`"5s"`); actions as `{"action": "raise", "amount": 8}`.
use std::collections::VecDeque;

use arena_engine::action::Action;
use arena_engine::cards::Card;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Fold,
    Call,
    Check,
    Raise,
    /// Anything a bot sends that we do not recognise
    #[serde(other)]
    Unknown,
}

/// An [`Action`] as it appears on the wire. `amount` is only meaningful for
/// raises and is the absolute street total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireAction {
    pub action: ActionType,
    #[serde(default)]
    pub amount: u32,
}

impl From<Action> for WireAction {
    fn from(action: Action) -> Self {
        let (action, amount) = match action {
            Action::Fold => (ActionType::Fold, 0),
            Action::Call => (ActionType::Call, 0),
            Action::Check => (ActionType::Check, 0),
            Action::Raise(amount) => (ActionType::Raise, amount),
        };
        Self { action, amount }
    }
}

impl WireAction {
    /// `None` for unknown action types.
    pub fn to_action(self) -> Option<Action> {
        match self.action {
            ActionType::Fold => Some(Action::Fold),
            ActionType::Call => Some(Action::Call),
            ActionType::Check => Some(Action::Check),
            ActionType::Raise => Some(Action::Raise(self.amount)),
            ActionType::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    ReadyCheck {
        player_names: Vec<String>,
    },
    RequestAction {
        /// Seconds the player has left
        game_clock: f64,
        player_hand: Vec<String>,
        board_cards: Vec<String>,
        new_actions: Vec<WireAction>,
    },
    EndRound {
        player_hand: Vec<String>,
        opponent_hand: Vec<String>,
        board_cards: Vec<String>,
        new_actions: Vec<WireAction>,
        delta: i32,
        is_match_over: bool,
    },
}

impl Request {
    pub fn kind(&self) -> &'static str {
        match self {
            Request::ReadyCheck { .. } => "ready_check",
            Request::RequestAction { .. } => "request_action",
            Request::EndRound { .. } => "end_round",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    Ready {
        ready: bool,
    },
    Action {
        action: WireAction,
    },
    Logs {
        #[serde(default)]
        logs: Vec<String>,
    },
}

/// A request plus the caller's credentials; what actually goes on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(flatten)]
    pub request: Request,
}

pub fn cards_to_wire(cards: &[Card]) -> Vec<String> {
    cards.iter().map(Card::to_string).collect()
}

/// Empty `queue` into wire actions, oldest first.
pub fn drain_actions(queue: &mut VecDeque<Action>) -> Vec<WireAction> {
    queue.drain(..).map(WireAction::from).collect()
}
