use crate::action::{Action, ActionKind};
use crate::errors::GameError;
use crate::round::RoundState;

/// Checks an action against the state's legal set and raise bounds.
///
/// [`RoundState::proceed`] trusts its input; callers that accept actions
/// from untrusted sources run them through here (or [`coerce_action`]) first.
///
/// # Errors
///
/// - [`GameError::IllegalAction`] - the action's kind is not legal here
/// - [`GameError::RaiseOutOfBounds`] - a raise target outside `raise_bounds`
///
/// # Examples
///
/// ```
/// use arena_engine::action::Action;
/// use arena_engine::config::GameConfig;
/// use arena_engine::deck::Deck;
/// use arena_engine::errors::GameError;
/// use arena_engine::round::RoundState;
/// use arena_engine::rules::validate_action;
///
/// let state = RoundState::new_round(GameConfig::default(), Deck::new_with_seed(9)).unwrap();
/// assert_eq!(validate_action(&state, Action::Call), Ok(Action::Call));
/// assert!(matches!(
///     validate_action(&state, Action::Raise(3)),
///     Err(GameError::RaiseOutOfBounds { min: 4, max: 400, .. })
/// ));
/// ```
pub fn validate_action(state: &RoundState, action: Action) -> Result<Action, GameError> {
    let kind = action.kind();
    if !state.legal_actions().contains(&kind) {
        return Err(GameError::IllegalAction { kind });
    }
    if let Action::Raise(amount) = action {
        let (min, max) = state.raise_bounds();
        if amount < min || amount > max {
            return Err(GameError::RaiseOutOfBounds { amount, min, max });
        }
    }
    Ok(action)
}

/// Maps a missing or illegal action to the safe default: Check when it is
/// legal, Fold otherwise.
pub fn coerce_action(state: &RoundState, action: Option<Action>) -> Action {
    if let Some(action) = action {
        if validate_action(state, action).is_ok() {
            return action;
        }
    }
    default_action(state)
}

pub fn default_action(state: &RoundState) -> Action {
    if state.legal_actions().contains(&ActionKind::Check) {
        Action::Check
    } else {
        Action::Fold
    }
}
