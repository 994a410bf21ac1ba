use std::sync::Arc;

use crate::action::{Action, ActionKind, LegalActions};
use crate::cards::Card;
use crate::config::GameConfig;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::rules::validate_action;
use crate::showdown::EquityChop;

pub const STREET_NAMES: [&str; 3] = ["Preflop", "Flop", "River"];

/// Number of shared cards on a complete board.
pub const BOARD_SIZE: usize = 2;

/// One node of the game tree for a single round.
///
/// States are immutable: every transition builds a new node that points back
/// at its parent through `previous_state`. The back-reference is only used to
/// replay the round, never to mutate it.
#[derive(Debug, Clone)]
pub struct RoundState {
    config: GameConfig,
    /// Action counter; `button % 2` is the seat to act
    button: u32,
    /// 0 = preflop, 1 = flop, 2 = river
    street: u8,
    /// Chips committed on the current street only
    pips: [u32; 2],
    /// Chips not yet committed this round
    stacks: [u32; 2],
    hands: [[Card; 2]; 2],
    board: Vec<Card>,
    deck: Arc<Deck>,
    previous_state: Option<Arc<RoundState>>,
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    Fold { player: usize },
    Showdown,
    EquityChop(EquityChop),
}

/// The final node of a round: zero-sum chip deltas plus the last live state.
#[derive(Debug, Clone)]
pub struct TerminalState {
    deltas: [i32; 2],
    ending: Ending,
    previous_state: Arc<RoundState>,
}

impl TerminalState {
    pub(crate) fn new(delta: i32, ending: Ending, previous_state: Arc<RoundState>) -> Self {
        Self {
            deltas: [delta, -delta],
            ending,
            previous_state,
        }
    }

    pub fn deltas(&self) -> [i32; 2] {
        self.deltas
    }

    pub fn ending(&self) -> Ending {
        self.ending
    }

    pub fn previous_state(&self) -> &Arc<RoundState> {
        &self.previous_state
    }

    /// Whether hands are disclosed, i.e. the round did not end in a fold.
    pub fn showdown_reached(&self) -> bool {
        !matches!(self.ending, Ending::Fold { .. })
    }
}

/// Result of applying one action.
#[derive(Debug, Clone)]
pub enum Outcome {
    Round(Arc<RoundState>),
    Terminal(TerminalState),
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Outcome::Terminal(_))
    }

    pub fn round(&self) -> Option<&Arc<RoundState>> {
        match self {
            Outcome::Round(state) => Some(state),
            Outcome::Terminal(_) => None,
        }
    }

    pub fn terminal(&self) -> Option<&TerminalState> {
        match self {
            Outcome::Round(_) => None,
            Outcome::Terminal(terminal) => Some(terminal),
        }
    }
}

impl RoundState {
    /// Deal two cards to each player from `deck` and post the blinds.
    /// Player 0 posts the small blind and acts first.
    pub fn new_round(config: GameConfig, mut deck: Deck) -> Result<Arc<RoundState>, GameError> {
        config.validate()?;
        let h0 = deck.deal(2)?;
        let h1 = deck.deal(2)?;
        let stack = config.starting_stack;
        Ok(Arc::new(RoundState {
            config,
            button: 0,
            street: 0,
            pips: [config.small_blind, config.big_blind],
            stacks: [stack - config.small_blind, stack - config.big_blind],
            hands: [[h0[0], h0[1]], [h1[0], h1[1]]],
            board: Vec::with_capacity(BOARD_SIZE),
            deck: Arc::new(deck),
            previous_state: None,
        }))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
    pub fn button(&self) -> u32 {
        self.button
    }
    pub fn street(&self) -> u8 {
        self.street
    }
    pub fn pips(&self) -> [u32; 2] {
        self.pips
    }
    pub fn stacks(&self) -> [u32; 2] {
        self.stacks
    }
    pub fn hands(&self) -> &[[Card; 2]; 2] {
        &self.hands
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    pub fn deck(&self) -> &Deck {
        &self.deck
    }
    pub fn previous_state(&self) -> Option<&Arc<RoundState>> {
        self.previous_state.as_ref()
    }

    /// Seat index of the player to act.
    pub fn active(&self) -> usize {
        (self.button % 2) as usize
    }

    /// Chips the active player must add to match the opponent.
    pub fn continue_cost(&self) -> u32 {
        let active = self.active();
        self.pips[1 - active].saturating_sub(self.pips[active])
    }

    /// Chips both players have put in this round.
    pub fn pot(&self) -> u32 {
        2 * self.config.starting_stack - self.stacks[0] - self.stacks[1]
    }

    /// This state and its ancestors, newest first.
    pub fn history(self: &Arc<Self>) -> impl Iterator<Item = Arc<RoundState>> {
        std::iter::successors(Some(Arc::clone(self)), |s| s.previous_state.clone())
    }

    /// The active player's legal moves. Never empty.
    pub fn legal_actions(&self) -> LegalActions {
        let active = self.active();
        let cost = self.continue_cost();

        if cost == 0 {
            // bets need chips behind on both sides
            let bets_forbidden = self.stacks[0] == 0 || self.stacks[1] == 0;
            return if bets_forbidden {
                LegalActions::from([ActionKind::Check])
            } else {
                LegalActions::from([ActionKind::Check, ActionKind::Raise])
            };
        }

        let raises_forbidden = cost >= self.stacks[active] || self.stacks[1 - active] == 0;
        if raises_forbidden {
            LegalActions::from([ActionKind::Fold, ActionKind::Call])
        } else {
            LegalActions::from([ActionKind::Fold, ActionKind::Call, ActionKind::Raise])
        }
    }

    /// Minimum and maximum street totals the active player may raise to.
    pub fn raise_bounds(&self) -> (u32, u32) {
        let active = self.active();
        let cost = self.continue_cost();
        let max_contribution = self.stacks[active].min(self.stacks[1 - active] + cost);
        let min_contribution = max_contribution.min(cost + cost.max(self.config.big_blind));
        (
            self.pips[active] + min_contribution,
            self.pips[active] + max_contribution,
        )
    }

    /// Apply one action by the active player. The action is trusted; callers
    /// are expected to check it against [`legal_actions`](Self::legal_actions)
    /// and [`raise_bounds`](Self::raise_bounds) first.
    ///
    /// Errors only when a street card cannot be dealt, which a correctly
    /// configured round never hits.
    pub fn proceed(self: &Arc<Self>, action: Action) -> Result<Outcome, GameError> {
        let active = self.active();
        match action {
            Action::Fold => {
                let stack = self.config.starting_stack as i32;
                let delta = if active == 0 {
                    self.stacks[0] as i32 - stack
                } else {
                    stack - self.stacks[1] as i32
                };
                Ok(Outcome::Terminal(TerminalState::new(
                    delta,
                    Ending::Fold { player: active },
                    Arc::clone(self),
                )))
            }
            Action::Call if self.button == 0 => {
                // small blind completes to the big blind
                let bb = self.config.big_blind;
                let behind = self.config.starting_stack - bb;
                Ok(Outcome::Round(self.child(1, [bb, bb], [behind, behind])))
            }
            Action::Call => {
                let contribution = self.continue_cost().min(self.stacks[active]);
                let (pips, stacks) = self.commit(active, contribution);
                self.child(self.button + 1, pips, stacks).proceed_street()
            }
            Action::Check => {
                if (self.street == 0 && self.button > 0) || self.button > 1 {
                    // both players have acted
                    return self.proceed_street();
                }
                Ok(Outcome::Round(self.child(
                    self.button + 1,
                    self.pips,
                    self.stacks,
                )))
            }
            Action::Raise(amount) => {
                let contribution = amount
                    .saturating_sub(self.pips[active])
                    .min(self.stacks[active]);
                let (pips, stacks) = self.commit(active, contribution);
                Ok(Outcome::Round(self.child(self.button + 1, pips, stacks)))
            }
        }
    }

    /// [`proceed`](Self::proceed) guarded by [`validate_action`].
    pub fn proceed_checked(self: &Arc<Self>, action: Action) -> Result<Outcome, GameError> {
        let action = validate_action(self, action)?;
        self.proceed(action)
    }

    /// Close the current street: deal the next board card, or settle the
    /// round when the river is done or nobody has chips left to bet.
    pub fn proceed_street(self: &Arc<Self>) -> Result<Outcome, GameError> {
        if self.street >= 2 || (self.stacks[0] == 0 && self.stacks[1] == 0) {
            return Ok(Outcome::Terminal(self.showdown()));
        }

        let mut deck = Deck::clone(&self.deck);
        let mut board = self.board.clone();
        board.extend(deck.deal(1)?);

        Ok(Outcome::Round(Arc::new(RoundState {
            config: self.config,
            button: 1,
            street: self.street + 1,
            pips: [0, 0],
            stacks: self.stacks,
            hands: self.hands,
            board,
            deck: Arc::new(deck),
            previous_state: Some(Arc::clone(self)),
        })))
    }

    fn commit(&self, player: usize, chips: u32) -> ([u32; 2], [u32; 2]) {
        let mut pips = self.pips;
        let mut stacks = self.stacks;
        pips[player] += chips;
        stacks[player] -= chips;
        (pips, stacks)
    }

    fn child(self: &Arc<Self>, button: u32, pips: [u32; 2], stacks: [u32; 2]) -> Arc<RoundState> {
        Arc::new(RoundState {
            config: self.config,
            button,
            street: self.street,
            pips,
            stacks,
            hands: self.hands,
            board: self.board.clone(),
            deck: Arc::clone(&self.deck),
            previous_state: Some(Arc::clone(self)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn fresh() -> Arc<RoundState> {
        let top = parse_cards("1s 1h 9s 9h 5s 2d").unwrap();
        RoundState::new_round(GameConfig::default(), Deck::stacked(&top)).unwrap()
    }

    fn round(outcome: Outcome) -> Arc<RoundState> {
        match outcome {
            Outcome::Round(state) => state,
            Outcome::Terminal(t) => panic!("unexpected terminal: {:?}", t.deltas()),
        }
    }

    #[test]
    fn blinds_are_posted_and_small_blind_acts_first() {
        let s = fresh();
        assert_eq!(s.pips(), [1, 2]);
        assert_eq!(s.stacks(), [399, 398]);
        assert_eq!(s.active(), 0);
        assert_eq!(s.deck().len(), 23);
        assert!(s.previous_state().is_none());
    }

    #[test]
    fn opening_legal_actions_and_bounds() {
        let s = fresh();
        assert_eq!(
            s.legal_actions(),
            LegalActions::from([ActionKind::Fold, ActionKind::Call, ActionKind::Raise])
        );
        // cost 1: min contribution 1 + max(1, 2) = 3, max min(399, 398 + 1)
        assert_eq!(s.raise_bounds(), (4, 400));
    }

    #[test]
    fn check_after_street_open_passes_the_action() {
        let s = round(fresh().proceed(Action::Call).unwrap());
        let flop = round(s.proceed(Action::Check).unwrap());
        assert_eq!(flop.street(), 1);
        assert_eq!(flop.button(), 1);
        assert_eq!(flop.active(), 1);

        let checked = round(flop.proceed(Action::Check).unwrap());
        assert_eq!(checked.street(), 1);
        assert_eq!(checked.button(), 2);
        assert_eq!(checked.active(), 0);
    }

    #[test]
    fn history_walks_back_to_the_root() {
        let s = round(fresh().proceed(Action::Call).unwrap());
        let flop = round(s.proceed(Action::Check).unwrap());
        let streets: Vec<u8> = flop.history().map(|st| st.street()).collect();
        assert_eq!(streets, vec![1, 0, 0]);
    }

    #[test]
    fn raise_past_the_stack_is_clamped() {
        let s = fresh();
        let raised = round(s.proceed(Action::Raise(10_000)).unwrap());
        assert_eq!(raised.stacks()[0], 0);
        assert_eq!(raised.pips()[0], 400);
    }
}
