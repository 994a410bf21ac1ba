use std::cmp::Ordering;
use std::sync::Arc;

use crate::cards::Card;
use crate::hand::evaluate;
use crate::round::{Ending, RoundState, TerminalState, BOARD_SIZE};

/// Player 0's share of the pot over every possible runout, in half-points:
/// a win adds 2, a tie adds 1, and each runout adds 2 to `combinations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquityChop {
    pub p0_equity: u64,
    pub combinations: u64,
}

impl EquityChop {
    /// Player 0's delta when both players have committed `starting_stack`:
    /// the pot share rounded to the nearest chip (ties to even) minus the
    /// stake.
    pub fn delta(&self, starting_stack: u32) -> i32 {
        if self.combinations == 0 {
            return 0;
        }
        let share = round_half_even(
            2 * starting_stack as u64 * self.p0_equity,
            self.combinations,
        );
        share as i32 - starting_stack as i32
    }
}

impl RoundState {
    /// Settle the pot. With a complete board the better hand takes it; with
    /// an incomplete board (everyone all-in early) the pot is split by exact
    /// equity over the undealt cards, without dealing them.
    pub fn showdown(self: &Arc<Self>) -> TerminalState {
        let hands = self.hands();
        if self.board().len() < BOARD_SIZE {
            let chop = equity_chop(hands, self.board(), self.deck().remaining());
            let delta = chop.delta(self.config().starting_stack);
            return TerminalState::new(delta, Ending::EquityChop(chop), Arc::clone(self));
        }

        let stack = self.config().starting_stack as i32;
        let stacks = self.stacks().map(|s| s as i32);
        let delta = match compare(hands, self.board()) {
            Ordering::Greater => stack - stacks[1],
            Ordering::Less => stacks[0] - stack,
            // floor division; an odd chip is never awarded to player 0
            Ordering::Equal => (stacks[0] - stacks[1]).div_euclid(2),
        };
        TerminalState::new(delta, Ending::Showdown, Arc::clone(self))
    }
}

/// Enumerate every completion of `board` from `remaining` and tally player
/// 0's wins and ties.
pub fn equity_chop(hands: &[[Card; 2]; 2], board: &[Card], remaining: &[Card]) -> EquityChop {
    let missing = BOARD_SIZE.saturating_sub(board.len());
    let mut chop = EquityChop {
        p0_equity: 0,
        combinations: 0,
    };
    let mut runout = board.to_vec();
    for_each_completion(remaining, missing, &mut runout, &mut |full| {
        match compare(hands, full) {
            Ordering::Greater => chop.p0_equity += 2,
            Ordering::Equal => chop.p0_equity += 1,
            Ordering::Less => {}
        }
        chop.combinations += 2;
    });
    chop
}

fn compare(hands: &[[Card; 2]; 2], board: &[Card]) -> Ordering {
    evaluate(&hands[0], board).cmp(&evaluate(&hands[1], board))
}

/// Calls `f` once per unordered `k`-subset of `pool` appended to `prefix`.
fn for_each_completion<F>(pool: &[Card], k: usize, prefix: &mut Vec<Card>, f: &mut F)
where
    F: FnMut(&[Card]),
{
    if k == 0 {
        f(prefix);
        return;
    }
    for i in 0..pool.len() {
        prefix.push(pool[i]);
        for_each_completion(&pool[i + 1..], k - 1, prefix, f);
        prefix.pop();
    }
}

fn round_half_even(num: u64, den: u64) -> u64 {
    let q = num / den;
    let r = num % den;
    match (2 * r).cmp(&den) {
        Ordering::Less => q,
        Ordering::Greater => q + 1,
        Ordering::Equal => q + (q % 2),
    }
}
