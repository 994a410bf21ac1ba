use crate::cards::Card;

/// Hand categories, weakest first. Each category owns a disjoint score band
/// so that any hand in a higher category outscores every hand below it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Category {
    HighCard = 1,
    Pair = 2,
    ThreeStraight = 3,
    Straight = 4,
    Flush = 5,
    TwoPair = 6,
    Trips = 7,
    StraightFlush = 8,
}

impl Category {
    /// Lower bound of the category's score band.
    pub const fn base(self) -> u32 {
        self as u32 * 10_000
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct HandStrength {
    pub category: Category,
    pub score: u32,
}

/// Score `hole ∪ board`. Higher is better; equal scores split the pot.
///
/// ```
/// use arena_engine::cards::parse_cards;
/// use arena_engine::hand::evaluate;
///
/// let board = parse_cards("5s").unwrap();
/// let nines = parse_cards("9s 9h").unwrap();
/// let ones = parse_cards("1s 1h").unwrap();
/// let a = evaluate(&[nines[0], nines[1]], &board);
/// let b = evaluate(&[ones[0], ones[1]], &board);
/// assert!(a > b);
/// ```
pub fn evaluate(hole: &[Card; 2], board: &[Card]) -> u32 {
    let mut cards = Vec::with_capacity(2 + board.len());
    cards.extend_from_slice(hole);
    cards.extend_from_slice(board);
    evaluate_cards(&cards).score
}

/// Classify and score a combined set of 2 to 4 cards.
pub fn evaluate_cards(cards: &[Card]) -> HandStrength {
    let mut ranks: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    ranks.sort_unstable();

    let mut counts = [0u8; 10];
    for &r in &ranks {
        counts[r as usize] += 1;
    }
    let mut distinct = ranks.clone();
    distinct.dedup();

    let four_cards = cards.len() == 4;
    let flush = four_cards && cards.iter().all(|c| c.suit == cards[0].suit);
    let run = four_cards && distinct.len() == 4 && distinct[3] - distinct[0] == 3;
    let trips = counts.iter().filter(|&&n| n == 3).count() == 1;
    let pairs = counts.iter().filter(|&&n| n == 2).count();

    let (category, value) = if flush && run {
        (Category::StraightFlush, rank_value(&ranks))
    } else if trips {
        (Category::Trips, frequency_value(&ranks, &counts))
    } else if four_cards && pairs == 2 {
        (Category::TwoPair, rank_value(&ranks))
    } else if flush {
        (Category::Flush, rank_value(&ranks))
    } else if run {
        (Category::Straight, rank_value(&ranks))
    } else if let Some(straight) = three_straight(&ranks, &distinct) {
        (Category::ThreeStraight, rank_value(straight))
    } else if pairs == 1 {
        (Category::Pair, frequency_value(&ranks, &counts))
    } else {
        (Category::HighCard, rank_value(&ranks))
    };

    HandStrength {
        category,
        score: category.base() + value,
    }
}

/// Positional value of ascending ranks: the highest rank carries the
/// highest power of ten.
fn rank_value(ascending: &[u8]) -> u32 {
    ascending
        .iter()
        .enumerate()
        .map(|(i, &r)| r as u32 * 10u32.pow(i as u32))
        .sum()
}

/// Like [`rank_value`] but ordered by (multiplicity, rank), so a paired or
/// tripled rank outweighs any kicker.
fn frequency_value(ranks: &[u8], counts: &[u8; 10]) -> u32 {
    let mut by_freq = ranks.to_vec();
    by_freq.sort_unstable_by_key(|&r| (counts[r as usize], r));
    rank_value(&by_freq)
}

/// The three ranks that score a 3-straight, if the hand holds one. The top
/// three sorted cards are used when they run, otherwise the bottom three,
/// even when a pair sits inside the run.
fn three_straight<'a>(ranks: &'a [u8], distinct: &[u8]) -> Option<&'a [u8]> {
    if !distinct.windows(3).any(consecutive) {
        return None;
    }
    let top = &ranks[ranks.len() - 3..];
    let bottom = &ranks[..3];
    Some(if consecutive(top) { top } else { bottom })
}

fn consecutive(w: &[u8]) -> bool {
    w[1] == w[0] + 1 && w[2] == w[1] + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn strength(s: &str) -> HandStrength {
        evaluate_cards(&parse_cards(s).unwrap())
    }

    #[test]
    fn rank_value_weights_highest_rank_most() {
        assert_eq!(rank_value(&[1, 2, 3, 4]), 4321);
        assert_eq!(rank_value(&[2, 5, 9]), 952);
    }

    #[test]
    fn frequency_value_puts_multiples_on_top() {
        let ranks = [2, 6, 6, 6];
        let mut counts = [0u8; 10];
        for r in ranks {
            counts[r as usize] += 1;
        }
        assert_eq!(frequency_value(&ranks, &counts), 6662);
    }

    #[test]
    fn three_straight_uses_only_the_qualifying_cards() {
        let s = strength("1s 5h 6d 7s");
        assert_eq!(s.category, Category::ThreeStraight);
        assert_eq!(s.score, 30_000 + 765);

        let s = strength("2s 3h 4d 9s");
        assert_eq!(s.category, Category::ThreeStraight);
        assert_eq!(s.score, 30_000 + 432);
    }

    #[test]
    fn pair_inside_a_run_scores_the_bottom_three_cards() {
        let s = strength("3s 4h 4d 5s");
        assert_eq!(s.category, Category::ThreeStraight);
        assert_eq!(s.score, 30_000 + 443);

        let split = strength("5s 6h 6d 7s");
        assert_eq!(split.score, 30_000 + 665);
        assert!(split.score < strength("1s 5h 6d 7h").score);
    }

    #[test]
    fn straight_flush_is_checked_before_flush_and_straight() {
        assert_eq!(strength("1s 2s 3s 4s").category, Category::StraightFlush);
        assert_eq!(strength("1s 2s 3s 4s").score, 84_321);
        assert_eq!(strength("1s 2s 3s 5s").category, Category::Flush);
        assert_eq!(strength("1s 2h 3s 4s").category, Category::Straight);
    }

    #[test]
    fn paired_categories() {
        assert_eq!(strength("6s 6h 6d 2s").category, Category::Trips);
        assert_eq!(strength("6s 6h 6d").category, Category::Trips);
        assert_eq!(strength("4s 4h 9d 9h").category, Category::TwoPair);
        assert_eq!(strength("2h 2d 7s 9s").category, Category::Pair);
        assert_eq!(strength("1h 4d 7s 9s").category, Category::HighCard);
    }
}
