use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// The undealt cards of one round. Cards leave from the top (the end of the
/// vector) and never come back.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    rng: ChaCha20Rng,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        // Keep initial order until shuffle is called explicitly
        Self {
            cards: full_deck(),
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// A deck holding exactly `cards`, with `cards.last()` on top.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            cards,
            rng: ChaCha20Rng::seed_from_u64(0),
        }
    }

    /// A full deck arranged so that `top` is dealt first, in order, followed by
    /// the rest of the deck. Intended for replaying known rounds.
    ///
    /// ```
    /// use arena_engine::cards::parse_cards;
    /// use arena_engine::deck::Deck;
    ///
    /// let top = parse_cards("9s 9h").unwrap();
    /// let mut deck = Deck::stacked(&top);
    /// assert_eq!(deck.deal(2).unwrap(), top);
    /// assert_eq!(deck.len(), 25);
    /// ```
    pub fn stacked(top: &[Card]) -> Self {
        let mut cards: Vec<Card> = full_deck()
            .into_iter()
            .filter(|c| !top.contains(c))
            .collect();
        cards.extend(top.iter().rev().copied());
        Self::from_cards(cards)
    }

    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
    }

    /// Remove and return the top `n` cards.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        if n > self.cards.len() {
            return Err(GameError::DeckExhausted {
                requested: n,
                remaining: self.cards.len(),
            });
        }
        Ok((0..n).filter_map(|_| self.cards.pop()).collect())
    }

    /// The undealt cards, without removing them.
    pub fn remaining(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
