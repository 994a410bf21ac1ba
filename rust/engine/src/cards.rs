use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// One of the three suits of the short deck.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Spades (s)
    Spades,
    /// Hearts (h)
    Hearts,
    /// Diamonds (d)
    Diamonds,
}

impl Suit {
    pub const fn to_char(self) -> char {
        match self {
            Suit::Spades => 's',
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
        }
    }

    pub fn from_char(c: char) -> Option<Suit> {
        match c.to_ascii_lowercase() {
            's' => Some(Suit::Spades),
            'h' => Some(Suit::Hearts),
            'd' => Some(Suit::Diamonds),
            _ => None,
        }
    }
}

/// Face value of a card. The variant only uses ranks 1 through 9.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    One = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
}

impl Rank {
    pub const fn value(self) -> u8 {
        self as u8
    }

    pub fn from_u8(v: u8) -> Option<Rank> {
        match v {
            1 => Some(Rank::One),
            2 => Some(Rank::Two),
            3 => Some(Rank::Three),
            4 => Some(Rank::Four),
            5 => Some(Rank::Five),
            6 => Some(Rank::Six),
            7 => Some(Rank::Seven),
            8 => Some(Rank::Eight),
            9 => Some(Rank::Nine),
            _ => None,
        }
    }
}

/// A single card. Cards compare by value; two `5s` are the same card.
///
/// ```
/// use arena_engine::cards::{Card, Rank, Suit};
///
/// let card: Card = "5s".parse().unwrap();
/// assert_eq!(card, Card::new(Rank::Five, Suit::Spades));
/// assert_eq!(card.to_string(), "5s");
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.value(), self.suit.to_char())
    }
}

impl FromStr for Card {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(r), Some(su), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(GameError::InvalidCard(s.to_string()));
        };
        let rank = r
            .to_digit(10)
            .and_then(|d| Rank::from_u8(d as u8))
            .ok_or_else(|| GameError::InvalidCard(s.to_string()))?;
        let suit = Suit::from_char(su).ok_or_else(|| GameError::InvalidCard(s.to_string()))?;
        Ok(Card::new(rank, suit))
    }
}

/// Parse cards separated by whitespace or commas, e.g. `"1s, 9h 5d"`.
pub fn parse_cards(input: &str) -> Result<Vec<Card>, GameError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(Card::from_str)
        .collect()
}

pub fn all_suits() -> [Suit; 3] {
    [Suit::Spades, Suit::Hearts, Suit::Diamonds]
}

pub fn all_ranks() -> [Rank; 9] {
    [
        Rank::One,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
    ]
}

/// Every rank in every suit: 27 distinct cards.
pub fn full_deck() -> Vec<Card> {
    let mut v = Vec::with_capacity(27);
    for &r in &all_ranks() {
        for &s in &all_suits() {
            v.push(Card::new(r, s));
        }
    }
    v
}
