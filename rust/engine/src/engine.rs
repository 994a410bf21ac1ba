use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::config::GameConfig;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::round::RoundState;

/// Deals fresh rounds from a seeded stream so a whole match can be replayed.
///
/// # Examples
///
/// ```
/// use arena_engine::config::GameConfig;
/// use arena_engine::engine::Engine;
///
/// let mut engine = Engine::new(GameConfig::default(), Some(12345)).unwrap();
/// let round = engine.new_round().unwrap();
/// assert_eq!(round.board().len(), 0);
/// assert_eq!(round.deck().len(), 23);
/// assert_eq!(engine.rounds_dealt(), 1);
/// ```
#[derive(Debug)]
pub struct Engine {
    config: GameConfig,
    rng: ChaCha20Rng,
    rounds_dealt: u32,
}

impl Engine {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self, GameError> {
        config.validate()?;
        let seed = seed.unwrap_or(0xA1A2_A3A4);
        Ok(Self {
            config,
            rng: ChaCha20Rng::seed_from_u64(seed),
            rounds_dealt: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn rounds_dealt(&self) -> u32 {
        self.rounds_dealt
    }

    /// Shuffle a new deck and return the root state of the next round.
    pub fn new_round(&mut self) -> Result<Arc<RoundState>, GameError> {
        let mut deck = Deck::new_with_seed(self.rng.random());
        deck.shuffle();
        let state = RoundState::new_round(self.config, deck)?;
        self.rounds_dealt += 1;
        Ok(state)
    }
}
