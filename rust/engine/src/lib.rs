//! # arena-engine: heads-up short-deck referee core
//!
//! Pure game logic for a two-player poker variant played with a 27-card deck
//! (ranks 1-9 in three suits), two private cards per player and a two-card
//! board dealt over three streets. No I/O happens here; remote players are
//! handled by `arena-client`.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and deck construction
//! - [`deck`] - Seeded shuffling and dealing without replacement
//! - [`hand`] - Hand evaluation over hole cards and board
//! - [`action`] - The four player actions
//! - [`round`] - Immutable round state machine (legal actions, raise bounds, transitions)
//! - [`showdown`] - Pot settlement, including the all-in equity chop
//! - [`rules`] - Caller-side validation and safe defaults
//! - [`engine`] - Seeded dealer of fresh rounds
//! - [`config`] - Blinds and stack sizes
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use arena_engine::action::Action;
//! use arena_engine::config::GameConfig;
//! use arena_engine::engine::Engine;
//! use arena_engine::round::Outcome;
//!
//! let mut engine = Engine::new(GameConfig::default(), Some(42)).unwrap();
//! let root = engine.new_round().unwrap();
//!
//! // small blind completes, big blind checks: the flop is dealt
//! let Outcome::Round(after_call) = root.proceed(Action::Call).unwrap() else { unreachable!() };
//! let Outcome::Round(flop) = after_call.proceed(Action::Check).unwrap() else { unreachable!() };
//! assert_eq!(flop.board().len(), 1);
//!
//! // the big blind bets, the small blind folds and loses what it put in
//! let Outcome::Round(bet) = flop.proceed(Action::Raise(4)).unwrap() else { unreachable!() };
//! let Outcome::Terminal(end) = bet.proceed(Action::Fold).unwrap() else { unreachable!() };
//! assert_eq!(end.deltas(), [-2, 2]);
//! ```

pub mod action;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod hand;
pub mod round;
pub mod rules;
pub mod showdown;
