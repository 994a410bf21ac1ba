//! # arena-client: talking to remote bots
//!
//! The referee's side of the bot protocol. A [`RemoteClient`] wraps one bot's
//! connection and owns that player's match-long game clock, bankroll and log
//! budget. Every network call is bounded by a timeout, and bot failures
//! surface as "no action" rather than errors, so a round can always finish.
//!
//! ## Modules
//!
//! - [`client`] - `RemoteClient` and the readiness, action and end-of-round calls
//! - [`transport`] - The `Transport` seam and the TCP implementation
//! - [`message`] - Wire messages (JSON, one object per line)
//! - [`retry`] - Bounded fixed-interval retry policy
//! - [`config`] - Timeouts and budgets, loaded from TOML and the environment
//! - [`errors`] - Error types and their log severities
//! - [`logging`] - Subscriber setup and a capturing layer for tests
//!
//! ## Example
//!
//! ```no_run
//! use std::collections::VecDeque;
//! use arena_client::client::RemoteClient;
//! use arena_client::config::{ClientConfig, PlayerEndpoint};
//! use arena_engine::cards::parse_cards;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::load()?;
//! let mut bot = RemoteClient::tcp(PlayerEndpoint::from_env(1), config);
//! bot.connect().await?;
//!
//! if bot.check_ready(&["alice".into(), "bob".into()]).await {
//!     let hand = parse_cards("9s 9h")?;
//!     let action = bot.request_action(&hand, &[], &mut VecDeque::new()).await?;
//!     println!("bot chose {action:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod logging;
pub mod message;
pub mod retry;
pub mod transport;

pub use client::{check_ready_both, RemoteClient};
pub use errors::{ClientError, TransportError};
