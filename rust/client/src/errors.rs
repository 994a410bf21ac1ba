//! Error types for the remote action client.
//!
//! Failures talking to a bot are part of normal match operation: a bot may be
//! slow, crash or send garbage. Every error carries an [`ErrorSeverity`] that
//! decides the tracing level it is logged at.
use std::time::Duration;

use thiserror::Error;

/// Error classification for logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// The bot misbehaved; expected during a match
    Player,
    /// The connection itself failed; worth investigating
    Transport,
    /// The player can take no further part in the match
    Critical,
}

impl ErrorSeverity {
    pub fn level(self) -> tracing::Level {
        match self {
            ErrorSeverity::Player => tracing::Level::INFO,
            ErrorSeverity::Transport => tracing::Level::WARN,
            ErrorSeverity::Critical => tracing::Level::ERROR,
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    /// No response was received; the only retryable failure.
    #[error("Failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Connection closed by peer")]
    Closed,
    #[error("Malformed reply: {0}")]
    Malformed(String),
    #[error("Expected a {expected} reply")]
    UnexpectedReply { expected: &'static str },
    #[error("No reply within {0:?}")]
    Timeout(Duration),
}

impl TransportError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Connect { .. })
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TransportError::Malformed(_)
            | TransportError::UnexpectedReply { .. }
            | TransportError::Timeout(_) => ErrorSeverity::Player,
            TransportError::Connect { .. } | TransportError::Io(_) | TransportError::Closed => {
                ErrorSeverity::Transport
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Game clock exhausted for {player}")]
    GameClockExhausted { player: String },
    #[error("Could not reach {endpoint} after {attempts} attempts")]
    ConnectFailed { endpoint: String, attempts: u32 },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ClientError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ClientError::GameClockExhausted { .. } | ClientError::ConnectFailed { .. } => {
                ErrorSeverity::Critical
            }
            ClientError::Transport(e) => e.severity(),
        }
    }
}

/// Log `err` for `player` at the level its severity calls for.
pub fn log_error<E: std::fmt::Display + ?Sized>(player: &str, err: &E, severity: ErrorSeverity) {
    match severity {
        ErrorSeverity::Player => tracing::info!(player, error = %err, "bot error"),
        ErrorSeverity::Transport => tracing::warn!(player, error = %err, "transport error"),
        ErrorSeverity::Critical => tracing::error!(player, error = %err, "critical client error"),
    }
}
