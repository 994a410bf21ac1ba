use std::fs;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::retry::RetryPolicy;
use crate::transport::DEFAULT_MAX_REPLY_BYTES;

/// Timeouts, retry counts and budgets for talking to bots.
///
/// Resolved by layering defaults, then the TOML file named by `ARENA_CONFIG`,
/// then `ARENA_*` environment variables; the result is validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    pub connect_timeout_ms: u64,
    pub connect_retries: u32,
    pub ready_check_timeout_ms: u64,
    pub ready_check_retries: u32,
    pub ready_check_interval_ms: u64,
    pub action_timeout_ms: u64,
    /// Total attempts per action request; only connection failures are retried
    pub action_retries: u32,
    pub end_round_timeout_ms: u64,
    /// Seconds of decision time each player gets for the whole match
    pub starting_game_clock: f64,
    pub enforce_game_clock: bool,
    /// Bytes of bot log output kept per player per match
    pub player_log_limit: usize,
    /// Longest reply line read from a bot, newline included
    pub max_reply_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 4_000,
            connect_retries: 5,
            ready_check_timeout_ms: 4_000,
            ready_check_retries: 5,
            ready_check_interval_ms: 5_000,
            action_timeout_ms: 2_000,
            action_retries: 2,
            end_round_timeout_ms: 2_000,
            starting_game_clock: 30.0,
            enforce_game_clock: true,
            player_log_limit: 524_288,
            max_reply_bytes: DEFAULT_MAX_REPLY_BYTES,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ClientConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut cfg = ClientConfig::default();

        if let Ok(path) = std::env::var("ARENA_CONFIG") {
            let s = fs::read_to_string(path)?;
            cfg.apply_file(toml::from_str(&s)?);
        }
        cfg.apply_env()?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults overlaid with a TOML document, without consulting the
    /// environment.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let mut cfg = ClientConfig::default();
        cfg.apply_file(toml::from_str(s)?);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let timeouts = [
            ("connect_timeout_ms", self.connect_timeout_ms),
            ("ready_check_timeout_ms", self.ready_check_timeout_ms),
            ("action_timeout_ms", self.action_timeout_ms),
            ("end_round_timeout_ms", self.end_round_timeout_ms),
        ];
        for (name, value) in timeouts {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be >0")));
            }
        }
        let attempts = [
            ("connect_retries", self.connect_retries),
            ("ready_check_retries", self.ready_check_retries),
            ("action_retries", self.action_retries),
        ];
        for (name, value) in attempts {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be >=1")));
            }
        }
        if !self.starting_game_clock.is_finite() || self.starting_game_clock <= 0.0 {
            return Err(ConfigError::Invalid(
                "starting_game_clock must be a positive number of seconds".into(),
            ));
        }
        if self.player_log_limit == 0 {
            return Err(ConfigError::Invalid("player_log_limit must be >0".into()));
        }
        if self.max_reply_bytes == 0 {
            return Err(ConfigError::Invalid("max_reply_bytes must be >0".into()));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn ready_check_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_check_timeout_ms)
    }

    pub fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout_ms)
    }

    pub fn end_round_timeout(&self) -> Duration {
        Duration::from_millis(self.end_round_timeout_ms)
    }

    /// Backoff between connection attempts equals the per-attempt timeout.
    pub fn connect_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.connect_retries, self.connect_timeout())
    }

    pub fn ready_check_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.ready_check_retries,
            Duration::from_millis(self.ready_check_interval_ms),
        )
    }

    pub fn action_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.action_retries, self.action_timeout())
    }

    fn apply_file(&mut self, f: FileConfig) {
        if let Some(v) = f.connect_timeout_ms {
            self.connect_timeout_ms = v;
        }
        if let Some(v) = f.connect_retries {
            self.connect_retries = v;
        }
        if let Some(v) = f.ready_check_timeout_ms {
            self.ready_check_timeout_ms = v;
        }
        if let Some(v) = f.ready_check_retries {
            self.ready_check_retries = v;
        }
        if let Some(v) = f.ready_check_interval_ms {
            self.ready_check_interval_ms = v;
        }
        if let Some(v) = f.action_timeout_ms {
            self.action_timeout_ms = v;
        }
        if let Some(v) = f.action_retries {
            self.action_retries = v;
        }
        if let Some(v) = f.end_round_timeout_ms {
            self.end_round_timeout_ms = v;
        }
        if let Some(v) = f.starting_game_clock {
            self.starting_game_clock = v;
        }
        if let Some(v) = f.enforce_game_clock {
            self.enforce_game_clock = v;
        }
        if let Some(v) = f.player_log_limit {
            self.player_log_limit = v;
        }
        if let Some(v) = f.max_reply_bytes {
            self.max_reply_bytes = v;
        }
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        env_override("ARENA_CONNECT_TIMEOUT_MS", &mut self.connect_timeout_ms)?;
        env_override("ARENA_CONNECT_RETRIES", &mut self.connect_retries)?;
        env_override("ARENA_READY_CHECK_TIMEOUT_MS", &mut self.ready_check_timeout_ms)?;
        env_override("ARENA_READY_CHECK_RETRIES", &mut self.ready_check_retries)?;
        env_override("ARENA_READY_CHECK_INTERVAL_MS", &mut self.ready_check_interval_ms)?;
        env_override("ARENA_ACTION_TIMEOUT_MS", &mut self.action_timeout_ms)?;
        env_override("ARENA_ACTION_RETRIES", &mut self.action_retries)?;
        env_override("ARENA_END_ROUND_TIMEOUT_MS", &mut self.end_round_timeout_ms)?;
        env_override("ARENA_GAME_CLOCK", &mut self.starting_game_clock)?;
        env_override("ARENA_PLAYER_LOG_LIMIT", &mut self.player_log_limit)?;
        env_override("ARENA_MAX_REPLY_BYTES", &mut self.max_reply_bytes)?;

        if let Ok(v) = std::env::var("ARENA_ENFORCE_GAME_CLOCK") {
            if !v.is_empty() {
                self.enforce_game_clock = parse_bool(&v).ok_or_else(|| {
                    ConfigError::Invalid("Invalid ARENA_ENFORCE_GAME_CLOCK".into())
                })?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    connect_timeout_ms: Option<u64>,
    #[serde(default)]
    connect_retries: Option<u32>,
    #[serde(default)]
    ready_check_timeout_ms: Option<u64>,
    #[serde(default)]
    ready_check_retries: Option<u32>,
    #[serde(default)]
    ready_check_interval_ms: Option<u64>,
    #[serde(default)]
    action_timeout_ms: Option<u64>,
    #[serde(default)]
    action_retries: Option<u32>,
    #[serde(default)]
    end_round_timeout_ms: Option<u64>,
    #[serde(default)]
    starting_game_clock: Option<f64>,
    #[serde(default)]
    enforce_game_clock: Option<bool>,
    #[serde(default)]
    player_log_limit: Option<usize>,
    #[serde(default)]
    max_reply_bytes: Option<usize>,
}

/// Where to find one bot and how to introduce ourselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEndpoint {
    pub name: String,
    pub address: String,
    pub auth_token: Option<String>,
}

impl PlayerEndpoint {
    /// Read `ARENA_PLAYER_<n>_NAME`, `_ADDRESS` and `_AUTH_TOKEN` for the
    /// 1-based seat `n`.
    pub fn from_env(n: usize) -> Self {
        let var = |suffix: &str| {
            std::env::var(format!("ARENA_PLAYER_{n}_{suffix}"))
                .ok()
                .filter(|v| !v.is_empty())
        };
        Self {
            name: var("NAME").unwrap_or_else(|| format!("Player{n}")),
            address: var("ADDRESS").unwrap_or_else(|| format!("127.0.0.1:{}", 50050 + n)),
            auth_token: var("AUTH_TOKEN"),
        }
    }
}

fn env_override<T: FromStr>(key: &str, field: &mut T) -> Result<(), ConfigError> {
    if let Ok(v) = std::env::var(key) {
        if !v.is_empty() {
            *field = v
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid {key}: {v}")))?;
        }
    }
    Ok(())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
