use std::env;
use std::fs;

use arena_client::config::{ClientConfig, ConfigError, PlayerEndpoint};
use serial_test::serial;

const VARS: &[&str] = &[
    "ARENA_CONFIG",
    "ARENA_CONNECT_TIMEOUT_MS",
    "ARENA_CONNECT_RETRIES",
    "ARENA_READY_CHECK_TIMEOUT_MS",
    "ARENA_READY_CHECK_RETRIES",
    "ARENA_READY_CHECK_INTERVAL_MS",
    "ARENA_ACTION_TIMEOUT_MS",
    "ARENA_ACTION_RETRIES",
    "ARENA_END_ROUND_TIMEOUT_MS",
    "ARENA_GAME_CLOCK",
    "ARENA_ENFORCE_GAME_CLOCK",
    "ARENA_PLAYER_LOG_LIMIT",
    "ARENA_MAX_REPLY_BYTES",
    "ARENA_PLAYER_2_NAME",
    "ARENA_PLAYER_2_ADDRESS",
    "ARENA_PLAYER_2_AUTH_TOKEN",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn no_file_and_no_env_gives_defaults() {
    clear_env();
    assert_eq!(ClientConfig::load().unwrap(), ClientConfig::default());
}

#[test]
#[serial]
fn env_overrides_file_which_overrides_defaults() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arena.toml");
    fs::write(
        &path,
        "starting_game_clock = 60.0\naction_timeout_ms = 500\nplayer_log_limit = 1024\n",
    )
    .unwrap();
    env::set_var("ARENA_CONFIG", &path);
    env::set_var("ARENA_ACTION_TIMEOUT_MS", "750");
    env::set_var("ARENA_ENFORCE_GAME_CLOCK", "off");
    env::set_var("ARENA_MAX_REPLY_BYTES", "65536");

    let cfg = ClientConfig::load().unwrap();
    assert_eq!(cfg.starting_game_clock, 60.0);
    assert_eq!(cfg.action_timeout_ms, 750);
    assert_eq!(cfg.player_log_limit, 1024);
    assert!(!cfg.enforce_game_clock);
    assert_eq!(cfg.max_reply_bytes, 65_536);
    assert_eq!(cfg.connect_retries, 5);
    clear_env();
}

#[test]
#[serial]
fn missing_file_is_an_io_error() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    env::set_var("ARENA_CONFIG", dir.path().join("absent.toml"));
    assert!(matches!(ClientConfig::load(), Err(ConfigError::Io(_))));
    clear_env();
}

#[test]
#[serial]
fn bad_env_values_are_rejected() {
    clear_env();
    env::set_var("ARENA_GAME_CLOCK", "soon");
    assert!(matches!(ClientConfig::load(), Err(ConfigError::Invalid(_))));

    env::set_var("ARENA_GAME_CLOCK", "0");
    assert!(matches!(ClientConfig::load(), Err(ConfigError::Invalid(_))));
    clear_env();
}

#[test]
#[serial]
fn player_endpoint_from_env() {
    clear_env();
    let fallback = PlayerEndpoint::from_env(2);
    assert_eq!(fallback.name, "Player2");
    assert_eq!(fallback.address, "127.0.0.1:50052");
    assert_eq!(fallback.auth_token, None);

    env::set_var("ARENA_PLAYER_2_NAME", "prob-bot");
    env::set_var("ARENA_PLAYER_2_ADDRESS", "bots.internal:9000");
    env::set_var("ARENA_PLAYER_2_AUTH_TOKEN", "s3cret");
    let endpoint = PlayerEndpoint::from_env(2);
    assert_eq!(endpoint.name, "prob-bot");
    assert_eq!(endpoint.address, "bots.internal:9000");
    assert_eq!(endpoint.auth_token.as_deref(), Some("s3cret"));
    clear_env();
}
