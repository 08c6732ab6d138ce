//! Unit tests for configuration resolution and graceful degradation
//!
//! Covers:
//! - Missing TOML files SHALL NOT cause termination
//! - Config file priority: CLI → EMP_CONFIG → platform default → compiled defaults
//! - Secret resolution priority: ENV → TOML
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate EMP_CONFIG or secret variables are marked with #[serial].

use emp_common::config::{
    load_toml_config, resolve_secret, ConfigResolver, TomlConfig, CONFIG_ENV_VAR,
};
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
#[serial]
fn test_cli_path_takes_precedence_over_env() {
    let dir = TempDir::new().unwrap();
    let cli = write_config(&dir, "cli.toml", "[logging]\nlevel = \"debug\"\n");
    let from_env = write_config(&dir, "env.toml", "[logging]\nlevel = \"warn\"\n");
    env::set_var(CONFIG_ENV_VAR, &from_env);

    let resolver = ConfigResolver::new(Some(cli.clone()));
    assert_eq!(resolver.resolve_path(), Some(cli));
    assert_eq!(resolver.load().logging.level, "debug");

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_path_used_without_cli_argument() {
    let dir = TempDir::new().unwrap();
    let from_env = write_config(&dir, "env.toml", "[catalog]\nmarket = \"JP\"\n");
    env::set_var(CONFIG_ENV_VAR, &from_env);

    let config = ConfigResolver::new(None).load();
    assert_eq!(config.catalog.market.as_deref(), Some("JP"));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_config_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist.toml");

    let config = ConfigResolver::new(Some(missing)).load();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_malformed_config_reports_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "bad.toml", "[catalog\nmarket = ");

    let err = load_toml_config(&path).unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn test_full_config_round_trips_fields() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "full.toml",
        r#"
        [logging]
        level = "trace"

        [catalog]
        client_id = "id"
        client_secret = "secret"
        search_limit = 5
        item_limit = 7

        [inference]
        api_token = "token"
        source_language = "ko"

        [text_emotion]
        min_confidence = 0.4
        "#,
    );

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.logging.level, "trace");
    assert_eq!(config.catalog.client_id.as_deref(), Some("id"));
    assert_eq!(config.catalog.effective_search_limit(), 5);
    assert_eq!(config.catalog.effective_item_limit(), 7);
    assert_eq!(config.inference.api_token.as_deref(), Some("token"));
    assert_eq!(config.inference.source_language, "ko");
    assert_eq!(config.inference.target_language, "en");
    assert_eq!(config.text_emotion.min_confidence, Some(0.4));
}

#[test]
#[serial]
fn test_secret_env_wins_over_toml() {
    env::set_var("EMP_TEST_SECRET", "from-env");
    let value = resolve_secret("EMP_TEST_SECRET", Some("from-toml"), "Test secret");
    assert_eq!(value.as_deref(), Some("from-env"));
    env::remove_var("EMP_TEST_SECRET");
}

#[test]
#[serial]
fn test_secret_blank_env_falls_through_to_toml() {
    env::set_var("EMP_TEST_SECRET", "   ");
    let value = resolve_secret("EMP_TEST_SECRET", Some("from-toml"), "Test secret");
    assert_eq!(value.as_deref(), Some("from-toml"));
    env::remove_var("EMP_TEST_SECRET");
}

#[test]
#[serial]
fn test_secret_absent_everywhere_is_none() {
    env::remove_var("EMP_TEST_SECRET");
    assert!(resolve_secret("EMP_TEST_SECRET", None, "Test secret").is_none());
    assert!(resolve_secret("EMP_TEST_SECRET", Some(""), "Test secret").is_none());
}
