//! Integration tests for config file resolution and graceful degradation
//!
//! Tests that manipulate CINELINK_CONFIG are marked with #[serial] so they
//! never race each other.

use cinelink_common::config::{
    load_or_default, load_toml_config, resolve_config_path, write_toml_config, DiscovererKind,
    TomlConfig, CONFIG_ENV_VAR,
};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
#[serial]
fn test_cli_path_takes_precedence_over_env() {
    let dir = TempDir::new().unwrap();
    let cli_path = dir.path().join("cli.toml");
    env::set_var(CONFIG_ENV_VAR, dir.path().join("env.toml"));

    let resolved = resolve_config_path(Some(&cli_path));
    assert_eq!(resolved, Some(cli_path));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_path_used_without_cli() {
    let dir = TempDir::new().unwrap();
    let env_path = dir.path().join("env.toml");
    env::set_var(CONFIG_ENV_VAR, &env_path);

    assert_eq!(resolve_config_path(None), Some(env_path));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_env_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    env::set_var(CONFIG_ENV_VAR, dir.path().join("does-not-exist.toml"));

    let config = load_or_default(None).unwrap();
    assert_eq!(config, TomlConfig::default());

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_cli_file_is_an_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.toml");

    assert!(load_or_default(Some(&missing)).is_err());
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[generator\nmax_groups_per_batch = ").unwrap();

    assert!(load_toml_config(&path).is_err());
}

#[test]
fn test_write_then_load_preserves_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = TomlConfig::default();
    config.logging.level = "debug".to_string();
    config.generator.max_groups_per_batch = 8;
    config.generator.enabled_discoverers = vec![DiscovererKind::Actor];
    config.generator.recent_connections = vec!["Directed by Steven Spielberg".to_string()];
    config.generator.pool_filters.excluded_genres = vec![99];
    config.generator.seed = Some(7);

    write_toml_config(&config, &path).unwrap();
    assert!(!path.with_extension("toml.tmp").exists());

    let loaded = load_toml_config(&path).unwrap();
    assert_eq!(loaded, config);
}
