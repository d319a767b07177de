//! CLI integration tests.
//!
//! These tests verify the CLI argument parsing and configuration loading.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use recipe_box::cli::{parse_args_from, Args};
use recipe_box::config::Config;

fn args(args: &[&str]) -> Vec<OsString> {
    std::iter::once("recipe-box")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect()
}

// ============================================================================
// CLI Argument Tests
// ============================================================================

#[test]
fn test_cli_defaults() {
    let result = parse_args_from(args(&[])).unwrap();

    assert!(result.host.is_none());
    assert!(result.port.is_none());
    assert!(result.config.is_none());
    assert!(result.recipes.is_none());
    assert!(result.favorites.is_none());
    assert!(result.log_level.is_none());
}

#[test]
fn test_cli_full_options() {
    let result = parse_args_from(args(&[
        "-H",
        "0.0.0.0",
        "-p",
        "8080",
        "-r",
        "/srv/recipes.json",
        "--favorites",
        "/srv/favorites.json",
        "-l",
        "debug",
    ]))
    .unwrap();

    assert_eq!(result.host.unwrap().to_string(), "0.0.0.0");
    assert_eq!(result.port, Some(8080));
    assert_eq!(result.recipes, Some(PathBuf::from("/srv/recipes.json")));
    assert_eq!(result.favorites, Some(PathBuf::from("/srv/favorites.json")));
    assert_eq!(result.log_level, Some("debug".to_string()));
    assert!(!result.help);
}

#[test]
fn test_cli_config_file() {
    let result = parse_args_from(args(&["-c", "/etc/recipe-box.json"])).unwrap();

    assert_eq!(result.config, Some(PathBuf::from("/etc/recipe-box.json")));
}

#[test]
fn test_cli_invalid_port() {
    let result = parse_args_from(args(&["-p", "not-a-number"]));
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "invalid value for --port: 'not-a-number'");
}

#[test]
fn test_cli_invalid_host() {
    let result = parse_args_from(args(&["-H", "not-an-ip"]));
    assert!(result.is_err());
}

#[test]
fn test_cli_unknown_flag() {
    let result = parse_args_from(args(&["--api-key", "secret"]));
    assert!(result.is_err());
}

#[test]
fn test_cli_missing_value() {
    let result = parse_args_from(args(&["--recipes"]));
    assert!(result.is_err());
}

// ============================================================================
// Configuration Loading Tests
// ============================================================================

#[test]
fn test_config_from_json_file() {
    let json = r#"{
        "server": {
            "host": "192.168.1.100",
            "port": 9000
        },
        "auth": {
            "site_url": "https://recipes.example.com/",
            "routes": {
                "home": "/recipes",
                "public_prefix": "/browse/"
            }
        },
        "recipes": {
            "catalog": "/srv/catalog.json"
        },
        "logging": {
            "level": "debug"
        }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.server.host, "192.168.1.100");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.auth.routes.home, "/recipes");
    assert_eq!(config.auth.routes.public_prefix, "/browse/");
    assert_eq!(config.auth.routes.login, "/auth/login");
    assert_eq!(
        config.auth.oauth_redirect_url(),
        "https://recipes.example.com/auth/callback"
    );
    assert_eq!(config.recipes.catalog, PathBuf::from("/srv/catalog.json"));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_config_priority_cli_over_file() {
    let json = r#"{
        "server": {
            "host": "10.0.0.1",
            "port": 5000
        },
        "recipes": {
            "catalog": "/from/file.json"
        }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let args = Args {
        host: Some("192.168.1.1".parse().unwrap()),
        port: Some(8080),
        recipes: Some(PathBuf::from("/from/cli.json")),
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();

    assert_eq!(config.server.host, "192.168.1.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.recipes.catalog, PathBuf::from("/from/cli.json"));
}

#[test]
fn test_config_file_kept_when_cli_silent() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(br#"{ "favorites": { "path": "/var/lib/favorites.json" } }"#)
        .unwrap();

    let args = Args {
        config: Some(file.path().to_path_buf()),
        favorites: None,
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();
    assert_eq!(
        config.favorites.path,
        Some(PathBuf::from("/var/lib/favorites.json"))
    );
}

#[test]
fn test_config_to_server_config() {
    let args = Args {
        host: Some("0.0.0.0".parse().unwrap()),
        port: Some(8080),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();
    let server_config = config.to_server_config().unwrap();

    assert_eq!(server_config.host, "0.0.0.0");
    assert_eq!(server_config.port, 8080);
}

// ============================================================================
// Configuration Serialization Tests
// ============================================================================

#[test]
fn test_config_roundtrip() {
    let original = Config::default();
    let json = serde_json::to_string(&original).unwrap();
    let loaded: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(original.server.host, loaded.server.host);
    assert_eq!(original.auth, loaded.auth);
    assert_eq!(original.recipes.catalog, loaded.recipes.catalog);
}

#[test]
fn test_config_partial_deserialization() {
    let json = r#"{"server": {"port": 9999}}"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.server.port, 9999);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.auth.routes.login, "/auth/login");
}
