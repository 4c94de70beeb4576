//! Unit tests for TOML configuration parsing.

use std::io::Write;
use std::path::Path;

use stepper_position::config::{load_config, parse_config, LogLevel};
use stepper_position::{ConfigError, Error};

const FULL_CONFIG: &str = r#"
state_file = "/var/lib/stepper/axis.toml"
log_level = "debug"

[motor]
default_speed = 120
default_limit = 8000
default_steps_per_rotation = 2048
min_speed = 10
max_speed = 400

[pins]
in1 = 17
in2 = 18
in3 = 27
in4 = 22

[timing]
idle_tick_ms = 20
stop_tick_ms = 40
"#;

/// Test parsing every section of the configuration.
#[test]
fn test_parse_full_config() {
    let config = parse_config(FULL_CONFIG).expect("Failed to parse config");

    assert_eq!(config.state_file, Path::new("/var/lib/stepper/axis.toml"));
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.motor.default_speed, 120);
    assert_eq!(config.motor.default_limit, 8000);
    assert_eq!(config.motor.default_steps_per_rotation, 2048);
    assert_eq!(config.motor.min_speed, 10);
    assert_eq!(config.motor.max_speed, 400);
    assert_eq!(config.pins.as_array(), [17, 18, 27, 22]);
    assert_eq!(config.timing.idle_tick().as_millis(), 20);
    assert_eq!(config.timing.stop_tick().as_millis(), 40);
}

/// Test that missing sections fall back to defaults.
#[test]
fn test_partial_config_keeps_defaults() {
    let config = parse_config(
        r#"
[motor]
default_speed = 300
"#,
    )
    .expect("Failed to parse config");

    assert_eq!(config.motor.default_speed, 300);
    assert_eq!(config.motor.default_limit, 20_000);
    assert_eq!(config.motor.max_speed, 600);
    assert_eq!(config.pins.as_array(), [26, 19, 13, 6]);
    assert_eq!(config.timing.idle_tick_ms, 50);
    assert_eq!(config.timing.stop_tick_ms, 100);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test that malformed TOML is reported as a parse error.
#[test]
fn test_malformed_toml() {
    let result = parse_config("[motor\ndefault_speed = ");
    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}

/// Test that a wrongly typed value is reported as a parse error.
#[test]
fn test_wrong_value_type() {
    let result = parse_config("[pins]\nin1 = \"twenty-six\"\n");
    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}

/// Test loading configuration from disk.
#[test]
fn test_load_config_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("stepper.toml");
    let mut file = std::fs::File::create(&path).expect("create");
    file.write_all(FULL_CONFIG.as_bytes()).expect("write");
    drop(file);

    let config = load_config(&path).expect("Failed to load config");
    assert_eq!(config.motor.default_limit, 8000);
}

/// Test that a missing file names the path in the error.
#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");

    match load_config(&path) {
        Err(Error::Config(ConfigError::Io { path: reported, .. })) => assert_eq!(reported, path),
        other => panic!("expected I/O error, got {other:?}"),
    }
}
