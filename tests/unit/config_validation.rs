//! Unit tests for configuration validation.

use stepper_position::config::{parse_config, validate_config, ControllerConfig};
use stepper_position::error::{ConfigError, Error};

fn config_error(toml_str: &str) -> ConfigError {
    match parse_config(toml_str) {
        Err(Error::Config(e)) => e,
        other => panic!("expected config error, got {other:?}"),
    }
}

/// Test validation of the default configuration.
#[test]
fn test_default_config_passes_validation() {
    assert!(validate_config(&ControllerConfig::default()).is_ok());
}

/// Test validation fails when two coils share a pin.
#[test]
fn test_duplicate_pin() {
    let err = config_error(
        r#"
[pins]
in1 = 5
in2 = 6
in3 = 5
in4 = 7
"#,
    );
    assert_eq!(err, ConfigError::DuplicatePin(5));
}

/// Test validation fails for a zero idle tick.
#[test]
fn test_zero_idle_tick() {
    let err = config_error("[timing]\nidle_tick_ms = 0\n");
    assert_eq!(err, ConfigError::ZeroTick("idle_tick_ms"));
}

/// Test validation fails for an inverted speed range.
#[test]
fn test_inverted_speed_range() {
    let err = config_error(
        r#"
[motor]
default_speed = 100
min_speed = 200
max_speed = 100
"#,
    );
    assert_eq!(err, ConfigError::InvalidSpeedRange { min: 200, max: 100 });
}

/// Test validation fails when the speed range starts below 1.
#[test]
fn test_speed_range_below_one() {
    let err = config_error("[motor]\nmin_speed = 0\n");
    assert_eq!(err, ConfigError::InvalidSpeedRange { min: 0, max: 600 });
}

/// Test validation fails when the default speed is outside the range.
#[test]
fn test_default_speed_outside_range() {
    let err = config_error("[motor]\ndefault_speed = 700\n");
    assert_eq!(
        err,
        ConfigError::DefaultSpeedOutOfRange {
            speed: 700,
            min: 1,
            max: 600
        }
    );
}

/// Test validation fails for a negative default limit.
#[test]
fn test_negative_default_limit() {
    let err = config_error("[motor]\ndefault_limit = -5\n");
    assert_eq!(err, ConfigError::NegativeLimit(-5));
}

/// Test validation fails for non-positive steps per rotation.
#[test]
fn test_zero_steps_per_rotation() {
    let err = config_error("[motor]\ndefault_steps_per_rotation = 0\n");
    assert_eq!(err, ConfigError::InvalidStepsPerRotation(0));
}

/// Test a zero travel limit is accepted.
#[test]
fn test_zero_limit_is_valid() {
    let config = parse_config("[motor]\ndefault_limit = 0\n").expect("zero limit is valid");
    assert_eq!(config.motor.default_limit, 0);
}
