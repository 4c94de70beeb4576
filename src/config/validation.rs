//! Configuration validation.

use crate::error::{ConfigError, Result};

use super::ControllerConfig;

/// Validate a controller configuration.
///
/// Checks:
/// - Coil pins are distinct
/// - Idle and stop ticks are non-zero
/// - Speed range is ordered, starts at 1 or above and contains the default
/// - Default travel limit is non-negative
/// - Default steps per rotation is positive
pub fn validate_config(config: &ControllerConfig) -> Result<()> {
    validate_pins(config)?;
    validate_timing(config)?;
    validate_motor(config)?;
    Ok(())
}

fn validate_pins(config: &ControllerConfig) -> Result<()> {
    let pins = config.pins.as_array();
    for (i, pin) in pins.iter().enumerate() {
        if pins[i + 1..].contains(pin) {
            return Err(ConfigError::DuplicatePin(*pin).into());
        }
    }
    Ok(())
}

fn validate_timing(config: &ControllerConfig) -> Result<()> {
    if config.timing.idle_tick_ms == 0 {
        return Err(ConfigError::ZeroTick("idle_tick_ms").into());
    }
    if config.timing.stop_tick_ms == 0 {
        return Err(ConfigError::ZeroTick("stop_tick_ms").into());
    }
    Ok(())
}

fn validate_motor(config: &ControllerConfig) -> Result<()> {
    let motor = &config.motor;

    if motor.min_speed < 1 || motor.min_speed > motor.max_speed {
        return Err(ConfigError::InvalidSpeedRange {
            min: motor.min_speed,
            max: motor.max_speed,
        }
        .into());
    }

    if !motor.accepts_speed(motor.default_speed) {
        return Err(ConfigError::DefaultSpeedOutOfRange {
            speed: motor.default_speed,
            min: motor.min_speed,
            max: motor.max_speed,
        }
        .into());
    }

    if motor.default_limit < 0 {
        return Err(ConfigError::NegativeLimit(motor.default_limit).into());
    }

    if motor.default_steps_per_rotation <= 0 {
        return Err(ConfigError::InvalidStepsPerRotation(motor.default_steps_per_rotation).into());
    }

    Ok(())
}
