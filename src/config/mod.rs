//! Configuration module for stepper-position.
//!
//! Provides types for loading and validating the controller configuration
//! from TOML files, plus the unit types shared with the controller.

mod controller;
mod limits;
mod loader;
pub mod units;
mod validation;

pub use controller::{ControllerConfig, LogLevel, MotorDefaults, PinConfig, TimingConfig};
pub use limits::{TravelLimit, MIDPOINT_PERCENT, NEAR_LIMIT_FRACTION};
pub use loader::{load_config, parse_config};
pub use validation::validate_config;

// Re-export unit types at config level
pub use units::{Direction, Speed, STEP_DELAY_SCALE_SECS};
