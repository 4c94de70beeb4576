//! Error types for stepper-position.
//!
//! Motion commands themselves never fail: persistence and per-step hardware
//! errors are logged inside the controller. These types cover the fallible
//! edges of the crate (configuration, opening hardware, the durable record
//! and command text).

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepper-position operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration parsing or validation error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Durable state read/write error
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
    /// Coil output error
    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),
    /// Malformed or out-of-range command
    #[error("Command error: {0}")]
    Command(#[from] CommandError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("I/O error reading {path}: {message}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O message
        message: String,
    },
    /// Failed to parse TOML configuration
    #[error("Parse error: {0}")]
    Parse(String),
    /// Two coils share a GPIO line
    #[error("Duplicate coil pin: BCM {0}")]
    DuplicatePin(u8),
    /// A loop tick is zero
    #[error("Invalid tick '{0}': must be > 0 ms")]
    ZeroTick(&'static str),
    /// Speed bounds are inverted or below 1
    #[error("Invalid speed range: min ({min}) must be >= 1 and <= max ({max})")]
    InvalidSpeedRange {
        /// Configured minimum speed
        min: i32,
        /// Configured maximum speed
        max: i32,
    },
    /// Default speed falls outside the configured range
    #[error("Default speed {speed} outside [{min}, {max}]")]
    DefaultSpeedOutOfRange {
        /// Configured default speed
        speed: i32,
        /// Configured minimum speed
        min: i32,
        /// Configured maximum speed
        max: i32,
    },
    /// Travel limit is negative
    #[error("Invalid travel limit: {0}. Must be >= 0")]
    NegativeLimit(i64),
    /// Steps per rotation is zero or negative
    #[error("Invalid steps per rotation: {0}. Must be > 0")]
    InvalidStepsPerRotation(i64),
}

/// Errors against the durable position record.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading the record failed
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Record path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
    /// Writing or replacing the record failed
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Record path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
    /// The record could not be parsed at all
    #[error("Malformed record: {0}")]
    Parse(String),
    /// The record could not be serialized
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Coil output errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HardwareError {
    /// No addressable outputs at startup
    #[error("Coil outputs unavailable: {0}")]
    Unavailable(String),
    /// Driving one of the four coil lines failed
    #[error("Coil {coil} pin operation failed")]
    Pin {
        /// Coil index (0 = A .. 3 = D)
        coil: usize,
    },
}

/// Command input errors, rejected before reaching the controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Blank input line
    #[error("Empty command")]
    Empty,
    /// Unrecognised verb
    #[error("Unknown command '{0}'")]
    Unknown(String),
    /// Verb requires an integer argument
    #[error("Command '{0}' requires an integer argument")]
    MissingArgument(&'static str),
    /// Verb was given arguments it does not take
    #[error("Command '{0}' takes no further arguments")]
    UnexpectedArgument(&'static str),
    /// Argument is not an integer
    #[error("Invalid integer '{0}'")]
    InvalidInteger(String),
    /// Speed outside the configured range
    #[error("Speed {speed} outside [{min}, {max}]")]
    SpeedOutOfRange {
        /// Requested speed
        speed: i32,
        /// Configured minimum speed
        min: i32,
        /// Configured maximum speed
        max: i32,
    },
    /// Negative travel limit
    #[error("Travel limit must be >= 0, got {0}")]
    NegativeLimit(i64),
    /// Non-positive steps per rotation
    #[error("Steps per rotation must be > 0, got {0}")]
    InvalidStepsPerRotation(i64),
}
