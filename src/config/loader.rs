//! Configuration loading from files.

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Result};

use super::ControllerConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
///
/// ```rust,no_run
/// use stepper_position::load_config;
///
/// let config = load_config("stepper.toml")?;
/// # Ok::<(), stepper_position::Error>(())
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ControllerConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<ControllerConfig> {
    let config: ControllerConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.message().to_string()))?;

    super::validation::validate_config(&config)?;

    Ok(config)
}
