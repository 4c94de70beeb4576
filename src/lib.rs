//! # stepper-position
//!
//! Single-axis position controller for a 4-phase unipolar stepper
//! (28BYJ-48 class) driven in half steps.
//!
//! ## Features
//!
//! - **Absolute positioning**: `set_target`, `nudge` and `zero` on a signed step count
//! - **Symmetric travel limit**: motion is clamped to `[-limit, +limit]`
//! - **Emergency stop**: collapses the target onto the current position within one step
//! - **Runtime speed**: step delay follows `0.6 / speed` seconds
//! - **Persistence**: position, limit, steps-per-rotation and speed survive restarts
//! - **Simulation**: the same controller runs without GPIO access
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stepper_position::{
//!     FileStateStore, MotionController, MotorDefaults, SimulatedCoils, TimingConfig,
//! };
//!
//! let store = FileStateStore::new("motor_state.toml", MotorDefaults::default());
//! let controller = MotionController::spawn(SimulatedCoils::new(), store, TimingConfig::default())?;
//!
//! controller.set_speed(300);
//! controller.set_target(2048);
//! println!("{:?}", controller.snapshot());
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rpi`: drive real coils through `rppal` GPIO on a Raspberry Pi

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod persistence;
pub mod sequencer;

// Re-exports for ergonomic API
pub use command::{Command, Reply};
pub use config::{
    load_config, parse_config, validate_config, ControllerConfig, LogLevel, MotorDefaults,
    PinConfig, TimingConfig,
};
pub use controller::{ControlLoop, LogEntry, MotionController, MotionEvent, MotionState, Snapshot, Tick};
pub use error::{CommandError, ConfigError, Error, HardwareError, PersistenceError, Result};
pub use persistence::{FileStateStore, LoadedState, MemoryStateStore, PersistedState, StateStore};
pub use sequencer::{select_coils, CoilDriver, PinCoils, SimulatedCoils, StepSequencer};

// Unit types
pub use config::units::{Direction, Speed};
pub use config::TravelLimit;
