//! Controller configuration - root configuration structure.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::limits::TravelLimit;
use super::units::Speed;

/// Log level for application logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Path of the durable position record.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Motion defaults and speed bounds.
    #[serde(default)]
    pub motor: MotorDefaults,

    /// Coil GPIO lines.
    #[serde(default)]
    pub pins: PinConfig,

    /// Control loop idle ticks.
    #[serde(default)]
    pub timing: TimingConfig,
}

fn default_state_file() -> PathBuf {
    PathBuf::from("motor_state.toml")
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            log_level: LogLevel::default(),
            motor: MotorDefaults::default(),
            pins: PinConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

/// Values used when the persisted record is missing or a field is invalid,
/// plus the speed range accepted from operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorDefaults {
    /// Speed used when none is persisted.
    pub default_speed: i32,
    /// Travel limit used when none is persisted.
    pub default_limit: i64,
    /// Steps per rotation used when none is persisted.
    pub default_steps_per_rotation: i64,
    /// Lowest speed accepted from a command.
    pub min_speed: i32,
    /// Highest speed accepted from a command.
    pub max_speed: i32,
}

impl MotorDefaults {
    /// Default speed as a [`Speed`].
    #[inline]
    pub fn speed(&self) -> Speed {
        Speed(self.default_speed)
    }

    /// Default travel limit as a [`TravelLimit`].
    #[inline]
    pub fn limit(&self) -> TravelLimit {
        TravelLimit(self.default_limit)
    }

    /// Whether `speed` lies in `[min_speed, max_speed]`.
    #[inline]
    pub fn accepts_speed(&self, speed: i32) -> bool {
        (self.min_speed..=self.max_speed).contains(&speed)
    }
}

impl Default for MotorDefaults {
    fn default() -> Self {
        Self {
            default_speed: 250,
            default_limit: 20_000,
            default_steps_per_rotation: 4096,
            min_speed: 1,
            max_speed: 600,
        }
    }
}

/// BCM GPIO numbers of the four coil inputs (IN1..IN4 on a ULN2003 board).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    /// Coil A.
    pub in1: u8,
    /// Coil B.
    pub in2: u8,
    /// Coil C.
    pub in3: u8,
    /// Coil D.
    pub in4: u8,
}

impl PinConfig {
    /// Pins in coil order A, B, C, D.
    #[inline]
    pub fn as_array(&self) -> [u8; 4] {
        [self.in1, self.in2, self.in3, self.in4]
    }
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            in1: 26,
            in2: 19,
            in3: 13,
            in4: 6,
        }
    }
}

/// Idle tick lengths of the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Wait between checks while settled.
    pub idle_tick_ms: u64,
    /// Wait after executing a stop.
    pub stop_tick_ms: u64,
}

impl TimingConfig {
    /// Idle tick as a Duration.
    #[inline]
    pub fn idle_tick(&self) -> Duration {
        Duration::from_millis(self.idle_tick_ms)
    }

    /// Stop tick as a Duration.
    #[inline]
    pub fn stop_tick(&self) -> Duration {
        Duration::from_millis(self.stop_tick_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            idle_tick_ms: 50,
            stop_tick_ms: 100,
        }
    }
}
