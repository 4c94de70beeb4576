//! Observable motion state.

use serde::{Serialize, Serializer};

/// Phase of the controller as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionState {
    /// Position equals target and coils are released.
    #[default]
    Idle,
    /// Position differs from target.
    Moving,
    /// A stop is pending and will be executed on the next iteration.
    Stopping,
}

impl MotionState {
    /// Classify raw controller fields.
    pub fn classify(position: i64, target: i64, running: bool, stop_requested: bool) -> Self {
        if stop_requested {
            MotionState::Stopping
        } else if running || position != target {
            MotionState::Moving
        } else {
            MotionState::Idle
        }
    }

    /// Numeric code shown to status clients (0 idle, 1 moving, 2 stopping).
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            MotionState::Idle => 0,
            MotionState::Moving => 1,
            MotionState::Stopping => 2,
        }
    }

    /// State name for display/debugging.
    pub fn name(self) -> &'static str {
        match self {
            MotionState::Idle => "Idle",
            MotionState::Moving => "Moving",
            MotionState::Stopping => "Stopping",
        }
    }
}

impl Serialize for MotionState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}
