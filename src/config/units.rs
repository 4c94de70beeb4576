//! Unit types for step counts and speed.
//!
//! Positions and limits are plain signed step counts; speed is the UI-scaled
//! integer the operator dials in, which only ever matters through the step
//! delay it produces.

use core::time::Duration;

use serde::{Deserialize, Serialize};

/// Seconds of delay at speed 1. Speed `s` waits `STEP_DELAY_SCALE_SECS / s`.
pub const STEP_DELAY_SCALE_SECS: f64 = 0.6;

/// Direction of motor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward positive step counts.
    Forward,
    /// Toward negative step counts.
    Reverse,
}

impl Direction {
    /// Direction needed to travel from `current` to `target`.
    ///
    /// Returns `None` when they are equal.
    #[inline]
    pub fn toward(current: i64, target: i64) -> Option<Self> {
        match target.cmp(&current) {
            core::cmp::Ordering::Greater => Some(Direction::Forward),
            core::cmp::Ordering::Less => Some(Direction::Reverse),
            core::cmp::Ordering::Equal => None,
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }
}

/// Operator speed setting (roughly 1-600, higher is faster).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Speed(pub i32);

impl Speed {
    /// Create a new Speed value.
    #[inline]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Speed actually used for timing. Zero and negative settings count as 1.
    #[inline]
    pub fn effective(self) -> i32 {
        self.0.max(1)
    }

    /// Delay between consecutive steps at this speed.
    ///
    /// 600 gives 1 ms, 50 gives 12 ms.
    pub fn step_delay(self) -> Duration {
        Duration::from_secs_f64(STEP_DELAY_SCALE_SECS / f64::from(self.effective()))
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(250)
    }
}

impl From<i32> for Speed {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Duration, expected_secs: f64) {
        let diff = (actual.as_secs_f64() - expected_secs).abs();
        assert!(diff < 1e-6, "expected ~{expected_secs}s, got {actual:?}");
    }

    #[test]
    fn test_step_delay_fast() {
        assert_close(Speed(600).step_delay(), 0.001);
    }

    #[test]
    fn test_step_delay_slow() {
        assert_close(Speed(50).step_delay(), 0.012);
    }

    #[test]
    fn test_non_positive_speed_treated_as_one() {
        assert_eq!(Speed(-5).effective(), 1);
        assert_eq!(Speed(0).effective(), 1);
        assert_close(Speed(-5).step_delay(), 0.6);
        assert_close(Speed(0).step_delay(), 0.6);
    }

    #[test]
    fn test_direction_toward() {
        assert_eq!(Direction::toward(5, 15), Some(Direction::Forward));
        assert_eq!(Direction::toward(5, -15), Some(Direction::Reverse));
        assert_eq!(Direction::toward(7, 7), None);
        assert_eq!(Direction::Forward.sign(), 1);
        assert_eq!(Direction::Reverse.sign(), -1);
    }
}
