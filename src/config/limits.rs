//! Symmetric travel limit.

use serde::{Deserialize, Serialize};

use super::units::Direction;

/// Fraction of the limit at which a position is reported as near the limit.
pub const NEAR_LIMIT_FRACTION: f64 = 0.95;

/// Display percentage used when no travel range is configured.
pub const MIDPOINT_PERCENT: f64 = 50.0;

/// Symmetric bound on travel: valid positions are `[-limit, +limit]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TravelLimit(pub i64);

impl TravelLimit {
    /// Create a new travel limit.
    #[inline]
    pub const fn new(steps: i64) -> Self {
        Self(steps)
    }

    /// Get the raw limit in steps.
    #[inline]
    pub const fn steps(self) -> i64 {
        self.0
    }

    /// Check if a position is within limits.
    #[inline]
    pub fn contains(self, position: i64) -> bool {
        position >= -self.0 && position <= self.0
    }

    /// Whether a step from `position` in `direction` is forbidden.
    ///
    /// A position already past the bound may still step back inward.
    #[inline]
    pub fn blocks(self, position: i64, direction: Direction) -> bool {
        match direction {
            Direction::Forward => position >= self.0,
            Direction::Reverse => position <= -self.0,
        }
    }

    /// Whether `position` sits within the last 5% of travel.
    pub fn is_near(self, position: i64) -> bool {
        position.unsigned_abs() as f64 >= NEAR_LIMIT_FRACTION * self.0 as f64
    }

    /// Map `[-limit, +limit]` onto `[0, 100]` for display.
    ///
    /// Positions inherited outside the range map outside `[0, 100]`.
    pub fn percentage(self, position: i64) -> f64 {
        if self.0 > 0 {
            MIDPOINT_PERCENT + (position as f64 / (2.0 * self.0 as f64)) * 100.0
        } else {
            MIDPOINT_PERCENT
        }
    }
}

impl From<i64> for TravelLimit {
    fn from(value: i64) -> Self {
        Self(value)
    }
}
