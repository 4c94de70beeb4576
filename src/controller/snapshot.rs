//! Point-in-time status of the controller.

use serde::Serialize;

use crate::config::TravelLimit;

use super::state::MotionState;

/// Consistent copy of every externally observable motion field.
///
/// Serializes with the keys status clients already use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Snapshot {
    /// Current position in steps.
    pub position: i64,
    /// Target position in steps.
    pub target: i64,
    /// Speed setting.
    pub speed: i32,
    /// Loop is stepping toward the target.
    pub running: bool,
    /// Symmetric travel limit.
    #[serde(rename = "maxSteps")]
    pub limit: i64,
    /// Steps per rotation (display only).
    #[serde(rename = "stepsPerRot")]
    pub steps_per_rotation: i64,
    /// Derived motion state.
    pub state: MotionState,
    /// `|position| >= 95%` of the limit.
    #[serde(rename = "nearLimit")]
    pub near_limit: bool,
    /// Position mapped from `[-limit, +limit]` to `[0, 100]`.
    pub percentage: f64,
}

impl Snapshot {
    /// Build a snapshot from raw fields.
    pub fn from_fields(
        position: i64,
        target: i64,
        speed: i32,
        running: bool,
        stop_requested: bool,
        limit: TravelLimit,
        steps_per_rotation: i64,
    ) -> Self {
        Self {
            position,
            target,
            speed,
            running,
            limit: limit.steps(),
            steps_per_rotation,
            state: MotionState::classify(position, target, running, stop_requested),
            near_limit: limit.is_near(position),
            percentage: limit.percentage(position),
        }
    }
}
