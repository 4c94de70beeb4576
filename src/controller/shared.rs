//! Fields shared between command callers and the control loop.

use crate::config::{Speed, TravelLimit};
use crate::persistence::PersistedState;

use super::snapshot::Snapshot;
use super::state::MotionState;

/// Everything guarded by the controller's single motion lock.
#[derive(Debug, Clone)]
pub(crate) struct Shared {
    /// Written by the loop, and by `zero`.
    pub position: i64,
    /// Written by commands, and by the loop's stop/limit clamp.
    pub target: i64,
    pub speed: Speed,
    pub running: bool,
    pub stop_requested: bool,
    pub limit: TravelLimit,
    pub steps_per_rotation: i64,
    /// Bumped by `zero` so an in-flight step does not overwrite the reset.
    pub epoch: u64,
    /// A command was written since the loop last looked.
    pub pending: bool,
    pub shutdown: bool,
}

impl Shared {
    /// Start from a persisted record, settled at its position.
    pub fn from_record(record: &PersistedState) -> Self {
        Self {
            position: record.position,
            target: record.position,
            speed: Speed::new(record.speed),
            running: false,
            stop_requested: false,
            limit: TravelLimit::new(record.max_limit),
            steps_per_rotation: record.steps_per_rot,
            epoch: 0,
            pending: false,
            shutdown: false,
        }
    }

    /// Record to persist for the current fields.
    pub fn record(&self) -> PersistedState {
        PersistedState {
            position: self.position,
            max_limit: self.limit.steps(),
            steps_per_rot: self.steps_per_rotation,
            speed: self.speed.value(),
        }
    }

    pub fn state(&self) -> MotionState {
        MotionState::classify(self.position, self.target, self.running, self.stop_requested)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_fields(
            self.position,
            self.target,
            self.speed.value(),
            self.running,
            self.stop_requested,
            self.limit,
            self.steps_per_rotation,
        )
    }
}
