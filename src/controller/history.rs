//! Fixed-capacity log of recent motion events.

use heapless::HistoryBuffer;
use serde::Serialize;

use super::state::MotionState;

/// Number of events retained.
pub const HISTORY_CAPACITY: usize = 50;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionEvent {
    /// Absolute target set.
    TargetSet,
    /// Target moved by a relative amount.
    Nudged,
    /// Stop command received.
    StopRequested,
    /// Loop executed a stop.
    Stopped,
    /// Loop reached the target and released the coils.
    Settled,
    /// Travel limit blocked a step; target clamped.
    LimitReached,
    /// Position and target reset to zero.
    Zeroed,
    /// Speed changed.
    SpeedChanged,
    /// Travel limit or steps per rotation changed.
    LimitChanged,
    /// Writing the coil outputs failed.
    HardwareFault,
}

impl MotionEvent {
    /// Whether the event signals a problem.
    #[inline]
    pub fn is_fault(self) -> bool {
        matches!(self, MotionEvent::LimitReached | MotionEvent::HardwareFault)
    }
}

/// One recorded event with the motion fields at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Milliseconds since the controller was created.
    pub elapsed_ms: u64,
    /// Event kind.
    pub event: MotionEvent,
    /// Position when recorded.
    pub position: i64,
    /// Target when recorded.
    pub target: i64,
    /// Speed when recorded.
    pub speed: i32,
    /// Motion state when recorded.
    pub state: MotionState,
}

/// Ring buffer of the last [`HISTORY_CAPACITY`] events.
#[derive(Debug)]
pub struct MotionLog {
    entries: HistoryBuffer<LogEntry, HISTORY_CAPACITY>,
}

impl MotionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            entries: HistoryBuffer::new(),
        }
    }

    /// Append an entry, evicting the oldest when full.
    pub fn record(&mut self, entry: LogEntry) {
        self.entries.write(entry);
    }

    /// Number of entries held.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }

    /// Entries oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.oldest_ordered().copied().collect()
    }

    /// Fault entries among the last `n` entries, oldest first.
    pub fn recent_faults(&self, n: usize) -> Vec<LogEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries
            .oldest_ordered()
            .skip(skip)
            .filter(|e| e.event.is_fault())
            .copied()
            .collect()
    }
}

impl Default for MotionLog {
    fn default() -> Self {
        Self::new()
    }
}
