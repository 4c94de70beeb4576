//! Motion controller for one half-stepped axis.
//!
//! Commands only write intent (target, speed, stop flag) under the motion
//! lock and return. A single [`ControlLoop`] owns stepping: it is the only
//! writer of position apart from [`MotionController::zero`].

mod control_loop;
mod history;
mod shared;
mod snapshot;
mod state;

pub use control_loop::{ControlLoop, Tick};
pub use history::{LogEntry, MotionEvent, MotionLog, HISTORY_CAPACITY};
pub use snapshot::Snapshot;
pub use state::MotionState;

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{info, warn};

use crate::config::{Speed, TimingConfig, TravelLimit};
use crate::persistence::StateStore;
use crate::sequencer::{CoilDriver, StepSequencer};

use shared::Shared;

/// Name of the loop thread started by [`MotionController::spawn`].
pub const LOOP_THREAD_NAME: &str = "motion-loop";

pub(crate) struct Inner<C: CoilDriver, S: StateStore> {
    /// Held across reading and writing a record. Taken before `motion`.
    save: Mutex<()>,
    motion: Mutex<Shared>,
    wake: Condvar,
    sequencer: Mutex<StepSequencer<C>>,
    history: Mutex<MotionLog>,
    store: S,
    timing: TimingConfig,
    started: Instant,
    simulated: bool,
}

impl<C: CoilDriver, S: StateStore> Inner<C, S> {
    fn lock_motion(&self) -> MutexGuard<'_, Shared> {
        self.motion.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_sequencer(&self) -> MutexGuard<'_, StepSequencer<C>> {
        self.sequencer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_history(&self) -> MutexGuard<'_, MotionLog> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Turn every coil off, logging a failure.
    fn release_coils(&self) {
        if let Err(e) = self.lock_sequencer().release() {
            warn!("Failed to release coils: {e}");
        }
    }

    /// Save the current record, logging a failure.
    ///
    /// Saves are serialized and each one reads the fields after the previous
    /// one finished, so the last record written is never older than memory.
    fn persist(&self) {
        let _save = self.save.lock().unwrap_or_else(PoisonError::into_inner);
        let record = self.lock_motion().record();
        if let Err(e) = self.store.save(&record) {
            warn!("Failed to save state: {e}");
        }
    }

    /// Append a history entry describing `fields`.
    fn note(&self, event: MotionEvent, fields: &Shared) {
        let entry = LogEntry {
            elapsed_ms: self.started.elapsed().as_millis() as u64,
            event,
            position: fields.position,
            target: fields.target,
            speed: fields.speed.value(),
            state: fields.state(),
        };
        self.lock_history().record(entry);
    }

    /// Mutate the shared fields, flag a pending command and wake the loop.
    fn command<R>(&self, f: impl FnOnce(&mut Shared) -> R) -> R {
        let mut motion = self.lock_motion();
        let result = f(&mut motion);
        motion.pending = true;
        drop(motion);
        self.wake.notify_all();
        result
    }
}

/// Thread-safe command and status surface of the axis.
///
/// Share it between callers with an `Arc`. Dropping it shuts a spawned loop
/// down and releases the coils.
pub struct MotionController<C, S>
where
    C: CoilDriver + Send + 'static,
    S: StateStore + 'static,
{
    inner: Arc<Inner<C, S>>,
    worker: Option<JoinHandle<()>>,
}

impl<C, S> MotionController<C, S>
where
    C: CoilDriver + Send + 'static,
    S: StateStore + 'static,
{
    /// Build a controller from the persisted record without starting a loop.
    ///
    /// The returned [`ControlLoop`] must be driven by exactly one context,
    /// either [`ControlLoop::run`] on a thread or [`ControlLoop::iterate`]
    /// by hand.
    pub fn new(coils: C, store: S, timing: TimingConfig) -> (Self, ControlLoop<C, S>) {
        let loaded = store.load();
        if !loaded.is_intact() {
            warn!(fields = ?loaded.defaulted.as_slice(), "Persisted state incomplete, defaults applied");
        }
        let record = loaded.state;
        if !TravelLimit(record.max_limit).contains(record.position) {
            warn!(
                position = record.position,
                limit = record.max_limit,
                "Persisted position is outside the travel limit; only inward motion is allowed"
            );
        }

        let simulated = coils.is_simulated();
        let mut sequencer = StepSequencer::new(coils);
        if let Err(e) = sequencer.release() {
            warn!("Failed to release coils at startup: {e}");
        }

        let inner = Arc::new(Inner {
            save: Mutex::new(()),
            motion: Mutex::new(Shared::from_record(&record)),
            wake: Condvar::new(),
            sequencer: Mutex::new(sequencer),
            history: Mutex::new(MotionLog::new()),
            store,
            timing,
            started: Instant::now(),
            simulated,
        });

        info!(
            position = record.position,
            speed = record.speed,
            limit = record.max_limit,
            simulated,
            "MotionController initialized"
        );

        let control_loop = ControlLoop::new(Arc::clone(&inner));
        (
            Self {
                inner,
                worker: None,
            },
            control_loop,
        )
    }

    /// Build a controller and run its loop on a dedicated thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(coils: C, store: S, timing: TimingConfig) -> std::io::Result<Self> {
        let (mut controller, control_loop) = Self::new(coils, store, timing);
        let worker = thread::Builder::new()
            .name(LOOP_THREAD_NAME.into())
            .spawn(move || control_loop.run())?;
        controller.worker = Some(worker);
        info!("Motor control thread started");
        Ok(controller)
    }

    /// Set the absolute target. Cancels a pending stop.
    pub fn set_target(&self, position: i64) {
        let (old, current) = self.inner.command(|m| {
            let old = m.target;
            m.target = position;
            m.stop_requested = false;
            self.inner.note(MotionEvent::TargetSet, m);
            (old, m.position)
        });
        info!(current, "Target position changed: {old} -> {position}");
    }

    /// Move the target by `delta` steps. Cancels a pending stop.
    pub fn nudge(&self, delta: i64) {
        let (old, new) = self.inner.command(|m| {
            let old = m.target;
            m.target = m.target.saturating_add(delta);
            m.stop_requested = false;
            self.inner.note(MotionEvent::Nudged, m);
            (old, m.target)
        });
        info!("Nudge requested: {delta} steps (target: {old} -> {new})");
    }

    /// Request an emergency stop. The loop collapses the target on its next
    /// iteration.
    pub fn stop(&self) {
        let (current, target) = self.inner.command(|m| {
            m.stop_requested = true;
            self.inner.note(MotionEvent::StopRequested, m);
            (m.position, m.target)
        });
        info!(current, target, "Stop requested");
    }

    /// Change the speed and persist immediately, whatever the motion state.
    pub fn set_speed(&self, speed: i32) {
        let old = self.inner.command(|m| {
            let old = m.speed;
            m.speed = Speed::new(speed);
            self.inner.note(MotionEvent::SpeedChanged, m);
            old
        });
        info!("Speed changed: {} -> {speed}", old.value());
        self.inner.persist();
    }

    /// Jump position and target to 0, release the coils and persist.
    pub fn zero(&self) {
        let old = self.inner.command(|m| {
            let old = m.position;
            m.position = 0;
            m.target = 0;
            m.running = false;
            m.epoch = m.epoch.wrapping_add(1);
            self.inner.note(MotionEvent::Zeroed, m);
            old
        });
        info!("Position reset to zero (was: {old})");
        self.inner.release_coils();
        self.inner.persist();
    }

    /// Replace the travel limit and persist. Takes effect on the next
    /// iteration.
    pub fn set_travel_limit(&self, limit: i64) {
        let old = self.inner.command(|m| {
            let old = m.limit;
            m.limit = TravelLimit::new(limit);
            self.inner.note(MotionEvent::LimitChanged, m);
            old
        });
        info!("Max limit changed: {} -> {limit}", old.steps());
        self.inner.persist();
    }

    /// Replace the steps-per-rotation display value and persist.
    pub fn set_steps_per_rotation(&self, steps: i64) {
        let old = self.inner.command(|m| {
            let old = m.steps_per_rotation;
            m.steps_per_rotation = steps;
            self.inner.note(MotionEvent::LimitChanged, m);
            old
        });
        info!("Steps/Rot changed: {old} -> {steps}");
        self.inner.persist();
    }

    /// Consistent copy of the observable fields.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock_motion().snapshot()
    }

    /// Recorded events, oldest first.
    pub fn history(&self) -> Vec<LogEntry> {
        self.inner.lock_history().entries()
    }

    /// Limit and hardware events among the last `n` recorded.
    pub fn recent_faults(&self, n: usize) -> Vec<LogEntry> {
        self.inner.lock_history().recent_faults(n)
    }

    /// Whether coil writes are no-ops.
    #[inline]
    pub fn is_simulated(&self) -> bool {
        self.inner.simulated
    }

    /// Stop the loop, wait for it and release the coils.
    ///
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.inner.lock_motion().shutdown = true;
        self.inner.wake.notify_all();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Motion loop thread panicked");
            }
            info!("Motor control thread stopped");
        }
        self.inner.release_coils();
    }
}

impl<C, S> Drop for MotionController<C, S>
where
    C: CoilDriver + Send + 'static,
    S: StateStore + 'static,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}
