//! The stepping loop.

use std::sync::{Arc, PoisonError};
use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::{Direction, Speed, TravelLimit};
use crate::persistence::StateStore;
use crate::sequencer::CoilDriver;

use super::{Inner, MotionEvent};

/// What the loop waits for after an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// A step was taken; wait the speed-derived delay.
    Step(Duration),
    /// Settled; wait the idle tick or until a command arrives.
    Idle(Duration),
    /// A stop was executed; wait the stop tick or until a command arrives.
    Stopped(Duration),
    /// Limit clamp; re-check at once.
    Immediate,
}

impl Tick {
    /// Longest time the loop will wait.
    pub fn duration(self) -> Duration {
        match self {
            Tick::Step(d) | Tick::Idle(d) | Tick::Stopped(d) => d,
            Tick::Immediate => Duration::ZERO,
        }
    }
}

/// Fields read at the top of an iteration.
#[derive(Debug, Clone, Copy)]
struct View {
    current: i64,
    target: i64,
    speed: Speed,
    stop_requested: bool,
    limit: TravelLimit,
    epoch: u64,
}

/// Single execution context that advances position toward target.
pub struct ControlLoop<C: CoilDriver, S: StateStore> {
    inner: Arc<Inner<C, S>>,
    hardware_fault: bool,
}

impl<C: CoilDriver, S: StateStore> ControlLoop<C, S> {
    pub(super) fn new(inner: Arc<Inner<C, S>>) -> Self {
        Self {
            inner,
            hardware_fault: false,
        }
    }

    /// Run until the controller shuts down. Coils are released on exit.
    pub fn run(mut self) {
        while !self.inner.lock_motion().shutdown {
            let tick = self.iterate();
            self.wait(tick);
        }
        self.inner.release_coils();
    }

    /// Perform one loop iteration and report how long to wait before the next.
    pub fn iterate(&mut self) -> Tick {
        let view = {
            let mut m = self.inner.lock_motion();
            m.pending = false;
            View {
                current: m.position,
                target: m.target,
                speed: m.speed,
                stop_requested: m.stop_requested,
                limit: m.limit,
                epoch: m.epoch,
            }
        };

        if view.stop_requested {
            self.execute_stop();
            return Tick::Stopped(self.inner.timing.stop_tick());
        }

        let direction = match Direction::toward(view.current, view.target) {
            Some(direction) => direction,
            None => {
                self.settle();
                return Tick::Idle(self.inner.timing.idle_tick());
            }
        };

        {
            let mut m = self.inner.lock_motion();
            if m.epoch != view.epoch {
                return Tick::Immediate;
            }
            m.running = true;

            if view.limit.blocks(view.current, direction) {
                // A newer command or a zero wins over the clamp.
                if m.epoch == view.epoch && m.target == view.target {
                    m.target = view.current;
                }
                self.inner.note(MotionEvent::LimitReached, &m);
                drop(m);
                match direction {
                    Direction::Forward => warn!(
                        "Hit maximum limit at position {} (limit: {})",
                        view.current,
                        view.limit.steps()
                    ),
                    Direction::Reverse => warn!(
                        "Hit minimum limit at position {} (limit: -{})",
                        view.current,
                        view.limit.steps()
                    ),
                }
                return Tick::Immediate;
            }
        }

        let next = view.current + direction.sign();
        self.drive(next);

        let mut m = self.inner.lock_motion();
        if m.epoch == view.epoch {
            m.position = next;
        }
        drop(m);

        Tick::Step(view.speed.step_delay())
    }

    /// Collapse target onto position, release the coils and persist.
    fn execute_stop(&mut self) {
        let position = {
            let mut m = self.inner.lock_motion();
            m.target = m.position;
            m.stop_requested = false;
            m.running = false;
            self.inner.note(MotionEvent::Stopped, &m);
            m.position
        };
        info!("Emergency stop executed at position {position}");
        self.inner.release_coils();
        self.inner.persist();
    }

    /// Moving -> Idle transition; no-op if already idle.
    fn settle(&mut self) {
        let position = {
            let mut m = self.inner.lock_motion();
            if !m.running {
                return;
            }
            m.running = false;
            self.inner.note(MotionEvent::Settled, &m);
            m.position
        };
        info!("Movement complete - Final position: {position}");
        self.inner.release_coils();
        self.inner.persist();
    }

    /// Energize the coils for `step`. Failures are logged, never fatal.
    fn drive(&mut self, step: i64) {
        let result = self.inner.lock_sequencer().apply(step);
        match result {
            Ok(()) if self.hardware_fault => {
                self.hardware_fault = false;
                info!(step, "Coil outputs recovered");
            }
            Ok(()) => {}
            Err(e) if !self.hardware_fault => {
                self.hardware_fault = true;
                error!(step, "{e}");
                let m = self.inner.lock_motion();
                self.inner.note(MotionEvent::HardwareFault, &m);
            }
            Err(_) => {}
        }
    }

    /// Sleep according to `tick`, waking early for commands or shutdown.
    ///
    /// Step delays only end early for a stop so speed is honoured.
    fn wait(&self, tick: Tick) {
        let guard = self.inner.lock_motion();
        match tick {
            Tick::Immediate => {}
            Tick::Step(delay) => {
                let _ = self
                    .inner
                    .wake
                    .wait_timeout_while(guard, delay, |m| !m.stop_requested && !m.shutdown)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            Tick::Idle(delay) | Tick::Stopped(delay) => {
                let _ = self
                    .inner
                    .wake
                    .wait_timeout_while(guard, delay, |m| !m.pending && !m.shutdown)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        }
    }
}
