//! Half-step sequencing for 4-phase unipolar steppers.
//!
//! Maps an absolute step index onto one of eight coil patterns and drives a
//! [`CoilDriver`] with it.

mod coils;
mod gpio;

pub use coils::{CoilDriver, PinCoils, SimulatedCoils};
pub use gpio::select_coils;
#[cfg(feature = "rpi")]
pub use gpio::{open_gpio_coils, GpioCoils};

use crate::error::HardwareError;

/// Energization of coils A, B, C, D (true = on).
pub type PhasePattern = [bool; 4];

/// Number of entries in the half-step table.
pub const PHASE_COUNT: usize = 8;

/// All coils off.
pub const RELEASED: PhasePattern = [false; 4];

/// Half-step sequence, index 0..8.
pub const HALF_STEP_TABLE: [PhasePattern; PHASE_COUNT] = [
    [true, false, false, false],
    [true, true, false, false],
    [false, true, false, false],
    [false, true, true, false],
    [false, false, true, false],
    [false, false, true, true],
    [false, false, false, true],
    [true, false, false, true],
];

/// Table slot for an absolute step index; negative indices wrap into `0..8`.
#[inline]
pub fn phase_index(step: i64) -> usize {
    step.rem_euclid(PHASE_COUNT as i64) as usize
}

/// Coil pattern for an absolute step index.
#[inline]
pub fn phase_pattern(step: i64) -> PhasePattern {
    HALF_STEP_TABLE[phase_index(step)]
}

/// Drives coil outputs from absolute step indices.
#[derive(Debug)]
pub struct StepSequencer<C: CoilDriver> {
    coils: C,
    energized: bool,
}

impl<C: CoilDriver> StepSequencer<C> {
    /// Wrap a coil driver. Coils are assumed released.
    pub fn new(coils: C) -> Self {
        Self {
            coils,
            energized: false,
        }
    }

    /// Energize the coils for absolute step `step`.
    pub fn apply(&mut self, step: i64) -> Result<(), HardwareError> {
        self.energized = true;
        self.coils.energize(phase_pattern(step))
    }

    /// Turn all four coils off.
    pub fn release(&mut self) -> Result<(), HardwareError> {
        self.energized = false;
        self.coils.release()
    }

    /// Whether the last operation was `apply`.
    #[inline]
    pub fn is_energized(&self) -> bool {
        self.energized
    }

    /// Borrow the underlying driver.
    #[inline]
    pub fn coils(&self) -> &C {
        &self.coils
    }

    /// Unwrap the underlying driver.
    pub fn into_inner(self) -> C {
        self.coils
    }
}
