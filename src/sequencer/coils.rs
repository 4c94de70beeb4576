//! Coil driver capability and its two implementations.

use embedded_hal::digital::OutputPin;

use crate::error::HardwareError;

use super::{PhasePattern, RELEASED};

/// Physical side effect of sequencing: setting the four coil outputs.
pub trait CoilDriver {
    /// Set coils A..D to `pattern`.
    fn energize(&mut self, pattern: PhasePattern) -> Result<(), HardwareError>;

    /// Set all coils low.
    fn release(&mut self) -> Result<(), HardwareError> {
        self.energize(RELEASED)
    }

    /// Whether this driver reaches real outputs.
    fn is_simulated(&self) -> bool {
        false
    }
}

impl<T: CoilDriver + ?Sized> CoilDriver for Box<T> {
    fn energize(&mut self, pattern: PhasePattern) -> Result<(), HardwareError> {
        (**self).energize(pattern)
    }

    fn release(&mut self) -> Result<(), HardwareError> {
        (**self).release()
    }

    fn is_simulated(&self) -> bool {
        (**self).is_simulated()
    }
}

/// Four embedded-hal output pins wired to coils A, B, C, D.
///
/// Every pin is written on every call.
#[derive(Debug)]
pub struct PinCoils<A, B, C, D>
where
    A: OutputPin,
    B: OutputPin,
    C: OutputPin,
    D: OutputPin,
{
    a: A,
    b: B,
    c: C,
    d: D,
}

impl<A, B, C, D> PinCoils<A, B, C, D>
where
    A: OutputPin,
    B: OutputPin,
    C: OutputPin,
    D: OutputPin,
{
    /// Create a driver from four output pins.
    pub fn new(a: A, b: B, c: C, d: D) -> Self {
        Self { a, b, c, d }
    }

    /// Give the pins back.
    pub fn release_pins(self) -> (A, B, C, D) {
        (self.a, self.b, self.c, self.d)
    }
}

fn write_pin<P: OutputPin>(pin: &mut P, high: bool, coil: usize) -> Result<(), HardwareError> {
    let result = if high { pin.set_high() } else { pin.set_low() };
    result.map_err(|_| HardwareError::Pin { coil })
}

impl<A, B, C, D> CoilDriver for PinCoils<A, B, C, D>
where
    A: OutputPin,
    B: OutputPin,
    C: OutputPin,
    D: OutputPin,
{
    fn energize(&mut self, pattern: PhasePattern) -> Result<(), HardwareError> {
        write_pin(&mut self.a, pattern[0], 0)?;
        write_pin(&mut self.b, pattern[1], 1)?;
        write_pin(&mut self.c, pattern[2], 2)?;
        write_pin(&mut self.d, pattern[3], 3)
    }
}

/// No-op driver used when no outputs are addressable.
///
/// Keeps the last pattern so tests can see what would have been driven.
#[derive(Debug, Clone, Default)]
pub struct SimulatedCoils {
    last: PhasePattern,
    writes: u64,
}

impl SimulatedCoils {
    /// Create a released simulated driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last pattern written.
    #[inline]
    pub fn last_pattern(&self) -> PhasePattern {
        self.last
    }

    /// Number of energize/release calls so far.
    #[inline]
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl CoilDriver for SimulatedCoils {
    fn energize(&mut self, pattern: PhasePattern) -> Result<(), HardwareError> {
        self.last = pattern;
        self.writes += 1;
        Ok(())
    }

    fn is_simulated(&self) -> bool {
        true
    }
}
