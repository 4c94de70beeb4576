//! Startup selection between real GPIO coils and the simulation stub.

use tracing::{info, warn};

use crate::config::PinConfig;

use super::{CoilDriver, SimulatedCoils};

#[cfg(feature = "rpi")]
use crate::error::HardwareError;

#[cfg(feature = "rpi")]
use super::PinCoils;

/// Coils on four Raspberry Pi GPIO lines.
#[cfg(feature = "rpi")]
pub type GpioCoils = PinCoils<
    rppal::gpio::OutputPin,
    rppal::gpio::OutputPin,
    rppal::gpio::OutputPin,
    rppal::gpio::OutputPin,
>;

/// Open the four BCM lines named in `pins` as outputs, initially low.
///
/// # Errors
///
/// Returns `HardwareError::Unavailable` if the GPIO chip or any line cannot
/// be claimed.
#[cfg(feature = "rpi")]
pub fn open_gpio_coils(pins: &PinConfig) -> Result<GpioCoils, HardwareError> {
    let unavailable = |e: rppal::gpio::Error| HardwareError::Unavailable(e.to_string());

    let gpio = rppal::gpio::Gpio::new().map_err(unavailable)?;
    let [a, b, c, d] = pins.as_array();
    let open = |bcm: u8| gpio.get(bcm).map(|p| p.into_output_low()).map_err(unavailable);

    Ok(PinCoils::new(open(a)?, open(b)?, open(c)?, open(d)?))
}

/// Pick the coil driver once at startup.
///
/// Falls back to [`SimulatedCoils`] when `simulate` is set, when the crate
/// was built without GPIO support, or when opening the lines fails.
pub fn select_coils(pins: &PinConfig, simulate: bool) -> Box<dyn CoilDriver + Send> {
    if simulate {
        info!("Simulation mode requested, coil outputs disabled");
        return Box::new(SimulatedCoils::new());
    }

    #[cfg(feature = "rpi")]
    {
        match open_gpio_coils(pins) {
            Ok(coils) => {
                info!(
                    in1 = pins.in1,
                    in2 = pins.in2,
                    in3 = pins.in3,
                    in4 = pins.in4,
                    "GPIO coils initialized"
                );
                Box::new(coils)
            }
            Err(e) => {
                warn!("{e}. Running in simulation mode");
                Box::new(SimulatedCoils::new())
            }
        }
    }

    #[cfg(not(feature = "rpi"))]
    {
        warn!(
            pins = ?pins.as_array(),
            "Built without GPIO support. Running in simulation mode"
        );
        Box::new(SimulatedCoils::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulate_flag_selects_stub() {
        let coils = select_coils(&PinConfig::default(), true);
        assert!(coils.is_simulated());
    }

    #[cfg(not(feature = "rpi"))]
    #[test]
    fn test_without_gpio_support_falls_back() {
        let coils = select_coils(&PinConfig::default(), false);
        assert!(coils.is_simulated());
    }
}
