//! Pump relay driver.
//!
//! The pump is a fixed-speed mains pump switched by a relay; a run is
//! energise → hold for the run duration → release. The driver is generic
//! over `embedded-hal` [`OutputPin`] and [`DelayNs`].
//!
//! ## Safety contract
//!
//! Whatever happens during a run, the driver attempts to leave the coil
//! de-energised. A release that fails is reported as
//! [`ActuatorFault::RelayStuck`] because the pump may still be running.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::error;

use crate::error::ActuatorFault;

pub struct PumpRelay<P, D> {
    pin: P,
    delay: D,
    energised: bool,
}

impl<P: OutputPin, D: DelayNs> PumpRelay<P, D> {
    pub fn new(pin: P, delay: D) -> Self {
        Self {
            pin,
            delay,
            energised: false,
        }
    }

    /// Blocking run: energise, wait `duration_ms`, release.
    pub fn run_for(&mut self, duration_ms: u32) -> Result<(), ActuatorFault> {
        if self.pin.set_high().is_err() {
            let _ = self.off();
            return Err(ActuatorFault::GpioWriteFailed);
        }
        self.energised = true;
        self.delay.delay_ms(duration_ms);
        self.off()
    }

    /// De-energise the coil.
    pub fn off(&mut self) -> Result<(), ActuatorFault> {
        if self.pin.set_low().is_err() {
            error!("Relay: release failed, pump may still be running");
            return Err(ActuatorFault::RelayStuck);
        }
        self.energised = false;
        Ok(())
    }

    pub fn is_energised(&self) -> bool {
        self.energised
    }
}
