//! `embedded-hal` output wrappers over the raw relay GPIO and servo LEDC
//! helpers in [`hw_init`], so the servo and relay drivers stay generic.

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};

use crate::drivers::hw_init;

/// ESP-IDF error code from a failed register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputError(pub i32);

impl digital::Error for OutputError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

impl pwm::Error for OutputError {
    fn kind(&self) -> pwm::ErrorKind {
        pwm::ErrorKind::Other
    }
}

// ── GPIO ──────────────────────────────────────────────────────

/// Push-pull output pin configured by `hw_init`.
pub struct GpioOutput {
    pin: i32,
}

impl GpioOutput {
    pub fn new(pin: i32) -> Self {
        Self { pin }
    }
}

impl digital::ErrorType for GpioOutput {
    type Error = OutputError;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.pin, false).map_err(OutputError)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.pin, true).map_err(OutputError)
    }
}

// ── LEDC ──────────────────────────────────────────────────────

/// One LEDC channel at the servo timer's resolution.
pub struct LedcPwm {
    channel: u32,
}

impl LedcPwm {
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }
}

impl pwm::ErrorType for LedcPwm {
    type Error = OutputError;
}

impl SetDutyCycle for LedcPwm {
    fn max_duty_cycle(&self) -> u16 {
        hw_init::SERVO_MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        hw_init::ledc_set(self.channel, duty.min(hw_init::SERVO_MAX_DUTY)).map_err(OutputError)
    }
}
