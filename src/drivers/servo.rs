//! Feeder servo driver.
//!
//! A standard hobby servo on a 50 Hz PWM signal: 500 µs pulse = 0°,
//! 2500 µs = 180°. A feeding is one full sweep `0° → max → 0°` in 1°
//! steps with a fixed settle delay per step, so a sweep blocks for
//! `2 × max_angle × step_delay_ms`.
//!
//! The driver is generic over `embedded-hal` [`SetDutyCycle`] and
//! [`DelayNs`] so host tests can run it against fakes.

use embedded_hal::delay::DelayNs;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::error::ActuatorFault;

const PERIOD_US: u32 = 20_000;
const MIN_PULSE_US: u32 = 500;
const MAX_PULSE_US: u32 = 2_500;
const FULL_RANGE_DEG: u32 = 180;

pub struct FeederServo<P, D> {
    pwm: P,
    delay: D,
    max_angle: u16,
    step_delay_ms: u32,
}

impl<P: SetDutyCycle, D: DelayNs> FeederServo<P, D> {
    pub fn new(pwm: P, delay: D, max_angle: u16, step_delay_ms: u32) -> Self {
        Self {
            pwm,
            delay,
            max_angle: max_angle.min(FULL_RANGE_DEG as u16),
            step_delay_ms,
        }
    }

    /// Duty value for `angle` degrees at the channel's resolution.
    pub fn duty_for_angle(&self, angle: u16) -> u16 {
        let angle = u32::from(angle).min(FULL_RANGE_DEG);
        let pulse_us = MIN_PULSE_US + (MAX_PULSE_US - MIN_PULSE_US) * angle / FULL_RANGE_DEG;
        (u32::from(self.pwm.max_duty_cycle()) * pulse_us / PERIOD_US) as u16
    }

    pub fn set_angle(&mut self, angle: u16) -> Result<(), ActuatorFault> {
        let duty = self.duty_for_angle(angle);
        self.pwm
            .set_duty_cycle(duty)
            .map_err(|_| ActuatorFault::PwmWriteFailed)
    }

    /// Blocking sweep `0 → max → 0`.
    ///
    /// On a write failure the servo is sent back to 0° (best effort) and
    /// the fault is returned.
    pub fn sweep(&mut self) -> Result<(), ActuatorFault> {
        let result = self.sweep_inner();
        if result.is_err() {
            warn!("Servo: sweep aborted, parking at 0\u{00b0}");
            let _ = self.set_angle(0);
        }
        result
    }

    fn sweep_inner(&mut self) -> Result<(), ActuatorFault> {
        for angle in 0..self.max_angle {
            self.set_angle(angle)?;
            self.delay.delay_ms(self.step_delay_ms);
        }
        for angle in (1..=self.max_angle).rev() {
            self.set_angle(angle)?;
            self.delay.delay_ms(self.step_delay_ms);
        }
        self.set_angle(0)
    }

    /// Return to 0°.
    pub fn park(&mut self) -> Result<(), ActuatorFault> {
        self.set_angle(0)
    }
}
