//! Analog turbidity probe.
//!
//! The probe outputs 0 – 4.5 V (clear water ≈ 4.2 V) and is read through
//! a 2:3 divider. Probe voltage maps to NTU with the manufacturer's
//! quadratic fit, valid between 2.5 V (≈ 3000 NTU) and 4.2 V (≈ 0 NTU);
//! voltages outside that window are clamped to it.

use super::{AnalogInput, finite};
use crate::error::SensorError;

/// Probe volts per pin volt.
const DIVIDER_RATIO: f32 = 1.5;
const FIT_MIN_V: f32 = 2.5;
const FIT_MAX_V: f32 = 4.2;

/// Below this the probe is unpowered or unplugged.
const DISCONNECTED_MV: u16 = 50;

pub struct TurbiditySensor<A> {
    input: A,
}

impl<A: AnalogInput> TurbiditySensor<A> {
    pub fn new(input: A) -> Self {
        Self { input }
    }

    pub fn read(&mut self) -> Result<f32, SensorError> {
        millivolts_to_ntu(self.input.read_millivolts()?)
    }
}

pub fn millivolts_to_ntu(mv: u16) -> Result<f32, SensorError> {
    if mv < DISCONNECTED_MV {
        return Err(SensorError::OutOfRange);
    }
    let v = (f32::from(mv) / 1000.0 * DIVIDER_RATIO).clamp(FIT_MIN_V, FIT_MAX_V);
    let ntu = -1120.4 * v * v + 5742.3 * v - 4352.9;
    finite(ntu.max(0.0))
}
