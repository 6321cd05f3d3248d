//! pH probe with an offset amplifier.
//!
//! The amplifier centres pH 7 at 1.5 V with a slope of 180 mV per pH unit
//! (acidic = higher voltage). Anything outside 0 – 14 is a probe fault.

use super::{AnalogInput, finite};
use crate::error::SensorError;

const NEUTRAL_MV: f32 = 1500.0;
const MV_PER_PH: f32 = 180.0;
const PH_MIN: f32 = 0.0;
const PH_MAX: f32 = 14.0;

pub struct PhSensor<A> {
    input: A,
}

impl<A: AnalogInput> PhSensor<A> {
    pub fn new(input: A) -> Self {
        Self { input }
    }

    pub fn read(&mut self) -> Result<f32, SensorError> {
        millivolts_to_ph(self.input.read_millivolts()?)
    }
}

pub fn millivolts_to_ph(mv: u16) -> Result<f32, SensorError> {
    let ph = finite(7.0 + (NEUTRAL_MV - f32::from(mv)) / MV_PER_PH)?;
    if !(PH_MIN..=PH_MAX).contains(&ph) {
        return Err(SensorError::OutOfRange);
    }
    Ok(ph)
}
