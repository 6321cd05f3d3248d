//! Hydrostatic water-level transmitter.
//!
//! Linear 0 – 3.3 V output over a 0 – 50 cm column.

use super::{AnalogInput, finite};
use crate::error::SensorError;

const FULL_SCALE_MV: f32 = 3300.0;
const FULL_SCALE_CM: f32 = 50.0;

pub struct WaterLevelSensor<A> {
    input: A,
}

impl<A: AnalogInput> WaterLevelSensor<A> {
    pub fn new(input: A) -> Self {
        Self { input }
    }

    pub fn read(&mut self) -> Result<f32, SensorError> {
        millivolts_to_cm(self.input.read_millivolts()?)
    }
}

pub fn millivolts_to_cm(mv: u16) -> Result<f32, SensorError> {
    let v = f32::from(mv);
    if v > FULL_SCALE_MV {
        return Err(SensorError::OutOfRange);
    }
    finite(v / FULL_SCALE_MV * FULL_SCALE_CM)
}
