//! NTC thermistor temperature probe (10 kOhm @ 25 C, B = 3950).
//!
//! Wired in a voltage divider with a fixed 10 kOhm resistor to 3.3 V, the
//! thermistor on the low side. The simplified Beta (Steinhart-Hart)
//! equation converts resistance to temperature.

use super::{AnalogInput, finite};
use crate::error::SensorError;

const R25: f32 = 10_000.0;
const BETA: f32 = 3950.0;
const T25_K: f32 = 298.15;
const R_DIVIDER: f32 = 10_000.0;
const V_REF_MV: f32 = 3300.0;

/// Pin voltage this close to a rail means an open or shorted probe.
const RAIL_MARGIN_MV: f32 = 10.0;

/// Plausible water temperature band (°C).
const MIN_PLAUSIBLE_C: f32 = -20.0;
const MAX_PLAUSIBLE_C: f32 = 80.0;

pub struct TemperatureSensor<A> {
    input: A,
}

impl<A: AnalogInput> TemperatureSensor<A> {
    pub fn new(input: A) -> Self {
        Self { input }
    }

    pub fn read(&mut self) -> Result<f32, SensorError> {
        millivolts_to_celsius(self.input.read_millivolts()?)
    }
}

/// Convert the divider voltage to °C.
pub fn millivolts_to_celsius(mv: u16) -> Result<f32, SensorError> {
    let v = f32::from(mv);
    if v <= RAIL_MARGIN_MV || v >= V_REF_MV - RAIL_MARGIN_MV {
        return Err(SensorError::OutOfRange);
    }
    let r_ntc = R_DIVIDER * v / (V_REF_MV - v);
    let inv_t = (1.0 / T25_K) + (1.0 / BETA) * (r_ntc / R25).ln();
    if inv_t <= 0.0 {
        return Err(SensorError::OutOfRange);
    }
    let celsius = finite((1.0 / inv_t) - 273.15)?;
    if !(MIN_PLAUSIBLE_C..=MAX_PLAUSIBLE_C).contains(&celsius) {
        return Err(SensorError::OutOfRange);
    }
    Ok(celsius)
}
