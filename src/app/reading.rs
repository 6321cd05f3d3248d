//! Sensor readings and the alert events derived from them.
//!
//! A [`SensorSample`] keeps every quantity's individual result so callers
//! can see exactly which probe failed. A [`Reading`] only exists when all
//! four quantities were read successfully: no partial reading is ever
//! evaluated.

use crate::error::SensorError;

/// The four physical quantities the controller samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Temperature,
    Turbidity,
    WaterLevel,
    Ph,
}

/// A fully populated reading, produced atomically once per sample cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Reading {
    /// Water temperature (°C).
    pub temperature_c: f32,
    /// Turbidity (NTU).
    pub turbidity_ntu: f32,
    /// Water level above the tank floor (cm).
    pub water_level_cm: f32,
    /// pH (dimensionless).
    pub ph: f32,
}

/// Raw outcome of sampling all four sensors once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    pub temperature_c: Result<f32, SensorError>,
    pub turbidity_ntu: Result<f32, SensorError>,
    pub water_level_cm: Result<f32, SensorError>,
    pub ph: Result<f32, SensorError>,
}

impl SensorSample {
    /// Build the atomic [`Reading`], or report the first quantity that is
    /// missing (priority order: temperature, turbidity, level, pH).
    pub fn reading(&self) -> Result<Reading, (Quantity, SensorError)> {
        Ok(Reading {
            temperature_c: finite(Quantity::Temperature, self.temperature_c)?,
            turbidity_ntu: finite(Quantity::Turbidity, self.turbidity_ntu)?,
            water_level_cm: finite(Quantity::WaterLevel, self.water_level_cm)?,
            ph: finite(Quantity::Ph, self.ph)?,
        })
    }

    /// Every quantity that failed this cycle.
    pub fn failures(&self) -> impl Iterator<Item = (Quantity, SensorError)> {
        [
            (Quantity::Temperature, self.temperature_c),
            (Quantity::Turbidity, self.turbidity_ntu),
            (Quantity::WaterLevel, self.water_level_cm),
            (Quantity::Ph, self.ph),
        ]
        .into_iter()
        .filter_map(|(q, r)| match r {
            Ok(v) if !v.is_finite() => Some((q, SensorError::NotANumber)),
            Ok(_) => None,
            Err(e) => Some((q, e)),
        })
    }
}

impl From<Reading> for SensorSample {
    fn from(r: Reading) -> Self {
        Self {
            temperature_c: Ok(r.temperature_c),
            turbidity_ntu: Ok(r.turbidity_ntu),
            water_level_cm: Ok(r.water_level_cm),
            ph: Ok(r.ph),
        }
    }
}

fn finite(q: Quantity, r: Result<f32, SensorError>) -> Result<f32, (Quantity, SensorError)> {
    match r {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err((q, SensorError::NotANumber)),
        Err(e) => Err((q, e)),
    }
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// Which ideal range was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    TemperatureOutOfRange,
    PhOutOfRange,
}

/// Ephemeral alert: produced and delivered within the same tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertEvent {
    pub kind: AlertKind,
    pub value: f32,
    /// Monotonic milliseconds since boot.
    pub timestamp_ms: u64,
}
