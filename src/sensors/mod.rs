//! Sensor subsystem — per-quantity converters and the aggregating
//! [`SensorHub`].
//!
//! Each converter turns a pin voltage into a calibrated value and rejects
//! readings that can only come from a disconnected, shorted or failing
//! probe. A rejected reading is an `Err`, never a substituted value.

pub mod ph;
pub mod temperature;
pub mod turbidity;
pub mod water_level;

use crate::app::ports::SensorPort;
use crate::error::SensorError;

use ph::PhSensor;
use temperature::TemperatureSensor;
use turbidity::TurbiditySensor;
use water_level::WaterLevelSensor;

/// A single analog input sampled in millivolts at the ADC pin.
pub trait AnalogInput {
    fn read_millivolts(&mut self) -> Result<u16, SensorError>;
}

/// Owns the four sensor converters.
pub struct SensorHub<A> {
    pub temperature: TemperatureSensor<A>,
    pub turbidity: TurbiditySensor<A>,
    pub water_level: WaterLevelSensor<A>,
    pub ph: PhSensor<A>,
}

impl<A: AnalogInput> SensorHub<A> {
    /// Construct a hub from one input per quantity (built in main where
    /// peripheral ownership is established).
    pub fn new(temperature: A, turbidity: A, water_level: A, ph: A) -> Self {
        Self {
            temperature: TemperatureSensor::new(temperature),
            turbidity: TurbiditySensor::new(turbidity),
            water_level: WaterLevelSensor::new(water_level),
            ph: PhSensor::new(ph),
        }
    }
}

impl<A: AnalogInput> SensorPort for SensorHub<A> {
    fn read_temperature_c(&mut self) -> Result<f32, SensorError> {
        self.temperature.read()
    }

    fn read_turbidity_ntu(&mut self) -> Result<f32, SensorError> {
        self.turbidity.read()
    }

    fn read_water_level_cm(&mut self) -> Result<f32, SensorError> {
        self.water_level.read()
    }

    fn read_ph(&mut self) -> Result<f32, SensorError> {
        self.ph.read()
    }
}

/// Reject NaN and infinities produced by a conversion.
pub(crate) fn finite(value: f32) -> Result<f32, SensorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SensorError::NotANumber)
    }
}
