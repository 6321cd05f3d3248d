//! ADC1 channel handle implementing [`AnalogInput`].

use crate::drivers::hw_init;
use crate::error::SensorError;
use crate::sensors::AnalogInput;

/// One configured ADC1 oneshot channel.
#[derive(Debug, Clone, Copy)]
pub struct AdcChannel {
    channel: u32,
}

impl AdcChannel {
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }
}

impl AnalogInput for AdcChannel {
    fn read_millivolts(&mut self) -> Result<u16, SensorError> {
        hw_init::adc1_read_mv(self.channel).ok_or(SensorError::AdcReadFailed)
    }
}
