//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`], the feeder servo and the pump relay, exposing
//! them through [`SensorPort`] and [`ActuatorPort`]. This is the only
//! module in the system that touches actual hardware. On non-espidf
//! targets the underlying drivers use cfg-gated simulation stubs.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::error;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::relay::PumpRelay;
use crate::drivers::servo::FeederServo;
use crate::error::{ActuatorFault, SensorError};
use crate::sensors::{AnalogInput, SensorHub};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<A, P, O, D> {
    sensor_hub: SensorHub<A>,
    feeder: FeederServo<P, D>,
    pump: PumpRelay<O, D>,
}

impl<A, P, O, D> HardwareAdapter<A, P, O, D>
where
    A: AnalogInput,
    P: SetDutyCycle,
    O: OutputPin,
    D: DelayNs,
{
    pub fn new(sensor_hub: SensorHub<A>, feeder: FeederServo<P, D>, pump: PumpRelay<O, D>) -> Self {
        Self {
            sensor_hub,
            feeder,
            pump,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<A, P, O, D> SensorPort for HardwareAdapter<A, P, O, D>
where
    A: AnalogInput,
{
    fn read_temperature_c(&mut self) -> Result<f32, SensorError> {
        self.sensor_hub.read_temperature_c()
    }

    fn read_turbidity_ntu(&mut self) -> Result<f32, SensorError> {
        self.sensor_hub.read_turbidity_ntu()
    }

    fn read_water_level_cm(&mut self) -> Result<f32, SensorError> {
        self.sensor_hub.read_water_level_cm()
    }

    fn read_ph(&mut self) -> Result<f32, SensorError> {
        self.sensor_hub.read_ph()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<A, P, O, D> ActuatorPort for HardwareAdapter<A, P, O, D>
where
    P: SetDutyCycle,
    O: OutputPin,
    D: DelayNs,
{
    fn sweep_feeder(&mut self) -> Result<(), ActuatorFault> {
        self.feeder.sweep()
    }

    fn run_pump(&mut self, duration_ms: u32) -> Result<(), ActuatorFault> {
        self.pump.run_for(duration_ms)
    }

    fn all_off(&mut self) {
        if let Err(e) = self.pump.off() {
            error!("Hardware: pump off failed: {}", e);
        }
        if let Err(e) = self.feeder.park() {
            error!("Hardware: feeder park failed: {}", e);
        }
    }
}
