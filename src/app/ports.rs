//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AquariumService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, clocks, event sinks) implement these
//! traits. The [`AquariumService`](super::service::AquariumService) consumes
//! them via generics, so the domain core never touches hardware directly.
//! The network side has its own ports in [`crate::net::transport`].

use crate::error::{ActuatorFault, SensorError};

use super::reading::SensorSample;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: four independently callable, calibrated readings.
///
/// Implementations return `Err` for absent or out-of-domain values rather
/// than substituting a previous reading.
pub trait SensorPort {
    fn read_temperature_c(&mut self) -> Result<f32, SensorError>;

    fn read_turbidity_ntu(&mut self) -> Result<f32, SensorError>;

    fn read_water_level_cm(&mut self) -> Result<f32, SensorError>;

    fn read_ph(&mut self) -> Result<f32, SensorError>;

    /// Read all four sensors, in a fixed order.
    fn sample(&mut self) -> SensorSample {
        SensorSample {
            temperature_c: self.read_temperature_c(),
            turbidity_ntu: self.read_turbidity_ntu(),
            water_level_cm: self.read_water_level_cm(),
            ph: self.read_ph(),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port. Both operations are **blocking**: they return only
/// once the physical action has finished (or failed).
pub trait ActuatorPort {
    /// Sweep the feeder servo 0 → max → 0.
    fn sweep_feeder(&mut self) -> Result<(), ActuatorFault>;

    /// Energise the pump relay for `duration_ms`, then release it.
    fn run_pump(&mut self, duration_ms: u32) -> Result<(), ActuatorFault>;

    /// Drive every actuator to its rest position — safe shutdown.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic clock.
pub trait TimePort {
    /// Milliseconds since boot. Never goes backwards.
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log today).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
