//! Actuator controller — feeder servo and refill pump.
//!
//! Two independent state machines, each with a non-blocking "should I run
//! now" check and a blocking "run to completion" operation:
//!
//! ```text
//!  Feeder:  Idle ──maybe_trigger──▶ Triggering ──run_feeder──▶ Idle
//!  Pump:    Idle ──maybe_activate─▶ Running    ──run_pump────▶ Idle
//! ```
//!
//! The blocking runs own their actuator exclusively until they return;
//! nothing can interrupt them. A failed physical action is reported as an
//! [`ActuatorFault`] and is never retried here, but the state machine
//! still advances its timestamp so a fault cannot turn into a trigger storm.

pub mod feeder;
pub mod pump;

use log::{info, warn};

use crate::app::ports::{ActuatorPort, TimePort};
use crate::config::SystemConfig;
use crate::error::ActuatorFault;

use feeder::{Feeder, FeederState};
use pump::{Pump, PumpState};

/// Identifies an actuator in events and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actuator {
    Feeder,
    Pump,
}

/// Owns both actuator state machines.
#[derive(Debug, Clone)]
pub struct ActuatorController {
    feeder: Feeder,
    pump: Pump,
}

impl ActuatorController {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            feeder: Feeder::new(config.feed_interval_ms),
            pump: Pump::new(config.pump_low_level_cm, config.pump_run_ms, config.pump_min_off_ms),
        }
    }

    // ── Feeder ────────────────────────────────────────────────

    /// Non-blocking: grant a feeding sweep if the interval has elapsed.
    pub fn maybe_trigger_feeder(&mut self, now_ms: u64) -> bool {
        self.feeder.maybe_trigger(now_ms)
    }

    /// Blocking: perform the granted sweep and return the feeder to idle.
    pub fn run_feeder(&mut self, hw: &mut impl ActuatorPort) -> Result<(), ActuatorFault> {
        if self.feeder.state() != FeederState::Triggering {
            return Err(ActuatorFault::NotArmed);
        }
        info!("Feeder: sweep started");
        let result = hw.sweep_feeder();
        self.feeder.finish();
        match result {
            Ok(()) => info!("Feeder: sweep complete"),
            Err(e) => warn!("Feeder: sweep failed ({}), not retrying", e),
        }
        result
    }

    // ── Pump ──────────────────────────────────────────────────

    /// Non-blocking: start a pump run if the level is low and the pump rested.
    pub fn maybe_activate_pump(&mut self, water_level_cm: f32, now_ms: u64) -> bool {
        self.pump.maybe_activate(water_level_cm, now_ms)
    }

    /// Blocking: run the pump for its configured duration, then stamp the
    /// completion time read from `clock`.
    pub fn run_pump(
        &mut self,
        hw: &mut impl ActuatorPort,
        clock: &impl TimePort,
    ) -> Result<(), ActuatorFault> {
        if self.pump.state() != PumpState::Running {
            return Err(ActuatorFault::NotArmed);
        }
        info!("Pump: running for {} ms", self.pump.run_ms());
        let result = hw.run_pump(self.pump.run_ms());
        self.pump.complete(clock.now_ms());
        match result {
            Ok(()) => info!("Pump: run complete"),
            Err(e) => warn!("Pump: run failed ({}), not retrying", e),
        }
        result
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn feeder(&self) -> &Feeder {
        &self.feeder
    }

    pub fn pump(&self) -> &Pump {
        &self.pump
    }
}
