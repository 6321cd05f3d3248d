//! Mock hardware, clock and event sink for integration tests.
//!
//! Blocking actuator calls advance the shared mock clock by their nominal
//! duration, so tests observe the same timestamps the device would.

use std::cell::Cell;
use std::rc::Rc;

use aquactl::app::events::AppEvent;
use aquactl::app::ports::{ActuatorPort, EventSink, SensorPort, TimePort};
use aquactl::app::reading::{Reading, SensorSample};
use aquactl::error::{ActuatorFault, SensorError};
use embedded_hal::delay::DelayNs;

/// Nominal sweep with the default config (2 × 180° × 15 ms).
pub const SWEEP_MS: u64 = 5_400;

// ── Clock ─────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockClock(Rc<Cell<u64>>);

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.0.set(ms);
    }
}

impl TimePort for MockClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

/// Delay that advances the mock clock instead of sleeping.
pub struct MockDelay {
    clock: MockClock,
    pub total_ms: u64,
}

impl MockDelay {
    pub fn new(clock: &MockClock) -> Self {
        Self { clock: clock.clone(), total_ms: 0 }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
        self.clock.advance(u64::from(ms));
    }
}

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    SweepFeeder,
    RunPump(u32),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// What the next sample returns.
    pub sample: SensorSample,
    pub calls: Vec<ActuatorCall>,
    /// Number of full samples taken (counted on the temperature read).
    pub samples_taken: u32,
    pub fail_feeder: Option<ActuatorFault>,
    pub fail_pump: Option<ActuatorFault>,
    clock: MockClock,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(clock: &MockClock) -> Self {
        Self {
            sample: SensorSample::from(healthy()),
            calls: Vec::new(),
            samples_taken: 0,
            fail_feeder: None,
            fail_pump: None,
            clock: clock.clone(),
        }
    }

    pub fn with_reading(clock: &MockClock, reading: Reading) -> Self {
        let mut hw = Self::new(clock);
        hw.sample = SensorSample::from(reading);
        hw
    }

    pub fn set_reading(&mut self, reading: Reading) {
        self.sample = SensorSample::from(reading);
    }

    pub fn sweeps(&self) -> usize {
        self.calls.iter().filter(|c| **c == ActuatorCall::SweepFeeder).count()
    }

    pub fn pump_runs(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, ActuatorCall::RunPump(_))).count()
    }
}

/// In-range reading with the tank comfortably full.
pub fn healthy() -> Reading {
    Reading {
        temperature_c: 25.5,
        turbidity_ntu: 5.0,
        water_level_cm: 20.0,
        ph: 7.2,
    }
}

impl SensorPort for MockHardware {
    fn read_temperature_c(&mut self) -> Result<f32, SensorError> {
        self.samples_taken += 1;
        self.sample.temperature_c
    }

    fn read_turbidity_ntu(&mut self) -> Result<f32, SensorError> {
        self.sample.turbidity_ntu
    }

    fn read_water_level_cm(&mut self) -> Result<f32, SensorError> {
        self.sample.water_level_cm
    }

    fn read_ph(&mut self) -> Result<f32, SensorError> {
        self.sample.ph
    }
}

impl ActuatorPort for MockHardware {
    fn sweep_feeder(&mut self) -> Result<(), ActuatorFault> {
        self.calls.push(ActuatorCall::SweepFeeder);
        self.clock.advance(SWEEP_MS);
        self.fail_feeder.map_or(Ok(()), Err)
    }

    fn run_pump(&mut self, duration_ms: u32) -> Result<(), ActuatorFault> {
        self.calls.push(ActuatorCall::RunPump(duration_ms));
        self.clock.advance(u64::from(duration_ms));
        self.fail_pump.map_or(Ok(()), Err)
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
