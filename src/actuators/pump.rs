//! Refill pump state machine: `Idle → Running → Idle`.
//!
//! Activation needs all three of: water below the low-level threshold, the
//! pump idle, and the minimum off-time elapsed since the previous run
//! *ended*. Requests while running are no-ops and never extend the run.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    Idle,
    Running,
}

#[derive(Debug, Clone)]
pub struct Pump {
    state: PumpState,
    /// Completion time of the last run; `None` before the first run.
    last_triggered_ms: Option<u64>,
    low_level_cm: f32,
    run_ms: u32,
    min_off_ms: u64,
}

impl Pump {
    pub fn new(low_level_cm: f32, run_ms: u32, min_off_ms: u32) -> Self {
        Self {
            state: PumpState::Idle,
            last_triggered_ms: None,
            low_level_cm,
            run_ms,
            min_off_ms: u64::from(min_off_ms),
        }
    }

    /// Returns `true` on `Idle → Running`.
    pub fn maybe_activate(&mut self, water_level_cm: f32, now_ms: u64) -> bool {
        if self.state == PumpState::Running {
            return false;
        }
        // NaN compares false, so an invalid level never starts the pump.
        let low = water_level_cm < self.low_level_cm;
        if !low {
            return false;
        }
        let rested = match self.last_triggered_ms {
            None => true,
            Some(t) => now_ms.saturating_sub(t) >= self.min_off_ms,
        };
        if !rested {
            return false;
        }
        self.state = PumpState::Running;
        true
    }

    /// `Running → Idle`, stamping the completion time. A failed run is
    /// stamped too, so a stuck relay cannot cause back-to-back retries.
    pub fn complete(&mut self, now_ms: u64) {
        if self.state == PumpState::Running {
            self.state = PumpState::Idle;
            self.last_triggered_ms = Some(now_ms);
        }
    }

    pub fn state(&self) -> PumpState {
        self.state
    }

    pub fn last_triggered_ms(&self) -> Option<u64> {
        self.last_triggered_ms
    }

    /// Configured run duration.
    pub fn run_ms(&self) -> u32 {
        self.run_ms
    }
}
