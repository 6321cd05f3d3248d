//! Feeder state machine: `Idle → Triggering → Idle`.
//!
//! The feeder is purely time-gated. `last_triggered_ms` is stamped when a
//! trigger is granted, so the interval is measured start-to-start and a
//! failed sweep still counts as a feeding (no trigger storm).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeederState {
    Idle,
    /// A sweep has been granted and owns the servo until [`Feeder::finish`].
    Triggering,
}

#[derive(Debug, Clone)]
pub struct Feeder {
    state: FeederState,
    /// `None` until the first feeding, so the first tick may trigger.
    last_triggered_ms: Option<u64>,
    interval_ms: u64,
}

impl Feeder {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            state: FeederState::Idle,
            last_triggered_ms: None,
            interval_ms: u64::from(interval_ms),
        }
    }

    /// Whether the feed interval has elapsed at `now_ms`.
    pub fn is_due(&self, now_ms: u64) -> bool {
        match self.last_triggered_ms {
            None => true,
            Some(t) => now_ms.saturating_sub(t) >= self.interval_ms,
        }
    }

    /// Grant a sweep if idle and due. Returns `true` on `Idle → Triggering`.
    pub fn maybe_trigger(&mut self, now_ms: u64) -> bool {
        if self.state != FeederState::Idle || !self.is_due(now_ms) {
            return false;
        }
        self.state = FeederState::Triggering;
        self.last_triggered_ms = Some(now_ms);
        true
    }

    /// `Triggering → Idle`, whether or not the sweep succeeded.
    pub fn finish(&mut self) {
        self.state = FeederState::Idle;
    }

    pub fn state(&self) -> FeederState {
        self.state
    }

    pub fn last_triggered_ms(&self) -> Option<u64> {
        self.last_triggered_ms
    }
}
