//! Range evaluator.
//!
//! Compares a [`Reading`] against the configured ideal bands and produces
//! zero or more [`AlertEvent`]s. Pure: no state, no I/O. Missing or NaN
//! readings never get here — [`SensorSample::reading`] filters them.
//!
//! Alerts are emitted in a fixed priority order (temperature, then pH) so
//! the notification stream is deterministic.
//!
//! [`SensorSample::reading`]: crate::app::reading::SensorSample::reading

use heapless::Vec;

use crate::app::reading::{AlertEvent, AlertKind, Reading};
use crate::config::{IdealRange, SystemConfig};

/// Upper bound on alerts per evaluation (one per monitored quantity).
pub const MAX_ALERTS: usize = 2;

/// Stateless predicate set over the monitored quantities.
#[derive(Debug, Clone, Copy)]
pub struct RangeEvaluator {
    temperature: IdealRange,
    ph: IdealRange,
}

impl RangeEvaluator {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            temperature: config.temperature_range,
            ph: config.ph_range,
        }
    }

    /// Evaluate one reading. `timestamp_ms` is stamped onto every alert.
    pub fn evaluate(&self, reading: &Reading, timestamp_ms: u64) -> Vec<AlertEvent, MAX_ALERTS> {
        let checks = [
            (AlertKind::TemperatureOutOfRange, &self.temperature, reading.temperature_c),
            (AlertKind::PhOutOfRange, &self.ph, reading.ph),
        ];

        let mut alerts = Vec::new();
        for (kind, range, value) in checks {
            if range.is_violated_by(value) {
                // Capacity equals the number of checks.
                let _ = alerts.push(AlertEvent {
                    kind,
                    value,
                    timestamp_ms,
                });
            }
        }
        alerts
    }
}
