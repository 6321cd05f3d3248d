//! Application service — the hexagonal core.
//!
//! [`AquariumService`] owns the range evaluator, both actuator state
//! machines and the connection manager. One call to [`tick`] is one
//! scheduler iteration, minus the idle sleep. All I/O flows through port
//! traits injected at call sites, so the whole service runs against mock
//! adapters on the host.
//!
//! ```text
//!  Acceptor ───▶ ┌──────────────────────────┐ ──▶ EventSink
//!  SensorPort ─▶ │     AquariumService      │
//!  TimePort ───▶ │ Connection · Evaluator · │
//! ActuatorPort ◀─│       Actuators          │
//!                └──────────────────────────┘
//! ```
//!
//! [`tick`]: AquariumService::tick

use heapless::Vec;
use log::{debug, info};

use crate::actuators::{Actuator, ActuatorController};
use crate::config::SystemConfig;
use crate::error::ActuatorFault;
use crate::evaluator::{MAX_ALERTS, RangeEvaluator};
use crate::net::manager::{AcceptOutcome, ConnectionManager};
use crate::net::protocol::{Command, format_alert};
use crate::net::transport::Acceptor;

use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, SensorPort, TimePort};
use super::reading::{AlertEvent, Reading};

// ───────────────────────────────────────────────────────────────
// TickReport
// ───────────────────────────────────────────────────────────────

/// What one tick did. Returned for tests and diagnostics; the loop
/// itself ignores it.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub accept: AcceptOutcome,
    pub command: Option<Command>,
    /// `None` when any sensor failed this tick.
    pub reading: Option<Reading>,
    pub alerts: Vec<AlertEvent, MAX_ALERTS>,
    /// Alerts actually handed to a connected client.
    pub notified: usize,
    /// Outcome of a feeder sweep, if one ran.
    pub fed: Option<Result<(), ActuatorFault>>,
    /// Outcome of a pump run, if one ran.
    pub pumped: Option<Result<(), ActuatorFault>>,
}

// ───────────────────────────────────────────────────────────────
// AquariumService
// ───────────────────────────────────────────────────────────────

pub struct AquariumService<A: Acceptor> {
    evaluator: RangeEvaluator,
    actuators: ActuatorController,
    connection: ConnectionManager<A>,
    listen_port: u16,
    tick_count: u64,
}

impl<A: Acceptor> AquariumService<A> {
    pub fn new(config: &SystemConfig, acceptor: A) -> Self {
        Self {
            evaluator: RangeEvaluator::new(config),
            actuators: ActuatorController::new(config),
            connection: ConnectionManager::new(acceptor, config.client_idle_timeout_ms),
            listen_port: config.listen_port,
            tick_count: 0,
        }
    }

    /// Announce that the service is listening.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        info!("AquariumService started, listening on port {}", self.listen_port);
        sink.emit(&AppEvent::Started { port: self.listen_port });
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one iteration: accept → one command → sample → evaluate and
    /// notify → actuators.
    ///
    /// A client that connects while a session is active is only dealt with
    /// after that session has been read, so a reconnect behind a peer that
    /// just hung up is accepted in the same tick.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`]. Feeder and pump runs block for their full
    /// duration; the pump decision reads the clock again afterwards so
    /// its timestamps reflect the time spent feeding.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        clock: &impl TimePort,
        sink: &mut impl EventSink,
    ) -> TickReport {
        self.tick_count += 1;
        let now = clock.now_ms();

        // 1. Accept one pending client if the slot is free
        let had_session = self.connection.is_connected();
        let mut accept = self.connection.poll_accept(now, sink);

        // 2. At most one command line
        let command = self.connection.service(now, hw, sink);

        // A waiting client takes over a session that just ended, or is
        // turned away from one that is still live.
        if had_session {
            accept = if self.connection.is_connected() {
                self.connection.reject_pending(sink)
            } else {
                self.connection.poll_accept(now, sink)
            };
        }

        // 3. Sample
        let sample = hw.sample();
        for (quantity, error) in sample.failures() {
            sink.emit(&AppEvent::SensorFault { quantity, error });
        }
        let reading = sample.reading().ok();

        // 4. Evaluate and notify
        let mut alerts = Vec::new();
        let mut notified = 0;
        if let Some(r) = reading {
            alerts = self.evaluator.evaluate(&r, now);
            for alert in &alerts {
                sink.emit(&AppEvent::Alert(*alert));
                if self.connection.notify(&format_alert(alert), sink) {
                    notified += 1;
                }
            }
        } else {
            debug!("tick {}: incomplete sample, evaluation skipped", self.tick_count);
        }

        // 5. Actuators
        let fed = if self.actuators.maybe_trigger_feeder(now) {
            let result = self.actuators.run_feeder(hw);
            Self::report_actuator(Actuator::Feeder, result, sink);
            Some(result)
        } else {
            None
        };

        let pumped = match reading {
            Some(r) if self.actuators.maybe_activate_pump(r.water_level_cm, clock.now_ms()) => {
                let result = self.actuators.run_pump(hw, clock);
                Self::report_actuator(Actuator::Pump, result, sink);
                Some(result)
            }
            _ => None,
        };

        TickReport {
            accept,
            command,
            reading,
            alerts,
            notified,
            fed,
            pumped,
        }
    }

    fn report_actuator(actuator: Actuator, result: Result<(), ActuatorFault>, sink: &mut impl EventSink) {
        let event = match (actuator, result) {
            (_, Err(fault)) => AppEvent::ActuatorFault { actuator, fault },
            (Actuator::Feeder, Ok(())) => AppEvent::FeedCompleted,
            (Actuator::Pump, Ok(())) => AppEvent::PumpCompleted,
        };
        sink.emit(&event);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn actuators(&self) -> &ActuatorController {
        &self.actuators
    }

    pub fn connection(&self) -> &ConnectionManager<A> {
        &self.connection
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
