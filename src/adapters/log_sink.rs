//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production). Each record is one
//! line with a fixed tag so serial captures can be grepped.

use log::{error, info, warn};

use crate::actuators::Actuator;
use crate::app::events::{AppEvent, DisconnectReason};
use crate::app::ports::EventSink;
use crate::app::reading::AlertKind;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { port } => {
                info!("START | listening on port {}", port);
            }
            AppEvent::ClientConnected => {
                info!("NET | client connected");
            }
            AppEvent::ClientDisconnected(reason) => match reason {
                DisconnectReason::Transport(e) => warn!("NET | client dropped: {}", e),
                other => info!("NET | client disconnected ({:?})", other),
            },
            AppEvent::ClientRejected => {
                info!("NET | second client rejected (busy)");
            }
            AppEvent::CommandHandled(cmd) => {
                info!("NET | command {:?}", cmd);
            }
            AppEvent::Alert(alert) => {
                let what = match alert.kind {
                    AlertKind::TemperatureOutOfRange => "temperature",
                    AlertKind::PhOutOfRange => "pH",
                };
                warn!("ALERT | {} out of range: {:.2} @ {} ms", what, alert.value, alert.timestamp_ms);
            }
            AppEvent::SensorFault { quantity, error } => {
                warn!("SENSOR | {:?} unavailable: {}", quantity, error);
            }
            AppEvent::FeedCompleted => {
                info!("FEED | sweep complete");
            }
            AppEvent::PumpCompleted => {
                info!("PUMP | run complete");
            }
            AppEvent::ActuatorFault { actuator, fault } => {
                let tag = match actuator {
                    Actuator::Feeder => "FEED",
                    Actuator::Pump => "PUMP",
                };
                error!("{} | fault: {}", tag, fault);
            }
        }
    }
}
