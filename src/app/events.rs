//! Outbound application events.
//!
//! The [`AquariumService`](super::service::AquariumService) and the
//! connection manager emit these through the
//! [`EventSink`](super::ports::EventSink) port. This is the only channel
//! through which actuator faults and sensor failures are surfaced.

use crate::actuators::Actuator;
use crate::error::{ActuatorFault, SensorError, TransportError};
use crate::net::protocol::Command;

use super::reading::{AlertEvent, Quantity};

/// Why a client session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// Orderly close by the peer.
    PeerClosed,
    /// Read or write failed.
    Transport(TransportError),
    /// The peer sent a line longer than the inbound buffer.
    ProtocolError,
    /// No bytes received within the configured idle timeout.
    IdleTimeout,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// The service is up and listening.
    Started { port: u16 },

    /// A client session was accepted.
    ClientConnected,

    /// The active client session was torn down.
    ClientDisconnected(DisconnectReason),

    /// A second client was turned away while a session was active.
    ClientRejected,

    /// A command line was parsed and answered.
    CommandHandled(Command),

    /// A reading left its ideal range.
    Alert(AlertEvent),

    /// A sensor produced no usable value this tick.
    SensorFault { quantity: Quantity, error: SensorError },

    /// A feeding sweep finished.
    FeedCompleted,

    /// A pump run finished.
    PumpCompleted,

    /// A commanded physical action failed. Not retried.
    ActuatorFault { actuator: Actuator, fault: ActuatorFault },
}
