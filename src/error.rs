//! Error taxonomy for the aquarium controller.
//!
//! Three families, each handled at a different layer and none of them
//! allowed to stop the scheduler loop:
//!
//! | Type             | Raised by              | Handling                          |
//! |------------------|------------------------|-----------------------------------|
//! | [`SensorError`]    | sensor converters      | skip evaluation for this tick     |
//! | [`ActuatorFault`]  | feeder / pump drivers  | log + event, never retried        |
//! | [`TransportError`] | TCP acceptor / session | tear down session, keep listening |
//!
//! All variants are `Copy` so they can ride inside [`AppEvent`]s without
//! allocation.
//!
//! [`AppEvent`]: crate::app::events::AppEvent

use core::fmt;

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// A sensor produced no usable value this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC read returned an error or timed out.
    AdcReadFailed,
    /// Reading is outside the physically plausible range (open/short
    /// circuit, disconnected probe).
    OutOfRange,
    /// Conversion produced NaN or infinity.
    NotANumber,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
            Self::NotANumber => write!(f, "reading is not a number"),
        }
    }
}

impl std::error::Error for SensorError {}

// ---------------------------------------------------------------------------
// Actuator faults
// ---------------------------------------------------------------------------

/// A commanded physical action did not reach its expected end state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorFault {
    /// Servo PWM duty-cycle write failed.
    PwmWriteFailed,
    /// Relay GPIO write failed while energising.
    GpioWriteFailed,
    /// Relay could not be de-energised at the end of a run.
    RelayStuck,
    /// A run was requested without a preceding successful trigger.
    NotArmed,
}

impl fmt::Display for ActuatorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::RelayStuck => write!(f, "relay did not release"),
            Self::NotArmed => write!(f, "actuator not armed"),
        }
    }
}

impl std::error::Error for ActuatorFault {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Connection accept/read/write failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Listener could not be bound or configured.
    Bind,
    /// Socket I/O failure.
    Io,
    /// Peer closed the connection.
    Closed,
    /// An unsent message tail did not fit the outbound buffer.
    Overflow,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind => write!(f, "listener bind failed"),
            Self::Io => write!(f, "socket I/O error"),
            Self::Closed => write!(f, "peer closed connection"),
            Self::Overflow => write!(f, "outbound buffer overflow"),
        }
    }
}

impl std::error::Error for TransportError {}
