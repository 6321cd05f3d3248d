//! Connection Manager — single-client, line-oriented command protocol.
//!
//! ```text
//!  Acceptor ──poll_accept──▶ ConnectionManager ──line──▶ protocol::Command
//!                                   │                          │
//!                                   └──notify(ALERT!)   SEND_VALUES ─▶ SensorPort
//! ```
//!
//! - [`transport`] — non-blocking accept/read/write port traits.
//! - [`codec`] — fixed-capacity newline framing.
//! - [`protocol`] — command parsing and reply/alert formatting.
//! - [`manager`] — session ownership and bounded per-tick servicing.

pub mod codec;
pub mod manager;
pub mod protocol;
pub mod transport;
