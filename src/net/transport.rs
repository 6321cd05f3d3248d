//! Transport abstraction — a listening socket and its client connections.
//!
//! Both traits are strictly non-blocking: the scheduler calls them once
//! per tick and must never stall on a silent peer.
//!
//! Concrete implementations:
//! - [`TcpAcceptor`](crate::adapters::tcp::TcpAcceptor) over `std::net`
//!   (lwIP on ESP-IDF, the host stack in tests)
//! - in-memory mocks in the integration tests

use crate::error::TransportError;

/// A listening endpoint that hands out client connections.
pub trait Acceptor {
    type Conn: Connection;

    /// Accept one pending connection, if any. `Ok(None)` when nobody is
    /// waiting.
    fn poll_accept(&mut self) -> Result<Option<Self::Conn>, TransportError>;
}

/// One accepted byte stream.
pub trait Connection {
    /// Read up to `buf.len()` bytes.
    ///
    /// Returns `Ok(0)` when no data is available right now and
    /// `Err(TransportError::Closed)` once the peer has closed its side.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Write as much of `data` as the socket takes without blocking.
    /// Returns `Ok(0)` when the send buffer is full.
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError>;

    /// Release the socket. Further calls are undefined.
    fn close(&mut self);
}

/// Write as much of `data` as the socket takes right now.
///
/// Loops over short writes and stops when the socket reports full.
/// Returns the number of bytes written; the caller owns the rest.
pub fn write_some(conn: &mut impl Connection, data: &[u8]) -> Result<usize, TransportError> {
    let mut sent = 0;
    while sent < data.len() {
        match conn.write(&data[sent..])? {
            0 => break,
            n => sent += n.min(data.len() - sent),
        }
    }
    Ok(sent)
}
