//! TCP transport adapter.
//!
//! Implements [`Acceptor`] and [`Connection`] over `std::net`. ESP-IDF
//! ships a std-compatible socket layer on top of lwIP, so the same code
//! runs on the device and on the host; no cfg split is needed here.
//!
//! ## Connection model
//!
//! 1. [`TcpAcceptor::bind`] listens on `0.0.0.0:<port>` in non-blocking
//!    mode.
//! 2. `poll_accept()` returns at most one pending client per call; the
//!    client socket is switched to non-blocking before it is handed out.
//! 3. Reads return `Ok(0)` when no data is waiting and
//!    `Err(TransportError::Closed)` on EOF.
//! 4. `close()` shuts the socket down in both directions and drops it.

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};

use log::{debug, info, warn};

use crate::error::TransportError;
use crate::net::transport::{Acceptor, Connection};

// ───────────────────────────────────────────────────────────────
// TcpAcceptor
// ───────────────────────────────────────────────────────────────

pub struct TcpAcceptor {
    listener: TcpListener,
}

impl TcpAcceptor {
    /// Bind `0.0.0.0:<port>`. Pass port `0` to let the OS pick one (use
    /// [`local_addr()`](Self::local_addr) to discover it).
    pub fn bind(port: u16) -> Result<Self, TransportError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).map_err(|e| {
            warn!("TCP: bind to port {} failed: {}", port, e);
            TransportError::Bind
        })?;
        listener.set_nonblocking(true).map_err(|_| TransportError::Bind)?;
        info!("TCP: listening on port {}", port);
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.listener.local_addr().map_err(|_| TransportError::Io)
    }
}

impl Acceptor for TcpAcceptor {
    type Conn = TcpConnection;

    fn poll_accept(&mut self) -> Result<Option<TcpConnection>, TransportError> {
        match self.listener.accept() {
            Ok((stream, addr)) => {
                stream.set_nonblocking(true).map_err(|_| TransportError::Io)?;
                // Replies are small and latency matters more than packing.
                let _ = stream.set_nodelay(true);
                debug!("TCP: connection from {}", addr);
                Ok(Some(TcpConnection { stream: Some(stream) }))
            }
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(e) => {
                warn!("TCP: accept error: {}", e);
                Err(TransportError::Io)
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// TcpConnection
// ───────────────────────────────────────────────────────────────

pub struct TcpConnection {
    /// `None` once closed.
    stream: Option<TcpStream>,
}

impl Connection for TcpConnection {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::Closed)?;
        match stream.read(buf) {
            Ok(0) if !buf.is_empty() => Err(TransportError::Closed),
            Ok(n) => Ok(n),
            Err(ref e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => Ok(0),
            Err(ref e) if e.kind() == ErrorKind::ConnectionReset => Err(TransportError::Closed),
            Err(_) => Err(TransportError::Io),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::Closed)?;
        match stream.write(data) {
            Ok(n) => Ok(n),
            Err(ref e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => Ok(0),
            Err(ref e) if matches!(e.kind(), ErrorKind::BrokenPipe | ErrorKind::ConnectionReset) => {
                Err(TransportError::Closed)
            }
            Err(_) => Err(TransportError::Io),
        }
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests (loopback)
// ───────────────────────────────────────────────────────────────
