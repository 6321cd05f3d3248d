//! Connection manager — owns at most one client session.
//!
//! ```text
//!  Listening ──accept──▶ CommandWait ◀──▶ Responding
//!      ▲                      │
//!      └──── close / error / protocol error / idle timeout
//! ```
//!
//! Every operation here is bounded: one accept attempt, one read and at
//! most one command per tick. The scheduler loop relies on this for
//! fairness; nothing in this module ever waits on a peer.
//!
//! A second client arriving while a session is active is accepted only
//! long enough to be told [`BUSY_MESSAGE`] and is then closed, so it is
//! never left hanging in the listen backlog. That check runs after the
//! live session has been read, so a client replacing one that already
//! hung up takes over the slot instead of being turned away.
//!
//! Outbound messages are whole lines. A message the socket only partly
//! takes keeps its tail in a small buffer that is flushed before anything
//! else is written.

use heapless::Vec;
use log::{debug, info, warn};

use crate::app::events::{AppEvent, DisconnectReason};
use crate::app::ports::{EventSink, SensorPort};
use crate::error::TransportError;

use super::codec::{LineBuffer, MAX_LINE_LEN};
use super::protocol::{BUSY_MESSAGE, Command, REPORT_CAPACITY, USAGE_MESSAGE, format_report};
use super::transport::{Acceptor, Connection, write_some};

/// Externally visible connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No client; accept attempts are made every tick.
    Listening,
    /// A client is attached and commands are serviced.
    CommandWait,
}

/// Result of one accept attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// Nobody was waiting.
    Idle,
    /// A new session was created.
    Accepted,
    /// A client was turned away because a session is already active.
    Rejected,
}

/// Room for the unsent tail of one message; a full report fits.
const OUTBOUND_CAPACITY: usize = REPORT_CAPACITY;

/// The single live client.
struct ClientSession<C> {
    conn: C,
    inbound: LineBuffer,
    /// Tail of a partly written message, sent before anything new.
    outbound: Vec<u8, OUTBOUND_CAPACITY>,
    last_activity_ms: u64,
}

impl<C: Connection> ClientSession<C> {
    /// Push out a held tail. `Ok(true)` once nothing is pending.
    fn flush(&mut self) -> Result<bool, TransportError> {
        let sent = write_some(&mut self.conn, &self.outbound)?;
        let len = self.outbound.len();
        self.outbound.copy_within(sent..len, 0);
        self.outbound.truncate(len - sent);
        Ok(self.outbound.is_empty())
    }

    /// Start one message. Messages never interleave on the wire: either
    /// nothing of it is written (`Ok(false)`) or whatever the socket did
    /// not take is held and flushed ahead of the next message.
    fn send(&mut self, message: &[u8]) -> Result<bool, TransportError> {
        if !self.flush()? {
            return Ok(false);
        }
        let sent = write_some(&mut self.conn, message)?;
        if sent == 0 && !message.is_empty() {
            return Ok(false);
        }
        // The tail cannot be dropped without breaking line framing.
        self.outbound
            .extend_from_slice(&message[sent..])
            .map_err(|()| TransportError::Overflow)?;
        Ok(true)
    }
}

pub struct ConnectionManager<A: Acceptor> {
    acceptor: A,
    session: Option<ClientSession<A::Conn>>,
    /// `0` disables idle eviction.
    idle_timeout_ms: u64,
}

/// What servicing the session decided, applied after the borrow ends.
enum Step {
    Continue(Option<Command>),
    Close(DisconnectReason),
}

impl<A: Acceptor> ConnectionManager<A> {
    pub fn new(acceptor: A, idle_timeout_ms: u32) -> Self {
        Self {
            acceptor,
            session: None,
            idle_timeout_ms: u64::from(idle_timeout_ms),
        }
    }

    pub fn state(&self) -> ConnectionState {
        if self.session.is_some() {
            ConnectionState::CommandWait
        } else {
            ConnectionState::Listening
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn acceptor(&self) -> &A {
        &self.acceptor
    }

    // ── Accept ────────────────────────────────────────────────

    /// Make a single non-blocking accept attempt if the slot is free.
    ///
    /// With a session active the backlog is left alone; see
    /// [`reject_pending`](Self::reject_pending).
    pub fn poll_accept(&mut self, now_ms: u64, sink: &mut impl EventSink) -> AcceptOutcome {
        if self.session.is_some() {
            return AcceptOutcome::Idle;
        }
        let Some(conn) = self.next_pending() else {
            return AcceptOutcome::Idle;
        };

        self.session = Some(ClientSession {
            conn,
            inbound: LineBuffer::new(),
            outbound: Vec::new(),
            last_activity_ms: now_ms,
        });
        info!("NET: client connected");
        sink.emit(&AppEvent::ClientConnected);
        AcceptOutcome::Accepted
    }

    /// Turn away one waiting client while a session is active.
    ///
    /// Call after [`service`](Self::service), so a session whose peer has
    /// already gone is torn down first and its successor gets the slot.
    pub fn reject_pending(&mut self, sink: &mut impl EventSink) -> AcceptOutcome {
        if self.session.is_none() {
            return AcceptOutcome::Idle;
        }
        let Some(mut conn) = self.next_pending() else {
            return AcceptOutcome::Idle;
        };
        // Best effort; the socket is closed either way.
        let _ = write_some(&mut conn, BUSY_MESSAGE.as_bytes());
        conn.close();
        info!("NET: rejected second client (busy)");
        sink.emit(&AppEvent::ClientRejected);
        AcceptOutcome::Rejected
    }

    fn next_pending(&mut self) -> Option<A::Conn> {
        match self.acceptor.poll_accept() {
            Ok(conn) => conn,
            Err(e) => {
                warn!("NET: accept failed: {}", e);
                None
            }
        }
    }

    // ── Service ───────────────────────────────────────────────

    /// Read what is available and handle at most one command.
    ///
    /// `SEND_VALUES` samples `sensors` at request time so the reply is
    /// never older than the request. Blank lines are consumed silently.
    pub fn service(
        &mut self,
        now_ms: u64,
        sensors: &mut impl SensorPort,
        sink: &mut impl EventSink,
    ) -> Option<Command> {
        let idle_timeout_ms = self.idle_timeout_ms;
        let session = self.session.as_mut()?;

        let step = Self::service_session(session, now_ms, idle_timeout_ms, sensors);
        match step {
            Step::Continue(command) => {
                if let Some(cmd) = command {
                    sink.emit(&AppEvent::CommandHandled(cmd));
                }
                command
            }
            Step::Close(reason) => {
                self.close(reason, sink);
                None
            }
        }
    }

    fn service_session(
        session: &mut ClientSession<A::Conn>,
        now_ms: u64,
        idle_timeout_ms: u64,
        sensors: &mut impl SensorPort,
    ) -> Step {
        if let Err(e) = session.flush() {
            return Step::Close(DisconnectReason::Transport(e));
        }

        let free = session.inbound.free();
        if free > 0 {
            let mut buf = [0u8; MAX_LINE_LEN];
            match session.conn.read(&mut buf[..free]) {
                Ok(0) => {}
                Ok(n) => {
                    session.inbound.feed(&buf[..n]);
                    session.last_activity_ms = now_ms;
                }
                Err(TransportError::Closed) => return Step::Close(DisconnectReason::PeerClosed),
                Err(e) => return Step::Close(DisconnectReason::Transport(e)),
            }
        }

        // Blank lines are skipped; the loop is bounded by the buffer size.
        let mut command = None;
        while let Some(line) = session.inbound.next_line() {
            if let Some(cmd) = Command::parse(&line) {
                command = Some(cmd);
                break;
            }
        }

        if let Some(cmd) = command {
            let reply = match cmd {
                Command::SendValues => session.send(format_report(&sensors.sample()).as_bytes()),
                Command::Unknown => session.send(USAGE_MESSAGE.as_bytes()),
            };
            match reply {
                Ok(true) => debug!("NET: answered {:?}", cmd),
                Ok(false) => warn!("NET: send buffer full, reply to {:?} dropped", cmd),
                Err(e) => return Step::Close(DisconnectReason::Transport(e)),
            }
            return Step::Continue(Some(cmd));
        }

        if session.inbound.is_full() {
            warn!("NET: line exceeds {} bytes", MAX_LINE_LEN);
            return Step::Close(DisconnectReason::ProtocolError);
        }

        if idle_timeout_ms > 0 && now_ms.saturating_sub(session.last_activity_ms) >= idle_timeout_ms {
            return Step::Close(DisconnectReason::IdleTimeout);
        }

        Step::Continue(None)
    }

    // ── Notify ────────────────────────────────────────────────

    /// Fire-and-forget send to the active session.
    ///
    /// Returns `true` once the message is committed to the wire, possibly
    /// with its tail held for a later flush. With no session, or a send
    /// buffer that has not drained an earlier tail, the message is dropped
    /// whole. A hard write error tears the session down.
    pub fn notify(&mut self, message: &str, sink: &mut impl EventSink) -> bool {
        let Some(session) = self.session.as_mut() else {
            debug!("NET: no client, dropping notification");
            return false;
        };
        match session.send(message.as_bytes()) {
            Ok(true) => true,
            Ok(false) => {
                warn!("NET: send buffer full, notification dropped");
                false
            }
            Err(e) => {
                self.close(DisconnectReason::Transport(e), sink);
                false
            }
        }
    }

    // ── Teardown ──────────────────────────────────────────────

    fn close(&mut self, reason: DisconnectReason, sink: &mut impl EventSink) {
        if let Some(mut session) = self.session.take() {
            session.conn.close();
            info!("NET: client disconnected ({:?})", reason);
            sink.emit(&AppEvent::ClientDisconnected(reason));
        }
    }
}
