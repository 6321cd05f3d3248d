//! Command/notification protocol over a mock connection.

use aquactl::app::events::{AppEvent, DisconnectReason};
use aquactl::app::reading::Reading;
use aquactl::app::service::AquariumService;
use aquactl::config::SystemConfig;
use aquactl::error::{SensorError, TransportError};
use aquactl::net::codec::MAX_LINE_LEN;
use aquactl::net::manager::{AcceptOutcome, ConnectionState};
use aquactl::net::protocol::{BUSY_MESSAGE, Command, USAGE_MESSAGE};

use crate::mock_hw::{MockClock, MockHardware, RecordingSink, healthy};
use crate::mock_net::MockAcceptor;

struct Rig {
    clock: MockClock,
    hw: MockHardware,
    sink: RecordingSink,
    svc: AquariumService<MockAcceptor>,
    acceptor: MockAcceptor,
}

impl Rig {
    /// In-range tank, feeding disabled: the only output is protocol traffic.
    fn new() -> Self {
        Self::with_config(SystemConfig {
            feed_interval_ms: u32::MAX,
            ..SystemConfig::default()
        })
    }

    fn with_config(config: SystemConfig) -> Self {
        let clock = MockClock::new();
        let hw = MockHardware::new(&clock);
        let acceptor = MockAcceptor::new();
        Self {
            svc: AquariumService::new(&config, acceptor.clone()),
            clock,
            hw,
            sink: RecordingSink::new(),
            acceptor,
        }
    }

    fn tick(&mut self) -> aquactl::app::service::TickReport {
        let report = self.svc.tick(&mut self.hw, &self.clock, &mut self.sink);
        self.clock.advance(1_000);
        report
    }
}

const EXPECTED_REPORT: &str = "Temperature: 25.50 \u{00b0}C\n\
                               Turbidity: 5.00 NTU\n\
                               Water Level: 20.00 cm\n\
                               pH: 7.20\n";

// ── SEND_VALUES ───────────────────────────────────────────────

#[test]
fn send_values_variants_get_identical_reports() {
    let variants: [&[u8]; 5] = [
        b"SEND_VALUES\n",
        b"send_values\n",
        b"Send_Values\n",
        b"  send_VALUES \t\n",
        b"send_values\r\n",
    ];
    for line in variants {
        let mut rig = Rig::new();
        let client = rig.acceptor.dial();
        client.send(line);

        let report = rig.tick();

        assert_eq!(report.command, Some(Command::SendValues), "{line:?}");
        assert_eq!(client.take_output(), EXPECTED_REPORT, "{line:?}");
    }
}

#[test]
fn report_is_sampled_at_request_time() {
    let mut rig = Rig::new();
    let client = rig.acceptor.dial();
    rig.tick();
    let before = rig.hw.samples_taken;

    rig.hw.set_reading(Reading {
        temperature_c: 26.25,
        ..healthy()
    });
    client.send(b"SEND_VALUES\n");
    rig.tick();

    // One sample for the reply, one for the periodic evaluation.
    assert_eq!(rig.hw.samples_taken - before, 2);
    assert!(client.take_output().starts_with("Temperature: 26.25 \u{00b0}C\n"));
}

#[test]
fn failed_sensor_prints_not_available() {
    let mut rig = Rig::new();
    rig.hw.sample.turbidity_ntu = Err(SensorError::AdcReadFailed);
    let client = rig.acceptor.dial();
    client.send(b"send_values\n");
    rig.tick();

    let out = client.take_output();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "Turbidity: n/a");
}

// ── Unknown and blank input ───────────────────────────────────

#[test]
fn unknown_command_gets_usage_line_and_changes_nothing() {
    let mut rig = Rig::with_config(SystemConfig::default());
    let client = rig.acceptor.dial();
    rig.tick();
    client.take_output();
    let feeder_before = rig.svc.actuators().feeder().last_triggered_ms();
    let calls_before = rig.hw.calls.len();

    client.send(b"FOO\n");
    let report = rig.tick();

    assert_eq!(report.command, Some(Command::Unknown));
    assert_eq!(client.take_output(), USAGE_MESSAGE);
    assert_eq!(rig.svc.actuators().feeder().last_triggered_ms(), feeder_before);
    assert_eq!(rig.hw.calls.len(), calls_before);
    assert_eq!(rig.svc.connection().state(), ConnectionState::CommandWait);
}

#[test]
fn blank_lines_are_ignored() {
    let mut rig = Rig::new();
    let client = rig.acceptor.dial();
    client.send(b"\n   \r\n\n");

    let report = rig.tick();

    assert_eq!(report.command, None);
    assert_eq!(client.take_output(), "");
    assert!(rig.svc.connection().is_connected());
}

#[test]
fn one_command_per_tick() {
    let mut rig = Rig::new();
    let client = rig.acceptor.dial();
    client.send(b"FOO\nsend_values\n");

    assert_eq!(rig.tick().command, Some(Command::Unknown));
    assert_eq!(client.take_output(), USAGE_MESSAGE);

    assert_eq!(rig.tick().command, Some(Command::SendValues));
    assert_eq!(client.take_output(), EXPECTED_REPORT);
}

#[test]
fn command_split_across_reads_is_reassembled() {
    let mut rig = Rig::new();
    let client = rig.acceptor.dial();
    client.send(b"SEND_");
    assert_eq!(rig.tick().command, None);
    client.send(b"VALUES\n");
    assert_eq!(rig.tick().command, Some(Command::SendValues));
}

#[test]
fn overlong_line_drops_the_client() {
    let mut rig = Rig::new();
    let client = rig.acceptor.dial();
    client.send(&[b'x'; MAX_LINE_LEN + 10]);

    rig.tick();

    assert!(client.is_closed());
    assert_eq!(rig.svc.connection().state(), ConnectionState::Listening);
    assert!(rig
        .sink
        .events
        .contains(&AppEvent::ClientDisconnected(DisconnectReason::ProtocolError)));
}

// ── Session lifecycle ─────────────────────────────────────────

#[test]
fn second_client_is_told_busy_and_closed() {
    let mut rig = Rig::new();
    let first = rig.acceptor.dial();
    assert_eq!(rig.tick().accept, AcceptOutcome::Accepted);

    let second = rig.acceptor.dial();
    assert_eq!(rig.tick().accept, AcceptOutcome::Rejected);

    assert_eq!(second.take_output(), BUSY_MESSAGE);
    assert!(second.is_closed());
    assert!(!first.is_closed());
    assert_eq!(rig.sink.count(|e| *e == AppEvent::ClientRejected), 1);

    // The first session is unaffected.
    first.send(b"send_values\n");
    assert_eq!(rig.tick().command, Some(Command::SendValues));
}

#[test]
fn new_client_accepted_after_disconnect() {
    let mut rig = Rig::new();
    let first = rig.acceptor.dial();
    rig.tick();
    first.hang_up();
    rig.tick();
    assert_eq!(rig.svc.connection().state(), ConnectionState::Listening);
    assert!(rig
        .sink
        .events
        .contains(&AppEvent::ClientDisconnected(DisconnectReason::PeerClosed)));

    let second = rig.acceptor.dial();
    second.send(b"send_values\n");
    let report = rig.tick();
    assert_eq!(report.accept, AcceptOutcome::Accepted);
    assert_eq!(second.take_output(), EXPECTED_REPORT);
}

#[test]
fn write_failure_during_alert_tears_session_down() {
    let mut rig = Rig::new();
    rig.hw.set_reading(Reading {
        temperature_c: 40.0,
        ..healthy()
    });
    let client = rig.acceptor.dial();
    client.break_writes();

    let report = rig.tick();

    assert_eq!(report.notified, 0);
    assert!(client.is_closed());
    assert!(rig
        .sink
        .events
        .contains(&AppEvent::ClientDisconnected(DisconnectReason::Transport(
            TransportError::Io
        ))));
}

#[test]
fn idle_client_evicted_after_timeout() {
    let mut rig = Rig::with_config(SystemConfig {
        feed_interval_ms: u32::MAX,
        client_idle_timeout_ms: 3_000,
        ..SystemConfig::default()
    });
    let client = rig.acceptor.dial();
    rig.tick(); // t = 0: accepted
    rig.tick(); // t = 1000
    rig.tick(); // t = 2000
    assert!(!client.is_closed());
    rig.tick(); // t = 3000
    assert!(client.is_closed());
    assert!(rig
        .sink
        .events
        .contains(&AppEvent::ClientDisconnected(DisconnectReason::IdleTimeout)));
}

#[test]
fn idle_client_kept_forever_when_timeout_disabled() {
    let mut rig = Rig::new();
    let client = rig.acceptor.dial();
    for _ in 0..100 {
        rig.tick();
    }
    assert!(!client.is_closed());
    assert!(rig.svc.connection().is_connected());
}

#[test]
fn reconnect_after_hang_up_is_accepted_in_one_tick() {
    let mut rig = Rig::new();
    let first = rig.acceptor.dial();
    rig.tick();

    first.hang_up();
    let second = rig.acceptor.dial();
    second.send(b"send_values\n");
    let report = rig.tick();

    assert_eq!(report.accept, AcceptOutcome::Accepted);
    assert_eq!(second.take_output(), "");
    assert!(!second.is_closed());
    assert!(rig.svc.connection().is_connected());
    assert_eq!(rig.sink.count(|e| *e == AppEvent::ClientRejected), 0);

    // The queued command is served on the next tick.
    assert_eq!(rig.tick().command, Some(Command::SendValues));
    assert_eq!(second.take_output(), EXPECTED_REPORT);
}

// ── Back-pressure ─────────────────────────────────────────────

#[test]
fn slow_reader_still_receives_whole_lines() {
    let mut rig = Rig::new();
    rig.hw.set_reading(Reading {
        temperature_c: 30.0,
        ph: 6.2,
        ..healthy()
    });
    let client = rig.acceptor.dial();
    client.limit_writes(10);

    // The first alert is cut short and held; the second is dropped whole.
    let report = rig.tick();
    assert_eq!(report.alerts.len(), 2);
    assert_eq!(report.notified, 1);
    assert_eq!(client.take_output(), "ALERT! Tem");

    client.drain_writes();
    let report = rig.tick();
    assert_eq!(report.notified, 2);

    assert_eq!(
        client.take_output(),
        concat!(
            "perature out of range: 30.00 \u{00b0}C\n",
            "ALERT! Temperature out of range: 30.00 \u{00b0}C\n",
            "ALERT! pH out of range: 6.20\n",
        )
    );
    assert!(!client.is_closed());
}

#[test]
fn reply_to_a_full_socket_is_dropped_not_garbled() {
    let mut rig = Rig::new();
    let client = rig.acceptor.dial();
    client.limit_writes(0);
    client.send(b"send_values\n");
    assert_eq!(rig.tick().command, Some(Command::SendValues));
    assert_eq!(client.take_output(), "");

    client.drain_writes();
    client.send(b"send_values\n");
    rig.tick();
    assert_eq!(client.take_output(), EXPECTED_REPORT);
}
