//! Loopback test: real sockets, mock sensors and actuators.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use aquactl::adapters::tcp::TcpAcceptor;
use aquactl::app::service::AquariumService;
use aquactl::config::SystemConfig;
use aquactl::net::manager::AcceptOutcome;
use aquactl::net::protocol::{BUSY_MESSAGE, Command, USAGE_MESSAGE};

use crate::mock_hw::{MockClock, MockHardware, RecordingSink};

fn read_lines(reader: &mut BufReader<TcpStream>, n: usize) -> Vec<String> {
    (0..n)
        .map(|_| {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            line
        })
        .collect()
}

#[test]
fn send_values_round_trip_over_loopback() {
    let acceptor = TcpAcceptor::bind(0).unwrap();
    let port = acceptor.local_addr().unwrap().port();
    let config = SystemConfig {
        feed_interval_ms: u32::MAX,
        ..SystemConfig::default()
    };
    let mut svc = AquariumService::new(&config, acceptor);
    let clock = MockClock::new();
    let mut hw = MockHardware::new(&clock);
    let mut sink = RecordingSink::new();

    let mut client = TcpStream::connect(("127.0.0.1", port)).unwrap();
    client.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
    client.write_all(b"send_values\nFOO\n").unwrap();
    thread::sleep(Duration::from_millis(50));

    let first = svc.tick(&mut hw, &clock, &mut sink);
    assert_eq!(first.accept, AcceptOutcome::Accepted);
    assert_eq!(first.command, Some(Command::SendValues));

    let second = svc.tick(&mut hw, &clock, &mut sink);
    assert_eq!(second.command, Some(Command::Unknown));

    let mut reader = BufReader::new(client);
    let report = read_lines(&mut reader, 4);
    assert_eq!(report[0], "Temperature: 25.50 \u{00b0}C\n");
    assert_eq!(report[3], "pH: 7.20\n");
    assert_eq!(read_lines(&mut reader, 1)[0], USAGE_MESSAGE);
}

#[test]
fn second_socket_receives_busy_and_eof() {
    let acceptor = TcpAcceptor::bind(0).unwrap();
    let port = acceptor.local_addr().unwrap().port();
    let mut svc = AquariumService::new(&SystemConfig::default(), acceptor);
    let clock = MockClock::new();
    let mut hw = MockHardware::new(&clock);
    let mut sink = RecordingSink::new();

    let _first = TcpStream::connect(("127.0.0.1", port)).unwrap();
    thread::sleep(Duration::from_millis(50));
    assert_eq!(svc.tick(&mut hw, &clock, &mut sink).accept, AcceptOutcome::Accepted);

    let second = TcpStream::connect(("127.0.0.1", port)).unwrap();
    second.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
    thread::sleep(Duration::from_millis(50));
    assert_eq!(svc.tick(&mut hw, &clock, &mut sink).accept, AcceptOutcome::Rejected);

    let mut reader = BufReader::new(second);
    assert_eq!(read_lines(&mut reader, 1)[0], BUSY_MESSAGE);
    let mut rest = String::new();
    assert_eq!(reader.read_line(&mut rest).unwrap(), 0);
}
