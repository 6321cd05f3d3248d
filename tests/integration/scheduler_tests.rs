//! Scheduler loop timing: ordering, sleep, and the starvation bound.

use aquactl::app::ports::TimePort;
use aquactl::app::service::AquariumService;
use aquactl::config::SystemConfig;
use aquactl::net::manager::AcceptOutcome;
use aquactl::net::protocol::{BUSY_MESSAGE, Command};
use aquactl::scheduler::Scheduler;

use crate::mock_hw::{MockClock, MockDelay, MockHardware, RecordingSink, SWEEP_MS};
use crate::mock_net::MockAcceptor;

fn scheduler(config: &SystemConfig) -> (Scheduler<MockAcceptor>, MockAcceptor) {
    let acceptor = MockAcceptor::new();
    let service = AquariumService::new(config, acceptor.clone());
    (Scheduler::new(service, config.tick_period_ms), acceptor)
}

#[test]
fn each_tick_sleeps_one_period_and_runs_housekeeping() {
    let config = SystemConfig {
        feed_interval_ms: u32::MAX,
        ..SystemConfig::default()
    };
    let clock = MockClock::new();
    let mut hw = MockHardware::new(&clock);
    let mut delay = MockDelay::new(&clock);
    let mut sink = RecordingSink::new();
    let (mut sched, _acceptor) = scheduler(&config);

    // First tick feeds; skip it.
    sched.tick_once(&mut hw, &clock, &mut delay, &mut sink, &mut |_| {});
    let start = delay.total_ms;

    let mut seen = Vec::new();
    for _ in 0..3 {
        sched.tick_once(&mut hw, &clock, &mut delay, &mut sink, &mut |now| seen.push(now));
    }

    assert_eq!(delay.total_ms - start, 3 * u64::from(config.tick_period_ms));
    assert_eq!(seen, [SWEEP_MS + 1_000, SWEEP_MS + 2_000, SWEEP_MS + 3_000]);
    assert_eq!(sched.service().tick_count(), 4);
}

#[test]
fn sensors_sampled_every_tick_with_idle_client() {
    let config = SystemConfig::default();
    let clock = MockClock::new();
    let mut hw = MockHardware::new(&clock);
    let mut delay = MockDelay::new(&clock);
    let mut sink = RecordingSink::new();
    let (mut sched, acceptor) = scheduler(&config);
    let _idle = acceptor.dial();

    for _ in 0..10 {
        sched.tick_once(&mut hw, &clock, &mut delay, &mut sink, &mut |_| {});
    }

    assert_eq!(hw.samples_taken, 10);
    assert!(sched.service().connection().is_connected());
}

#[test]
fn pending_client_served_in_the_tick_after_a_sweep() {
    let config = SystemConfig {
        feed_interval_ms: 2_000,
        ..SystemConfig::default()
    };
    let clock = MockClock::new();
    let mut hw = MockHardware::new(&clock);
    let mut delay = MockDelay::new(&clock);
    let mut sink = RecordingSink::new();
    let (mut sched, acceptor) = scheduler(&config);

    // An idle client holds the session while the feeder fires.
    let idle = acceptor.dial();
    let first = sched.tick_once(&mut hw, &clock, &mut delay, &mut sink, &mut |_| {});
    assert_eq!(first.accept, AcceptOutcome::Accepted);
    assert!(first.fed.is_some());

    // A second client shows up during the blocking phase.
    let dialled_at = clock.now_ms();
    let late = acceptor.dial();
    let second = sched.tick_once(&mut hw, &clock, &mut delay, &mut sink, &mut |_| {});

    assert_eq!(second.accept, AcceptOutcome::Rejected);
    assert_eq!(late.take_output(), BUSY_MESSAGE);
    assert!(second.fed.is_some(), "feeder was due again");
    // Served before the next sleep, i.e. within one tick period of dialling.
    assert!(clock.now_ms() - dialled_at <= SWEEP_MS + u64::from(config.tick_period_ms));

    // The idle session still answers afterwards.
    idle.send(b"send_values\n");
    let third = sched.tick_once(&mut hw, &clock, &mut delay, &mut sink, &mut |_| {});
    assert_eq!(third.command, Some(Command::SendValues));
}
