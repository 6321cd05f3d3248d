//! Scheduler loop — the cooperative, single-threaded top level.
//!
//! ```text
//!  accept ─▶ command ─▶ sample ─▶ evaluate/notify     (non-blocking)
//!     ─▶ feeder sweep ─▶ pump run                     (blocking, when due)
//!     ─▶ housekeeping ─▶ fixed sleep ─▶ next tick
//! ```
//!
//! There is one thread of control and no preemption. The only suspension
//! points are the fixed sleep and the two blocking actuator runs, so the
//! worst-case delay before a pending client is seen is one tick period
//! plus one feed sweep plus one pump run.

use embedded_hal::delay::DelayNs;
use log::info;

use crate::app::ports::{ActuatorPort, EventSink, SensorPort, TimePort};
use crate::app::service::{AquariumService, TickReport};
use crate::net::transport::Acceptor;

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

pub struct Scheduler<A: Acceptor> {
    service: AquariumService<A>,
    tick_period_ms: u32,
}

impl<A: Acceptor> Scheduler<A> {
    pub fn new(service: AquariumService<A>, tick_period_ms: u32) -> Self {
        Self {
            service,
            tick_period_ms,
        }
    }

    /// One full iteration including the idle sleep.
    ///
    /// `housekeeping` runs after the service tick with the current time;
    /// it must not block (the Wi-Fi adapter's reconnect poll is the only
    /// user on the device).
    pub fn tick_once(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        clock: &impl TimePort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
        housekeeping: &mut impl FnMut(u64),
    ) -> TickReport {
        let report = self.service.tick(hw, clock, sink);
        housekeeping(clock.now_ms());
        delay.delay_ms(self.tick_period_ms);
        report
    }

    /// Start the service and tick forever.
    pub fn run(
        mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        clock: &impl TimePort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
        mut housekeeping: impl FnMut(u64),
    ) -> ! {
        self.service.start(sink);
        info!("Scheduler: tick period {} ms", self.tick_period_ms);
        loop {
            self.tick_once(hw, clock, delay, sink, &mut housekeeping);
        }
    }

    pub fn service(&self) -> &AquariumService<A> {
        &self.service
    }
}
