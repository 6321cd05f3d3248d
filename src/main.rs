//! AquaCtl firmware — main entry point.
//!
//! Boot, wire adapters to the domain core, then hand control to the
//! scheduler loop for the lifetime of the device.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   TcpAcceptor   Esp32Time      │
//! │  (Sensor+Actuator) (EventSink)    (Acceptor)    (TimePort)     │
//! │  WifiAdapter                                                   │
//! │  (Connectivity)                                                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            AquariumService (pure logic)                │    │
//! │  │  ConnectionManager · RangeEvaluator · Actuators        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (tick + fixed sleep, forever)                       │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::{info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::EspWifi;

use aquactl::adapters::hardware::HardwareAdapter;
use aquactl::adapters::log_sink::LogEventSink;
use aquactl::adapters::tcp::TcpAcceptor;
use aquactl::adapters::time::{Esp32TimeAdapter, SystemDelay};
use aquactl::adapters::wifi::{ConnectivityPort, WifiAdapter};
use aquactl::app::ports::{ActuatorPort, TimePort};
use aquactl::app::service::AquariumService;
use aquactl::config::SystemConfig;
use aquactl::drivers::adc::AdcChannel;
use aquactl::drivers::hw_init;
use aquactl::drivers::outputs::{GpioOutput, LedcPwm};
use aquactl::drivers::relay::PumpRelay;
use aquactl::drivers::servo::FeederServo;
use aquactl::pins;
use aquactl::scheduler::Scheduler;
use aquactl::sensors::SensorHub;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  AquaCtl v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (fixed at build time) ────────────────
    let config = SystemConfig::load();
    info!(
        "Config: port={} temp=[{}, {}] pH=[{}, {}] feed every {} ms, tick {} ms",
        config.listen_port,
        config.temperature_range.min,
        config.temperature_range.max,
        config.ph_range.min,
        config.ph_range.max,
        config.feed_interval_ms,
        config.tick_period_ms,
    );

    // ── 3. Hardware peripherals ───────────────────────────────
    hw_init::init_peripherals().context("peripheral init")?;

    let hub = SensorHub::new(
        AdcChannel::new(pins::TEMPERATURE_ADC_CHANNEL),
        AdcChannel::new(pins::TURBIDITY_ADC_CHANNEL),
        AdcChannel::new(pins::WATER_LEVEL_ADC_CHANNEL),
        AdcChannel::new(pins::PH_ADC_CHANNEL),
    );
    let servo = FeederServo::new(
        LedcPwm::new(hw_init::LEDC_CH_SERVO),
        SystemDelay,
        u16::from(config.feed_sweep_max_angle),
        config.feed_step_delay_ms,
    );
    let relay = PumpRelay::new(GpioOutput::new(pins::PUMP_RELAY_GPIO), SystemDelay);
    let mut hw = HardwareAdapter::new(hub, servo, relay);
    hw.all_off();

    // ── 4. WiFi (STA) — the loop runs offline if this fails ───
    let clock = Esp32TimeAdapter::new();
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let mut wifi = WifiAdapter::new(EspWifi::new(peripherals.modem, sysloop, Some(nvs))?);

    match wifi.set_credentials(&config.wifi_ssid, &config.wifi_password) {
        Ok(()) => {
            if let Err(e) = wifi.connect(clock.now_ms()) {
                warn!("WiFi: {}, will keep retrying", e);
            }
        }
        Err(e) => warn!("WiFi: {}, running offline", e),
    }

    // ── 5. Network listener + domain core ─────────────────────
    let acceptor = TcpAcceptor::bind(config.listen_port).context("TCP listener")?;
    let service = AquariumService::new(&config, acceptor);
    let scheduler = Scheduler::new(service, config.tick_period_ms);

    info!(
        "Boot complete; worst-case feed stall {} ms, pump stall {} ms",
        config.feed_sweep_duration_ms(),
        config.pump_run_ms,
    );

    // ── 6. Run forever ────────────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut delay = SystemDelay;
    scheduler.run(&mut hw, &clock, &mut delay, &mut sink, |now_ms| wifi.poll(now_ms))
}
