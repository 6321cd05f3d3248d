//! Wi-Fi station adapter.
//!
//! Implements [`ConnectivityPort`], the boundary for network
//! connectivity. The TCP listener binds to all interfaces, so it keeps
//! working across reconnects without being rebound.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via `esp_idf_svc::wifi`.
//!   `connect()` only starts association; completion is observed by `poll()`.
//! - otherwise: an in-memory link the host tests drive directly.
//!
//! ## Reconnects
//!
//! `poll()` is called once per scheduler tick and never blocks. On a lost
//! link or a timed-out attempt the adapter waits an exponential backoff
//! (2 s → 4 s → 8 s … capped at 60 s) before retrying.

use core::fmt;
use log::{info, warn};

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};

// ───────────────────────────────────────────────────────────────
// Port trait
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
    AlreadyConnected,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::NoCredentials => "SSID not set",
            Self::InvalidSsid => "SSID must be 1..=32 printable ASCII characters",
            Self::InvalidPassword => "WPA2 passphrase must be 8..=64 characters (or empty)",
            Self::ConnectionFailed => "association could not be started",
            Self::AlreadyConnected => "link already up",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ConnectivityError {}

pub trait ConnectivityPort {
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError>;
    /// Start associating. Does not wait for the link.
    fn connect(&mut self, now_ms: u64) -> Result<(), ConnectivityError>;
    fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
    /// Advance the connection state machine. Non-blocking.
    fn poll(&mut self, now_ms: u64);
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connecting { since_ms: u64 },
    Connected,
    Reconnecting { attempt: u32, retry_at_ms: u64 },
}

const INITIAL_BACKOFF_MS: u64 = 2_000;
const MAX_BACKOFF_MS: u64 = 60_000;
/// An association that has not come up after this long is abandoned.
const CONNECT_TIMEOUT_MS: u64 = 15_000;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

/// SSID: non-empty, fits the driver's 32-byte field, printable ASCII.
fn check_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    let printable = ssid.bytes().all(|b| b.is_ascii_graphic() || b == b' ');
    match ssid.len() {
        1..=32 if printable => Ok(()),
        _ => Err(ConnectivityError::InvalidSsid),
    }
}

/// Passphrase: empty selects an open network.
fn check_passphrase(password: &str) -> Result<(), ConnectivityError> {
    match password.len() {
        0 | 8..=64 => Ok(()),
        _ => Err(ConnectivityError::InvalidPassword),
    }
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    backoff_ms: u64,

    // ── ESP-IDF fields ──────────────────────────────────────────
    #[cfg(target_os = "espidf")]
    wifi: EspWifi<'static>,

    // ── Simulation fields ───────────────────────────────────────
    #[cfg(not(target_os = "espidf"))]
    sim_link_up: bool,
    /// Number of upcoming connect attempts that fail immediately.
    #[cfg(not(target_os = "espidf"))]
    sim_failures: u32,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(wifi: EspWifi<'static>) -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            backoff_ms: INITIAL_BACKOFF_MS,
            wifi,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            backoff_ms: INITIAL_BACKOFF_MS,
            sim_link_up: false,
            sim_failures: 0,
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    /// Schedule the next attempt and grow the backoff.
    fn schedule_retry(&mut self, attempt: u32, now_ms: u64) {
        let retry_at_ms = now_ms + self.backoff_ms;
        info!("WiFi: retry {} in {} ms", attempt, self.backoff_ms);
        self.backoff_ms = (self.backoff_ms * 2).min(MAX_BACKOFF_MS);
        self.state = WifiState::Reconnecting { attempt, retry_at_ms };
    }

    fn begin_attempt(&mut self, attempt: u32, now_ms: u64) -> Result<(), ConnectivityError> {
        match self.platform_connect() {
            Ok(()) => {
                self.state = WifiState::Connecting { since_ms: now_ms };
                Ok(())
            }
            Err(e) => {
                warn!("WiFi: connect attempt failed: {}", e);
                self.schedule_retry(attempt + 1, now_ms);
                Err(e)
            }
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        let config = Configuration::Client(ClientConfiguration {
            ssid: self.ssid.as_str().try_into().map_err(|_| ConnectivityError::InvalidSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method: if self.password.is_empty() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            },
            ..Default::default()
        });
        let failed = |e: esp_idf_sys::EspError| {
            warn!("WiFi(espidf): driver error: {}", e);
            ConnectivityError::ConnectionFailed
        };
        self.wifi.set_configuration(&config).map_err(failed)?;
        if !self.wifi.is_started().map_err(failed)? {
            self.wifi.start().map_err(failed)?;
        }
        self.wifi.connect().map_err(failed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        if self.sim_failures > 0 {
            self.sim_failures -= 1;
            return Err(ConnectivityError::ConnectionFailed);
        }
        self.sim_link_up = true;
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        let _ = self.wifi.disconnect();
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        self.sim_link_up = false;
    }

    /// Associated and the network interface has an address.
    #[cfg(target_os = "espidf")]
    fn platform_link_up(&self) -> bool {
        self.wifi.is_up().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_link_up(&self) -> bool {
        self.sim_link_up
    }

    /// Simulate the AP going away (host only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_drop_link(&mut self) {
        self.sim_link_up = false;
    }

    /// Make the next `n` connect attempts fail (host only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_next(&mut self, n: u32) {
        self.sim_failures = n;
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        check_ssid(ssid)?;
        check_passphrase(password)?;
        // Both lengths were checked against the buffer capacities above.
        self.ssid = heapless::String::try_from(ssid).map_err(|_| ConnectivityError::InvalidSsid)?;
        self.password =
            heapless::String::try_from(password).map_err(|_| ConnectivityError::InvalidPassword)?;
        info!("WiFi: station credentials set for '{}'", self.ssid);
        Ok(())
    }

    fn connect(&mut self, now_ms: u64) -> Result<(), ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        if self.state == WifiState::Connected {
            return Err(ConnectivityError::AlreadyConnected);
        }
        info!("WiFi: connecting to '{}'", self.ssid);
        self.backoff_ms = INITIAL_BACKOFF_MS;
        self.begin_attempt(0, now_ms)
    }

    fn disconnect(&mut self) {
        self.platform_disconnect();
        self.state = WifiState::Disconnected;
        info!("WiFi: link released, no reconnect");
    }

    fn is_connected(&self) -> bool {
        self.state == WifiState::Connected
    }

    fn poll(&mut self, now_ms: u64) {
        match self.state {
            WifiState::Connecting { since_ms } => {
                if self.platform_link_up() {
                    self.state = WifiState::Connected;
                    self.backoff_ms = INITIAL_BACKOFF_MS;
                    info!("WiFi: connected");
                } else if now_ms.saturating_sub(since_ms) >= CONNECT_TIMEOUT_MS {
                    warn!("WiFi: association timed out");
                    self.platform_disconnect();
                    self.schedule_retry(1, now_ms);
                }
            }
            WifiState::Connected => {
                if !self.platform_link_up() {
                    warn!("WiFi: link dropped");
                    self.state = WifiState::Reconnecting { attempt: 1, retry_at_ms: now_ms };
                }
            }
            WifiState::Reconnecting { attempt, retry_at_ms } => {
                if now_ms >= retry_at_ms {
                    info!("WiFi: reconnect attempt {}", attempt);
                    let _ = self.begin_attempt(attempt, now_ms);
                }
            }
            WifiState::Disconnected => {}
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
