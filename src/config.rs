//! System configuration parameters
//!
//! All tunable parameters for the aquarium controller. The configuration is
//! fixed for the lifetime of the process: it is resolved once at boot by
//! [`SystemConfig::load`] and never reloaded.

use core::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

/// Closed `[min, max]` band a monitored quantity should stay within.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdealRange {
    pub min: f32,
    pub max: f32,
}

impl IdealRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// `true` iff `value < min || value > max`.
    pub fn is_violated_by(&self, value: f32) -> bool {
        value < self.min || value > self.max
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Network ---
    /// Wi-Fi station SSID.
    pub wifi_ssid: heapless::String<32>,
    /// Wi-Fi WPA2 passphrase (empty for open networks).
    pub wifi_password: heapless::String<64>,
    /// TCP port the command/notification server listens on.
    pub listen_port: u16,
    /// Evict a silent client after this many milliseconds (0 = never).
    pub client_idle_timeout_ms: u32,

    // --- Ideal ranges ---
    /// Water temperature band (°C).
    pub temperature_range: IdealRange,
    /// pH band.
    pub ph_range: IdealRange,

    // --- Feeder ---
    /// Minimum time between two feeding sweeps (milliseconds).
    pub feed_interval_ms: u32,
    /// Servo sweep end angle (degrees).
    pub feed_sweep_max_angle: u8,
    /// Dwell per degree during the sweep (milliseconds).
    pub feed_step_delay_ms: u32,

    // --- Pump ---
    /// Water level (cm) below which the refill pump runs.
    pub pump_low_level_cm: f32,
    /// Duration of a single pump run (milliseconds).
    pub pump_run_ms: u32,
    /// Minimum off-time between the end of one run and the next start.
    pub pump_min_off_ms: u32,

    // --- Timing ---
    /// Scheduler idle sleep at the end of every tick (milliseconds).
    pub tick_period_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Network
            wifi_ssid: bounded(option_env!("AQUA_WIFI_SSID").unwrap_or("")),
            wifi_password: bounded(option_env!("AQUA_WIFI_PASSWORD").unwrap_or("")),
            listen_port: 8080,
            client_idle_timeout_ms: 0,

            // Ideal ranges
            temperature_range: IdealRange::new(24.0, 27.0),
            ph_range: IdealRange::new(6.5, 8.0),

            // Feeder
            feed_interval_ms: 10_000,
            feed_sweep_max_angle: 180,
            feed_step_delay_ms: 15,

            // Pump
            pump_low_level_cm: 10.0,
            pump_run_ms: 5_000,
            pump_min_off_ms: 10_000,

            // Timing
            tick_period_ms: 1_000,
        }
    }
}

impl SystemConfig {
    /// Resolve the build-time configuration.
    ///
    /// `AQUA_CONFIG_JSON` (read at compile time) overrides the defaults; an
    /// invalid document is logged and ignored.
    pub fn load() -> Self {
        match option_env!("AQUA_CONFIG_JSON") {
            Some(json) => Self::from_json(json).unwrap_or_else(|e| {
                warn!("Build-time config rejected ({}), using defaults", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Parse a (possibly partial) JSON document and validate the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            warn!("Config parse error: {}", e);
            ConfigError::Parse
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the controller unsafe or inert.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen_port == 0 {
            return Err(ConfigError::ValidationFailed("listen_port must be non-zero"));
        }
        if !self.temperature_range.is_valid() {
            return Err(ConfigError::ValidationFailed("temperature_range must satisfy min < max"));
        }
        if !self.ph_range.is_valid() {
            return Err(ConfigError::ValidationFailed("ph_range must satisfy min < max"));
        }
        if self.feed_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("feed_interval_ms must be non-zero"));
        }
        if self.feed_sweep_max_angle == 0 || self.feed_sweep_max_angle > 180 {
            return Err(ConfigError::ValidationFailed("feed_sweep_max_angle must be 1-180"));
        }
        if !self.pump_low_level_cm.is_finite() || self.pump_low_level_cm < 0.0 {
            return Err(ConfigError::ValidationFailed("pump_low_level_cm must be >= 0"));
        }
        if self.pump_run_ms == 0 {
            return Err(ConfigError::ValidationFailed("pump_run_ms must be non-zero"));
        }
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_period_ms must be non-zero"));
        }
        Ok(())
    }

    /// Worst-case duration of one feeding sweep (0 → max → 0).
    pub fn feed_sweep_duration_ms(&self) -> u32 {
        2 * u32::from(self.feed_sweep_max_angle) * self.feed_step_delay_ms
    }
}

/// Copy as much of `s` as fits; credentials longer than the Wi-Fi limits
/// are rejected later by the station adapter.
fn bounded<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Errors from parsing or validating a [`SystemConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid JSON for this schema.
    Parse,
    /// A field failed range validation.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "config parse error"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
