//! Text protocol: command parsing, report and alert formatting.
//!
//! ```text
//!  client ─▶  "send_values\n"
//!  server ◀─  "Temperature: 25.40 °C\n"
//!             "Turbidity: 3.10 NTU\n"
//!             "Water Level: 18.75 cm\n"
//!             "pH: 7.05\n"
//!  server ◀─  "ALERT! Temperature out of range: 30.00 °C\n"   (unsolicited)
//! ```
//!
//! Commands are matched case-insensitively after trimming surrounding
//! whitespace. Values are printed with two decimals; a quantity whose
//! sensor failed this cycle is printed as `n/a`.

use core::fmt::Write;

use heapless::String;

use crate::app::reading::{AlertEvent, AlertKind, SensorSample};
use crate::error::SensorError;

/// Reply to any unrecognised non-empty line.
pub const USAGE_MESSAGE: &str = "Unknown Command! Send 'SEND_VALUES' to receive sensor data.\n";

/// Sent to a second client before it is disconnected.
pub const BUSY_MESSAGE: &str = "Busy! Another client is connected.\n";

/// Capacity of a formatted four-line report.
pub const REPORT_CAPACITY: usize = 256;

/// Capacity of one formatted alert line.
pub const ALERT_CAPACITY: usize = 96;

const SEND_VALUES: &str = "SEND_VALUES";

/// A recognised inbound command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Sample the sensors now and reply with the four-line report.
    SendValues,
    /// Anything else non-empty; answered with [`USAGE_MESSAGE`].
    Unknown,
}

impl Command {
    /// Parse one line (without its `\n`). Blank lines yield `None`.
    pub fn parse(line: &[u8]) -> Option<Self> {
        let Ok(text) = core::str::from_utf8(line) else {
            return Some(Self::Unknown);
        };
        let text = text.trim();
        if text.is_empty() {
            None
        } else if text.eq_ignore_ascii_case(SEND_VALUES) {
            Some(Self::SendValues)
        } else {
            Some(Self::Unknown)
        }
    }
}

/// Render a sample as the four-line `SEND_VALUES` reply.
pub fn format_report(sample: &SensorSample) -> String<REPORT_CAPACITY> {
    let mut out = String::new();
    push_value(&mut out, "Temperature", sample.temperature_c, " \u{00b0}C");
    push_value(&mut out, "Turbidity", sample.turbidity_ntu, " NTU");
    push_value(&mut out, "Water Level", sample.water_level_cm, " cm");
    push_value(&mut out, "pH", sample.ph, "");
    out
}

/// Render an alert as one unsolicited `ALERT!` line.
pub fn format_alert(alert: &AlertEvent) -> String<ALERT_CAPACITY> {
    let mut out = String::new();
    // Capacity covers any finite f32 at two decimals.
    let _ = match alert.kind {
        AlertKind::TemperatureOutOfRange => {
            writeln!(out, "ALERT! Temperature out of range: {:.2} \u{00b0}C", alert.value)
        }
        AlertKind::PhOutOfRange => writeln!(out, "ALERT! pH out of range: {:.2}", alert.value),
    };
    out
}

fn push_value<const N: usize>(
    out: &mut String<N>,
    label: &str,
    value: Result<f32, SensorError>,
    unit: &str,
) {
    let _ = match value {
        Ok(v) if v.is_finite() => writeln!(out, "{label}: {v:.2}{unit}"),
        _ => writeln!(out, "{label}: n/a"),
    };
}
