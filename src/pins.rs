//! GPIO / peripheral pin assignments for the aquarium controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1, 12 dB attenuation, 0 – 3.3 V at the pin)
// ---------------------------------------------------------------------------

/// NTC thermistor divider (10 kΩ @ 25 °C). ADC1 channel 0 (GPIO 1).
pub const TEMPERATURE_ADC_CHANNEL: u32 = 0;
/// Analog turbidity probe behind a 2:3 divider. ADC1 channel 1 (GPIO 2).
pub const TURBIDITY_ADC_CHANNEL: u32 = 1;
/// Hydrostatic level transmitter, 0 – 3.3 V span. ADC1 channel 2 (GPIO 3).
pub const WATER_LEVEL_ADC_CHANNEL: u32 = 2;
/// pH probe amplifier, 1.5 V at neutral. ADC1 channel 3 (GPIO 4).
pub const PH_ADC_CHANNEL: u32 = 3;

/// Number of analog channels in use.
pub const ADC_CHANNEL_COUNT: usize = 4;

// ---------------------------------------------------------------------------
// Actuators
// ---------------------------------------------------------------------------

/// Feeder hobby servo signal (LEDC PWM).
pub const SERVO_PWM_GPIO: i32 = 13;
/// Servo frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// LEDC duty resolution for the servo channel.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;

/// Pump relay coil driver. HIGH = pump running.
pub const PUMP_RELAY_GPIO: i32 = 14;
