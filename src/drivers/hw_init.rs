//! One-shot hardware peripheral initialization.
//!
//! Configures the four ADC1 channels, the pump relay GPIO and the servo
//! LEDC timer/channel using raw ESP-IDF sys calls. Called once from
//! `main()` before the scheduler loop starts. Every actuator output is
//! left de-energised.
//!
//! On host targets the ADC is backed by a per-channel atomic so tests and
//! simulations can inject pin voltages with [`sim_set_millivolts`].

#[cfg(target_os = "espidf")]
use esp_idf_sys::*;
#[cfg(target_os = "espidf")]
use log::info;

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)    => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc)   => write!(f, "LEDC timer/channel config failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

/// ADC full-scale voltage at 12 dB attenuation.
pub const ADC_FULL_SCALE_MV: u32 = 3300;
const ADC_MAX_RAW: u32 = 4095;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the scheduler loop; single-threaded.
    unsafe {
        init_adc()?;
        init_relay_output()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// scheduler loop. `init_adc()` completes before the loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    let channels = [
        pins::TEMPERATURE_ADC_CHANNEL,
        pins::TURBIDITY_ADC_CHANNEL,
        pins::WATER_LEVEL_ADC_CHANNEL,
        pins::PH_ADC_CHANNEL,
    ];
    for channel in channels {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }
    }

    info!("hw_init: ADC1 configured (CH0=temp, CH1=turbidity, CH2=level, CH3=pH)");
    Ok(())
}

fn raw_to_millivolts(raw: u32) -> u16 {
    (raw.min(ADC_MAX_RAW) * ADC_FULL_SCALE_MV / ADC_MAX_RAW) as u16
}

/// Read one ADC1 channel in millivolts. `None` if the driver reports an error.
#[cfg(target_os = "espidf")]
pub fn adc1_read_mv(channel: u32) -> Option<u16> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract — single-threaded scheduler access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return None;
    }
    Some(raw_to_millivolts(raw.max(0) as u32))
}

// Host: injected pin voltages, defaulting to a healthy tank
// (25 °C, clear water, 20 cm, pH 7).
#[cfg(not(target_os = "espidf"))]
static SIM_ADC_MV: [core::sync::atomic::AtomicU16; pins::ADC_CHANNEL_COUNT] = [
    core::sync::atomic::AtomicU16::new(1650),
    core::sync::atomic::AtomicU16::new(2800),
    core::sync::atomic::AtomicU16::new(1320),
    core::sync::atomic::AtomicU16::new(1500),
];

/// `u16::MAX` marks a channel whose reads fail.
#[cfg(not(target_os = "espidf"))]
pub const SIM_ADC_FAULT: u16 = u16::MAX;

/// Inject the voltage a channel reports on host targets.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_millivolts(channel: u32, mv: u16) {
    if let Some(slot) = SIM_ADC_MV.get(channel as usize) {
        slot.store(mv, core::sync::atomic::Ordering::Relaxed);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read_mv(channel: u32) -> Option<u16> {
    let mv = SIM_ADC_MV.get(channel as usize)?.load(core::sync::atomic::Ordering::Relaxed);
    if mv == SIM_ADC_FAULT {
        return None;
    }
    Some(mv.min(ADC_FULL_SCALE_MV as u16))
}

// ── GPIO Output (pump relay) ──────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_relay_output() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::PUMP_RELAY_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    unsafe { gpio_set_level(pins::PUMP_RELAY_GPIO, 0) };

    info!("hw_init: relay GPIO{} configured (off)", pins::PUMP_RELAY_GPIO);
    Ok(())
}

/// Drive an output pin. Returns the ESP-IDF error code on failure.
#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), i32> {
    // SAFETY: gpio_set_level writes to an output pin configured in
    // init_relay_output(). Scheduler loop only.
    let ret = unsafe { gpio_set_level(pin, u32::from(high)) };
    if ret == ESP_OK as i32 { Ok(()) } else { Err(ret) }
}

#[cfg(not(target_os = "espidf"))]
static SIM_RELAY_ON: core::sync::atomic::AtomicBool = core::sync::atomic::AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), i32> {
    if pin == pins::PUMP_RELAY_GPIO {
        SIM_RELAY_ON.store(high, core::sync::atomic::Ordering::Relaxed);
    }
    Ok(())
}

/// Last level written to the relay pin (host only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_relay_on() -> bool {
    SIM_RELAY_ON.load(core::sync::atomic::Ordering::Relaxed)
}

// ── LEDC PWM (feeder servo) ───────────────────────────────────

/// LEDC channel carrying the servo signal.
pub const LEDC_CH_SERVO: u32 = 0;

/// Largest duty value at the servo resolution.
pub const SERVO_MAX_DUTY: u16 = ((1u32 << pins::SERVO_PWM_RESOLUTION_BITS) - 1) as u16;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // Timer 0: servo (50 Hz, 14-bit)
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_14_BIT,
        freq_hz: pins::SERVO_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    // Channel 0: servo, no pulse until the first sweep
    let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: LEDC_CH_SERVO,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        gpio_num: pins::SERVO_PWM_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    }) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    info!("hw_init: LEDC configured (servo=CH0 @ {} Hz)", pins::SERVO_PWM_FREQ_HZ);
    Ok(())
}

/// Set a channel's duty. Returns the ESP-IDF error code on failure.
#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u16) -> Result<(), i32> {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only the scheduler loop calls this.
    unsafe {
        let ret = ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, u32::from(duty));
        if ret != ESP_OK as i32 { return Err(ret); }
        let ret = ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
        if ret != ESP_OK as i32 { return Err(ret); }
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u16) -> Result<(), i32> {
    Ok(())
}
