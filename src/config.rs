//! System configuration parameters
//!
//! All tunable timing and peripheral parameters for the TimeRelay system.
//! User-facing settings (ON/OFF durations) live in NVS and are owned by
//! the duration controllers; this struct only carries firmware constants
//! and the fallback durations used on first boot.

use crate::error::{Error, Result};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemConfig {
    // --- Timing ---
    /// Main loop sleep between ticks (milliseconds)
    pub loop_interval_ms: u32,
    /// Countdown timer period while a schedule runs (milliseconds)
    pub countdown_period_ms: u32,
    /// Inactivity before the backlight is switched off (seconds)
    pub idle_timeout_secs: u32,
    /// Period of the idle check timer (milliseconds)
    pub idle_check_period_ms: u32,
    /// How long a transient on-screen message stays up (seconds)
    pub message_timeout_secs: u32,

    // --- Durations ---
    /// ON duration used when NVS holds no value (minutes)
    pub default_on_minutes: u16,
    /// OFF duration used when NVS holds no value (minutes)
    pub default_off_minutes: u16,

    // --- Display ---
    /// 7-bit I2C address of the PCF8574 LCD backpack
    pub lcd_i2c_addr: u8,
    /// I2C bus clock (Hz)
    pub i2c_baudrate_hz: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Timing
            loop_interval_ms: 50,
            countdown_period_ms: 1000, // 1 Hz
            idle_timeout_secs: 30,
            idle_check_period_ms: 1000,
            message_timeout_secs: 3,

            // Durations
            default_on_minutes: 5,
            default_off_minutes: 5,

            // Display
            lcd_i2c_addr: 0x27,
            i2c_baudrate_hz: 400_000,
        }
    }
}

impl SystemConfig {
    /// Range-check every field before the service is built from it.
    pub fn validate(&self) -> Result<()> {
        if !(10..=1000).contains(&self.loop_interval_ms) {
            return Err(Error::Config("loop_interval_ms must be 10–1000"));
        }
        if !(100..=10_000).contains(&self.countdown_period_ms) {
            return Err(Error::Config("countdown_period_ms must be 100–10000"));
        }
        if self.idle_timeout_secs == 0 {
            return Err(Error::Config("idle_timeout_secs must be > 0"));
        }
        if !(100..=60_000).contains(&self.idle_check_period_ms) {
            return Err(Error::Config("idle_check_period_ms must be 100–60000"));
        }
        if self.message_timeout_secs > 60 {
            return Err(Error::Config("message_timeout_secs must be 0–60"));
        }
        if self.default_on_minutes >= crate::ui::duration::MAX_MINUTES
            || self.default_off_minutes >= crate::ui::duration::MAX_MINUTES
        {
            return Err(Error::Config("default durations must be below 6000 minutes"));
        }
        if !(0x08..=0x77).contains(&self.lcd_i2c_addr) {
            return Err(Error::Config("lcd_i2c_addr must be a 7-bit address"));
        }
        Ok(())
    }
}
