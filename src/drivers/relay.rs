//! Mains relay and indicator LED.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the two GPIO outputs via hw_init.
//! On host/test: tracks state in-memory only.

use log::info;

use crate::drivers::hw_init;
use crate::pins;

pub struct RelayDriver {
    line_on: bool,
    led_on: bool,
}

impl Default for RelayDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayDriver {
    /// Both outputs start off, matching the LOW level hw_init leaves them at.
    pub fn new() -> Self {
        Self {
            line_on: false,
            led_on: false,
        }
    }

    pub fn set_line(&mut self, on: bool) {
        hw_init::gpio_write(pins::LINE_GPIO, on);
        if on != self.line_on {
            info!("Relay: line {}", if on { "ON" } else { "OFF" });
        }
        self.line_on = on;
    }

    pub fn set_led(&mut self, on: bool) {
        hw_init::gpio_write(pins::LED_GPIO, on);
        self.led_on = on;
    }

    pub fn line_on(&self) -> bool {
        self.line_on
    }

    pub fn led_on(&self) -> bool {
        self.led_on
    }
}
