//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the display, relay and button drivers plus the clock, and
//! exposes them through every [`Board`](crate::app::ports::Board) port.
//! This is the only module in the system that touches actual hardware.
//! On non-espidf targets the underlying drivers use cfg-gated simulation
//! stubs.

use crate::adapters::time::Esp32TimeAdapter;
use crate::app::ports::{ClockPort, InputPort, LcdPort, OutputPort, SystemPort, TimerPort};
use crate::drivers::button::ButtonDriver;
use crate::drivers::relay::RelayDriver;
use crate::drivers::{encoder, hw_init, hw_timer};
use crate::pins;

/// Concrete adapter that combines all hardware behind port traits.
///
/// Generic over the display so the I²C driver type stays out of here.
pub struct HardwareAdapter<L> {
    lcd: L,
    relay: RelayDriver,
    button: ButtonDriver,
    clock: Esp32TimeAdapter,
}

impl<L: LcdPort> HardwareAdapter<L> {
    pub fn new(lcd: L, clock: Esp32TimeAdapter) -> Self {
        Self {
            lcd,
            relay: RelayDriver::new(),
            button: ButtonDriver::new(pins::BUTTON_GPIO),
            clock,
        }
    }

    pub fn relay(&self) -> &RelayDriver {
        &self.relay
    }
}

// ── InputPort ─────────────────────────────────────────────────

impl<L> InputPort for HardwareAdapter<L> {
    fn encoder_position(&mut self) -> i32 {
        encoder::position()
    }

    fn button_level(&mut self) -> bool {
        let now_ms = self.clock.uptime_ms();
        self.button.poll(now_ms)
    }
}

// ── OutputPort ────────────────────────────────────────────────

impl<L> OutputPort for HardwareAdapter<L> {
    fn set_relay(&mut self, on: bool) {
        self.relay.set_line(on);
    }

    fn set_led(&mut self, on: bool) {
        self.relay.set_led(on);
    }
}

// ── LcdPort ───────────────────────────────────────────────────

impl<L: LcdPort> LcdPort for HardwareAdapter<L> {
    fn write_row(&mut self, row: usize, text: &str) {
        self.lcd.write_row(row, text);
    }

    fn set_backlight(&mut self, on: bool) {
        self.lcd.set_backlight(on);
    }
}

// ── ClockPort ─────────────────────────────────────────────────

impl<L> ClockPort for HardwareAdapter<L> {
    fn now_secs(&self) -> u64 {
        self.clock.now_secs()
    }

    fn now_ms(&self) -> u32 {
        self.clock.now_ms()
    }
}

// ── TimerPort ─────────────────────────────────────────────────

impl<L> TimerPort for HardwareAdapter<L> {
    fn start_countdown(&mut self, period_ms: u32) {
        hw_timer::start_countdown(period_ms);
    }

    fn cancel_countdown(&mut self) {
        hw_timer::cancel_countdown();
    }
}

// ── SystemPort ────────────────────────────────────────────────

impl<L> SystemPort for HardwareAdapter<L> {
    fn restart(&mut self) {
        hw_timer::stop_timers();
        self.relay.set_line(false);
        self.relay.set_led(false);
        hw_init::restart();
    }
}
