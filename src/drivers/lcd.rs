//! HD44780 character LCD behind a PCF8574 I²C backpack.
//!
//! Generic over the `embedded-hal` 1.0 [`I2c`] and [`DelayNs`] traits, so
//! the same driver runs on the ESP-IDF I²C master and on test mocks.
//!
//! ## Expander wiring
//!
//! | PCF8574 bit | LCD pin   |
//! |-------------|-----------|
//! | P0          | RS        |
//! | P1          | RW (held low) |
//! | P2          | EN        |
//! | P3          | backlight |
//! | P4..P7      | D4..D7    |
//!
//! The controller runs in 4-bit mode: every byte goes out as two nibbles,
//! each latched by an EN pulse.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{info, warn};

use crate::app::ports::LcdPort;
use crate::ui::screen::{COLS, ROWS};

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x06; // increment, no shift
const CMD_DISPLAY_ON: u8 = 0x0C; // display on, cursor off, blink off
const CMD_FUNCTION_SET: u8 = 0x28; // 4-bit, 2 lines, 5x8 font
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM address of the first column of each row on a 20×4 panel.
const ROW_OFFSETS: [u8; ROWS] = [0x00, 0x40, 0x14, 0x54];

pub struct Hd44780<I, D> {
    i2c: I,
    delay: D,
    addr: u8,
    backlight: bool,
}

impl<I, D> Hd44780<I, D>
where
    I: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I, delay: D, addr: u8) -> Self {
        Self {
            i2c,
            delay,
            addr,
            backlight: true,
        }
    }

    /// Run the 4-bit initialisation sequence and clear the display.
    pub fn init(&mut self) -> Result<(), I::Error> {
        self.delay.delay_ms(50);
        // Three 8-bit "function set" nibbles resynchronise the controller
        // whatever state it powered up in, then switch to 4-bit.
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(150);
        self.write_nibble(0x20, 0)?;

        self.command(CMD_FUNCTION_SET)?;
        self.command(CMD_DISPLAY_ON)?;
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        self.command(CMD_ENTRY_MODE)?;
        info!("LCD: HD44780 ready at 0x{:02x}", self.addr);
        Ok(())
    }

    /// Write `text` from the first column of `row`, at most [`COLS`] bytes.
    pub fn print_row(&mut self, row: usize, text: &str) -> Result<(), I::Error> {
        let Some(&offset) = ROW_OFFSETS.get(row) else {
            return Ok(());
        };
        self.command(CMD_SET_DDRAM | offset)?;
        for byte in text.bytes().take(COLS) {
            self.send(byte, RS)?;
        }
        Ok(())
    }

    pub fn backlight(&mut self, on: bool) -> Result<(), I::Error> {
        self.backlight = on;
        self.expander_write(0)
    }

    /// Hand back the bus and delay.
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    fn command(&mut self, cmd: u8) -> Result<(), I::Error> {
        self.send(cmd, 0)
    }

    fn send(&mut self, value: u8, mode: u8) -> Result<(), I::Error> {
        self.write_nibble(value & 0xF0, mode)?;
        self.write_nibble(value << 4, mode)
    }

    fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), I::Error> {
        let bits = (nibble & 0xF0) | mode;
        self.expander_write(bits | EN)?;
        self.delay.delay_us(1);
        self.expander_write(bits)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn expander_write(&mut self, bits: u8) -> Result<(), I::Error> {
        let bl = if self.backlight { BACKLIGHT } else { 0 };
        self.i2c.write(self.addr, &[bits | bl])
    }
}

impl<I, D> LcdPort for Hd44780<I, D>
where
    I: I2c,
    D: DelayNs,
{
    fn write_row(&mut self, row: usize, text: &str) {
        if let Err(e) = self.print_row(row, text) {
            warn!("LCD: row {} write failed: {:?}", row, e);
        }
    }

    fn set_backlight(&mut self, on: bool) {
        if let Err(e) = self.backlight(on) {
            warn!("LCD: backlight write failed: {:?}", e);
        }
    }
}
