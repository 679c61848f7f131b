//! GPIO / peripheral pin assignments for the TimeRelay board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Mains switching
// ---------------------------------------------------------------------------

/// Digital output driving the relay that switches the mains line (active HIGH).
pub const LINE_GPIO: i32 = 26;
/// Indicator LED mirroring the relay state (active HIGH).
pub const LED_GPIO: i32 = 23;

// ---------------------------------------------------------------------------
// Character display (HD44780 behind a PCF8574 I2C backpack)
// ---------------------------------------------------------------------------

/// I2C data line. The I2C driver takes the typed `gpio21` peripheral;
/// this constant documents the wiring.
pub const LCD_SDA_GPIO: i32 = 21;
/// I2C clock line (`gpio22`).
pub const LCD_SCL_GPIO: i32 = 22;

// ---------------------------------------------------------------------------
// User input
// ---------------------------------------------------------------------------

/// Rotary encoder channel A (pull-up, any-edge interrupt).
pub const ENCODER_A_GPIO: i32 = 14;
/// Rotary encoder channel B (pull-up, any-edge interrupt).
pub const ENCODER_B_GPIO: i32 = 13;
/// Encoder push button, active LOW with pull-up.
pub const BUTTON_GPIO: i32 = 27;
