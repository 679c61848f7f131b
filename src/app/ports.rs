//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (display, relay, inputs, timers, storage) implement these
//! traits.  The [`AppService`](super::service::AppService) consumes them via
//! generics, so the domain core never touches hardware directly.

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw user-input samples, polled once per main-loop tick.
pub trait InputPort {
    /// Accumulated encoder position in detents.  Only the sign of the
    /// difference between two samples matters.
    fn encoder_position(&mut self) -> i32;

    /// Debounced button level.  `true` = released (pull-up), `false` = pressed.
    fn button_level(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Mains relay and its indicator LED.
pub trait OutputPort {
    fn set_relay(&mut self, on: bool);
    fn set_led(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Display port
// ───────────────────────────────────────────────────────────────

/// Character display.  The domain keeps a frame buffer and pushes whole
/// rows; the adapter owns cursor handling and the bus protocol.
pub trait LcdPort {
    /// Overwrite row `row` with `text` (already padded to the display width).
    fn write_row(&mut self, row: usize, text: &str);

    fn set_backlight(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time since boot.
pub trait ClockPort {
    fn now_secs(&self) -> u64;

    /// Milliseconds since boot, truncated to `u32` (wraps after ~49 days).
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Timer port
// ───────────────────────────────────────────────────────────────

/// Periodic countdown timer.  Each period pushes
/// [`Interrupt::CountdownTick`](crate::events::Interrupt::CountdownTick).
pub trait TimerPort {
    /// (Re)start the countdown; an already running timer is restarted.
    fn start_countdown(&mut self, period_ms: u32);

    fn cancel_countdown(&mut self);
}

// ───────────────────────────────────────────────────────────────
// System port
// ───────────────────────────────────────────────────────────────

pub trait SystemPort {
    /// Restart the whole firmware.  Does not return on hardware.
    fn restart(&mut self);
}

/// Everything the service needs from the board apart from storage.
pub trait Board: InputPort + OutputPort + LcdPort + ClockPort + TimerPort + SystemPort {}

impl<T> Board for T where T: InputPort + OutputPort + LcdPort + ClockPort + TimerPort + SystemPort {}

// ───────────────────────────────────────────────────────────────
// Store port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Flat key → integer persistent map.
///
/// Reads never fail from the caller's point of view: a missing or
/// unreadable key yields `default`.  Writes report errors so callers can
/// log them.
pub trait StorePort {
    fn get(&self, key: &str, default: i32) -> i32;

    fn set(&mut self, key: &str, value: i32) -> Result<(), StorageError>;

    /// Erase every key.
    fn clear(&mut self) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`StorePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
