//! Rotary encoder quadrature decoder.
//!
//! Both channels interrupt on any edge.  The ISR reads the two levels and
//! feeds them through a 16-entry transition table indexed by
//! `(previous AB << 2) | current AB`; invalid (bouncy or skipped)
//! transitions count zero.  A detent on common encoders spans four valid
//! transitions, so [`position`] reports the raw count divided by four.
//!
//! ```text
//!   AB: 11 → 01 → 00 → 10 → 11   = +4  (one detent)
//!   AB: 11 → 10 → 00 → 01 → 11   = −4
//! ```

use core::sync::atomic::{AtomicI32, AtomicU8, Ordering};

/// Valid quadrature transitions per detent.
pub const STEPS_PER_DETENT: i32 = 4;

const TRANSITIONS: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

/// Raw transition count, written by the ISR.
static RAW_COUNT: AtomicI32 = AtomicI32::new(0);
/// Last AB state seen by the ISR (two bits).
static LAST_STATE: AtomicU8 = AtomicU8::new(0b11);

/// Pure decoder state, shared by the ISR path and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadratureDecoder {
    state: u8,
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl QuadratureDecoder {
    pub const fn new(a: bool, b: bool) -> Self {
        Self { state: ab(a, b) }
    }

    /// Feed the current channel levels; returns −1, 0 or +1.
    pub fn update(&mut self, a: bool, b: bool) -> i8 {
        let next = ab(a, b);
        let delta = TRANSITIONS[usize::from((self.state << 2) | next)];
        self.state = next;
        delta
    }
}

const fn ab(a: bool, b: bool) -> u8 {
    ((a as u8) << 1) | b as u8
}

/// Set the resting state before interrupts are enabled.
pub fn seed(a: bool, b: bool) {
    LAST_STATE.store(ab(a, b), Ordering::Release);
}

/// ISR handler, call on any edge of either channel.
/// Lock-free; safe from interrupt context.
pub fn on_edge(a: bool, b: bool) {
    let mut decoder = QuadratureDecoder {
        state: LAST_STATE.load(Ordering::Acquire),
    };
    let delta = decoder.update(a, b);
    LAST_STATE.store(decoder.state, Ordering::Release);
    if delta != 0 {
        RAW_COUNT.fetch_add(i32::from(delta), Ordering::Relaxed);
    }
}

/// Encoder position in detents.
pub fn position() -> i32 {
    RAW_COUNT.load(Ordering::Relaxed).div_euclid(STEPS_PER_DETENT)
}
