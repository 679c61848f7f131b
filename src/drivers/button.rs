//! Debounced push-button level sampler.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up: HIGH = released, LOW =
//! pressed.  The main loop samples the raw level every tick; a change is
//! only reported once the new level has held for [`DEBOUNCE_MS`].
//! Edge detection happens further up, in the input router.

/// Minimum time a new level must hold before it is accepted.
pub const DEBOUNCE_MS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    level: bool,
    since_ms: u32,
}

pub struct ButtonDriver {
    gpio: i32,
    stable: bool,
    candidate: Option<Candidate>,
}

impl ButtonDriver {
    pub fn new(gpio: i32) -> Self {
        Self {
            gpio,
            stable: true,
            candidate: None,
        }
    }

    /// GPIO pin this button is attached to.
    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    /// Last accepted level (`true` = released).
    pub fn level(&self) -> bool {
        self.stable
    }

    /// Feed one raw sample taken at `now_ms`; returns the debounced level.
    pub fn sample(&mut self, raw: bool, now_ms: u32) -> bool {
        if raw == self.stable {
            self.candidate = None;
            return self.stable;
        }
        match self.candidate {
            Some(c) if c.level == raw => {
                if now_ms.wrapping_sub(c.since_ms) >= DEBOUNCE_MS {
                    self.stable = raw;
                    self.candidate = None;
                }
            }
            _ => {
                self.candidate = Some(Candidate {
                    level: raw,
                    since_ms: now_ms,
                });
            }
        }
        self.stable
    }

    /// Sample the pin itself.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        let raw = crate::drivers::hw_init::gpio_read(self.gpio);
        self.sample(raw, now_ms)
    }
}
