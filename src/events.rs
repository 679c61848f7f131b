//! Interrupt queue between timer callbacks and the main loop.
//!
//! Timer callbacks run in the ESP timer task, outside the main loop.
//! They never touch application state: they push an [`Interrupt`] into a
//! bounded `embassy-sync` channel and the main loop drains it before its
//! next tick.
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ countdown timer  │────▶│  INTERRUPTS  │────▶│  Main Loop   │
//! │ idle-check timer │────▶│  (bounded)   │     │  (consumer)  │
//! └──────────────────┘     └──────────────┘     └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// Maximum number of pending interrupts.
const INTERRUPT_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// The running schedule's countdown period elapsed.
    CountdownTick,
    /// Time to compare the last key activity against the idle timeout.
    IdleCheck,
}

pub struct InterruptQueue {
    channel: Channel<CriticalSectionRawMutex, Interrupt, INTERRUPT_DEPTH>,
}

impl Default for InterruptQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptQueue {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Safe to call from timer-task context.
    /// Returns `false` if the queue is full (interrupt dropped).
    pub fn push(&self, irq: Interrupt) -> bool {
        self.channel.try_send(irq).is_ok()
    }

    pub fn pop(&self) -> Option<Interrupt> {
        self.channel.try_receive().ok()
    }

    /// Drain all pending interrupts into a callback, FIFO.
    pub fn drain(&self, mut handler: impl FnMut(Interrupt)) {
        while let Some(irq) = self.pop() {
            handler(irq);
        }
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

/// The firmware-wide queue fed by [`hw_timer`](crate::drivers::hw_timer).
pub static INTERRUPTS: InterruptQueue = InterruptQueue::new();
