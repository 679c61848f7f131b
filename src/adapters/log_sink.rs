//! Bus trace adapter.
//!
//! Registered last on the bus, so it sees every event after all other
//! listeners have handled it, and writes it to the ESP-IDF logger
//! (UART / USB-CDC in production) at debug level.  The once-a-second
//! countdown and key activity go out at trace level.

use log::{debug, trace};

use crate::app::context::{Context, Listener};
use crate::app::events::BusEvent;
use crate::bus::{BusError, EventBus, ListenerId};

/// Listener that logs every [`BusEvent`] to the serial console.
pub struct LogTrace {
    id: ListenerId,
    delivered: u32,
}

impl LogTrace {
    pub fn new(bus: &mut EventBus<BusEvent>) -> Result<Self, BusError> {
        Ok(Self {
            id: bus.register()?,
            delivered: 0,
        })
    }

    /// Events seen since boot.
    pub fn delivered(&self) -> u32 {
        self.delivered
    }
}

impl Listener for LogTrace {
    fn id(&self) -> ListenerId {
        self.id
    }

    fn receive(&mut self, event: &BusEvent, _ctx: &mut Context<'_>) {
        self.delivered = self.delivered.wrapping_add(1);
        match event {
            BusEvent::UpdateEta(_) | BusEvent::KeyActivity => trace!("BUS   | {}", event),
            _ => debug!("BUS   | {}", event),
        }
    }
}
