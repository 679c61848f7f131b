//! Inactivity tracking for the display backlight.
//!
//! A periodic check (see [`Interrupt::IdleCheck`](crate::events::Interrupt))
//! compares the time since the last key activity with the timeout and
//! announces [`BusEvent::IdleOn`] once.  The next key activity announces
//! [`BusEvent::IdleOff`].

use log::info;

use crate::app::context::{Context, Listener};
use crate::app::events::BusEvent;
use crate::bus::{BusError, EventBus, ListenerId};

pub struct IdleTimer {
    id: ListenerId,
    timeout_secs: u32,
    last_active: u64,
    idle: bool,
}

impl IdleTimer {
    /// Starts awake and says so, which switches the backlight on at boot.
    pub fn new(bus: &mut EventBus<BusEvent>, timeout_secs: u32, now: u64) -> Result<Self, BusError> {
        let id = bus.register()?;
        bus.emit(id, BusEvent::IdleOff);
        Ok(Self {
            id,
            timeout_secs,
            last_active: now,
            idle: false,
        })
    }

    pub fn is_idle(&self) -> bool {
        self.idle
    }

    pub fn check(&mut self, now: u64, bus: &mut EventBus<BusEvent>) {
        if self.idle {
            return;
        }
        if now.saturating_sub(self.last_active) > u64::from(self.timeout_secs) {
            info!("Idle: no input for {}s", self.timeout_secs);
            self.idle = true;
            bus.emit(self.id, BusEvent::IdleOn);
        }
    }
}

impl Listener for IdleTimer {
    fn id(&self) -> ListenerId {
        self.id
    }

    fn receive(&mut self, event: &BusEvent, ctx: &mut Context<'_>) {
        if *event == BusEvent::KeyActivity {
            self.last_active = ctx.now;
            if self.idle {
                info!("Idle: woken by input");
                self.idle = false;
                ctx.bus.emit(self.id, BusEvent::IdleOff);
            }
        }
    }
}
