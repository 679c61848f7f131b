//! Shared mutable context threaded through every bus handler.
//!
//! A [`Context`] is assembled fresh for each delivery (or input action)
//! from disjoint borrows of the service's parts, so handlers can emit
//! events, draw on the screen and touch storage without holding any
//! reference to each other.

use crate::app::events::BusEvent;
use crate::app::ports::StorePort;
use crate::bus::{EventBus, ListenerId};
use crate::config::SystemConfig;
use crate::ui::screen::Screen;

pub struct Context<'a> {
    pub bus: &'a mut EventBus<BusEvent>,
    pub screen: &'a mut Screen,
    pub store: &'a mut dyn StorePort,
    pub config: &'a SystemConfig,
    /// Monotonic seconds at the start of this tick.
    pub now: u64,
}

/// A component registered on the bus.
pub trait Listener {
    fn id(&self) -> ListenerId;

    /// Handle one delivered event.  Unknown events must be ignored.
    fn receive(&mut self, event: &BusEvent, ctx: &mut Context<'_>);
}
