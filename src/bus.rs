//! Deferred two-phase event bus.
//!
//! Components never call each other directly.  Each registered listener
//! owns a private outbound queue; [`EventBus::emit`] only appends to it.
//! Once per main-loop tick [`EventBus::process`] walks the listeners in
//! registration order and rebroadcasts every queued event, oldest first,
//! to every listener (the emitter included).
//!
//! ```text
//!   emit(A, e1) ──▶ ┌─────────┐
//!   emit(A, e2) ──▶ │ queue A │──┐
//!                   └─────────┘  │   process()
//!   emit(B, e3) ──▶ ┌─────────┐  ├──────────────▶ e1 → A, B
//!                   │ queue B │──┘                e2 → A, B
//!                   └─────────┘                   e3 → A, B
//! ```
//!
//! Events emitted while a pass is running land in the emitter's queue.
//! They are still delivered in the same pass if that emitter's turn has
//! not come yet (or is the one being drained); otherwise they wait for
//! the next pass.

use core::fmt;

use heapless::{Deque, Vec};
use log::warn;

/// Maximum number of listeners on one bus.
pub const MAX_LISTENERS: usize = 12;

/// Outbound queue depth per listener.
pub const QUEUE_DEPTH: usize = 16;

/// Stable handle returned by [`EventBus::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u8);

impl ListenerId {
    /// Position in registration order.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// All [`MAX_LISTENERS`] slots are taken.
    RegistryFull,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegistryFull => write!(f, "listener registry full"),
        }
    }
}

/// Delivery target for [`EventBus::process`].
///
/// The registry maps a [`ListenerId`] back to the component that owns it.
/// The bus is handed back in so handlers can emit follow-up events.
pub trait Registry<E> {
    fn dispatch(&mut self, target: ListenerId, event: &E, bus: &mut EventBus<E>);
}

pub struct EventBus<E> {
    queues: Vec<Deque<E, QUEUE_DEPTH>, MAX_LISTENERS>,
    dropped: u32,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    pub const fn new() -> Self {
        Self {
            queues: Vec::new(),
            dropped: 0,
        }
    }

    /// Register a new listener.  Ids are handed out in order and never reused.
    pub fn register(&mut self) -> Result<ListenerId, BusError> {
        let id = ListenerId(self.queues.len() as u8);
        self.queues
            .push(Deque::new())
            .map_err(|_| BusError::RegistryFull)?;
        Ok(id)
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    /// Events queued but not yet delivered.
    pub fn pending(&self) -> usize {
        self.queues.iter().map(Deque::len).sum()
    }

    /// Events lost to full queues since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Events currently waiting in `from`'s outbound queue, oldest first.
    pub fn queued(&self, from: ListenerId) -> impl Iterator<Item = &E> {
        self.queues.get(from.index()).into_iter().flat_map(Deque::iter)
    }

    /// Run one delivery pass.  Returns the number of events delivered.
    pub fn process<R>(&mut self, registry: &mut R) -> usize
    where
        R: Registry<E> + ?Sized,
    {
        let listeners = self.queues.len();
        let mut delivered = 0;
        for source in 0..listeners {
            while let Some(event) = self.queues[source].pop_front() {
                for target in 0..listeners {
                    registry.dispatch(ListenerId(target as u8), &event, self);
                }
                delivered += 1;
            }
        }
        delivered
    }
}

impl<E: fmt::Debug> EventBus<E> {
    /// Queue `event` on `from`'s outbound queue.  Never delivers synchronously.
    ///
    /// Returns `false` if the event was dropped.
    pub fn emit(&mut self, from: ListenerId, event: E) -> bool {
        let Some(queue) = self.queues.get_mut(from.index()) else {
            warn!("EventBus: emit from unregistered listener {:?}", from);
            return false;
        };
        match queue.push_back(event) {
            Ok(()) => true,
            Err(event) => {
                self.dropped = self.dropped.saturating_add(1);
                warn!(
                    "EventBus: queue of listener {} full, dropped {:?}",
                    from.index(),
                    event
                );
                false
            }
        }
    }
}
