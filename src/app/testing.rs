//! Shared fixtures for unit tests of bus listeners.

use std::collections::HashMap;

use crate::app::context::Context;
use crate::app::events::BusEvent;
use crate::app::ports::{StorageError, StorePort};
use crate::bus::{EventBus, ListenerId, Registry};
use crate::config::SystemConfig;
use crate::ui::screen::Screen;

#[derive(Default)]
pub(crate) struct MemStore {
    pub values: HashMap<String, i32>,
    pub clears: usize,
}

impl StorePort for MemStore {
    fn get(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set(&mut self, key: &str, value: i32) -> Result<(), StorageError> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.values.clear();
        self.clears += 1;
        Ok(())
    }
}

struct Discard;

impl Registry<BusEvent> for Discard {
    fn dispatch(&mut self, _: ListenerId, _: &BusEvent, _: &mut EventBus<BusEvent>) {}
}

/// Bus + screen + store + config, enough to build a [`Context`].
pub(crate) struct Harness {
    pub bus: EventBus<BusEvent>,
    pub screen: Screen,
    pub store: MemStore,
    pub config: SystemConfig,
}

impl Harness {
    pub fn new() -> Self {
        let mut bus = EventBus::new();
        let screen = Screen::new(&mut bus).unwrap();
        Self {
            bus,
            screen,
            store: MemStore::default(),
            config: SystemConfig::default(),
        }
    }

    pub fn ctx(&mut self, now: u64) -> Context<'_> {
        Context {
            bus: &mut self.bus,
            screen: &mut self.screen,
            store: &mut self.store,
            config: &self.config,
            now,
        }
    }

    /// Events `id` has queued and not yet had delivered.
    pub fn emitted(&self, id: ListenerId) -> Vec<BusEvent> {
        self.bus.queued(id).copied().collect()
    }

    /// Throw away everything queued on the bus.
    pub fn discard(&mut self) {
        self.bus.process(&mut Discard);
    }
}
