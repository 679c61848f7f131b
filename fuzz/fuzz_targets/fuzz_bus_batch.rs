//! Fuzz target: `EventBus::emit` / `EventBus::process`
//!
//! Interprets the input as a sequence of emits from arbitrary listeners,
//! some of which re-emit when they receive an event.  Asserts that the
//! bus never panics, never delivers more than was accepted, and drains
//! completely within a bounded number of passes.
//!
//! cargo fuzz run fuzz_bus_batch

#![no_main]

use libfuzzer_sys::fuzz_target;
use timerelay::bus::{EventBus, ListenerId, MAX_LISTENERS, Registry};

/// Every listener whose index matches the low bits of an event re-emits
/// it once with the top bit set.
struct Echo {
    delivered: usize,
}

impl Registry<u8> for Echo {
    fn dispatch(&mut self, target: ListenerId, event: &u8, bus: &mut EventBus<u8>) {
        self.delivered += 1;
        if event & 0x80 == 0 && usize::from(event & 0x0f) == target.index() {
            bus.emit(target, event | 0x80);
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&count, events)) = data.split_first() else {
        return;
    };
    let listeners = usize::from(count) % MAX_LISTENERS + 1;

    let mut bus = EventBus::new();
    let ids: Vec<ListenerId> = (0..listeners).filter_map(|_| bus.register().ok()).collect();
    assert_eq!(ids.len(), listeners);

    let mut accepted = 0;
    for &byte in events {
        let from = ids[usize::from(byte >> 4) % listeners];
        if bus.emit(from, byte & 0x7f) {
            accepted += 1;
        }
    }

    let mut echo = Echo { delivered: 0 };
    let mut processed = 0;
    for _ in 0..4 {
        processed += bus.process(&mut echo);
    }
    assert_eq!(bus.pending(), 0, "echoes never re-echo, two passes drain");
    assert!(processed <= 2 * accepted);
    assert_eq!(echo.delivered, processed * listeners);
});
