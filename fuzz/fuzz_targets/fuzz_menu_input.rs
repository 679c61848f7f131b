//! Fuzz target: `AppService` driven by arbitrary user input and time
//!
//! Each input byte is one event: an encoder detent, a button edge, a
//! countdown tick or an idle check, with the clock advancing a few
//! seconds at a time.  Asserts that the service never panics, that the
//! relay and countdown timer always follow the scheduler phase, and that
//! no bus event is ever dropped.
//!
//! cargo fuzz run fuzz_menu_input

#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use timerelay::app::ports::{
    ClockPort, InputPort, LcdPort, OutputPort, StorageError, StorePort, SystemPort, TimerPort,
};
use timerelay::app::service::AppService;
use timerelay::config::SystemConfig;
use timerelay::events::Interrupt;
use timerelay::scheduler::Phase;
use timerelay::ui::screen::COLS;

#[derive(Default)]
struct Board {
    now: u64,
    encoder: i32,
    released: bool,
    relay: bool,
    armed: bool,
    restarted: bool,
}

impl InputPort for Board {
    fn encoder_position(&mut self) -> i32 {
        self.encoder
    }

    fn button_level(&mut self) -> bool {
        self.released
    }
}

impl OutputPort for Board {
    fn set_relay(&mut self, on: bool) {
        self.relay = on;
    }

    fn set_led(&mut self, _on: bool) {}
}

impl LcdPort for Board {
    fn write_row(&mut self, row: usize, text: &str) {
        assert!(row < 4, "row {row} out of range");
        assert_eq!(text.len(), COLS, "row {row} not padded: {text:?}");
    }

    fn set_backlight(&mut self, _on: bool) {}
}

impl ClockPort for Board {
    fn now_secs(&self) -> u64 {
        self.now
    }

    fn now_ms(&self) -> u32 {
        (self.now * 1000) as u32
    }
}

impl TimerPort for Board {
    fn start_countdown(&mut self, _period_ms: u32) {
        self.armed = true;
    }

    fn cancel_countdown(&mut self) {
        self.armed = false;
    }
}

impl SystemPort for Board {
    fn restart(&mut self) {
        self.restarted = true;
    }
}

#[derive(Default)]
struct Store(HashMap<String, i32>);

impl StorePort for Store {
    fn get(&self, key: &str, default: i32) -> i32 {
        self.0.get(key).copied().unwrap_or(default)
    }

    fn set(&mut self, key: &str, value: i32) -> Result<(), StorageError> {
        self.0.insert(key.to_owned(), value);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.0.clear();
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let mut hw = Board {
        released: true,
        ..Board::default()
    };
    let mut store = Store::default();
    let Ok(mut app) = AppService::new(SystemConfig::default(), &store, 0) else {
        return;
    };
    app.start(&mut hw, &mut store);

    for byte in data {
        hw.now += u64::from(byte >> 5);
        match byte & 0x07 {
            0 => hw.encoder += 1,
            1 => hw.encoder -= 1,
            2 => hw.released = false,
            3 => hw.released = true,
            4 => app.handle_interrupt(Interrupt::CountdownTick, &hw),
            5 => app.handle_interrupt(Interrupt::IdleCheck, &hw),
            _ => {}
        }
        app.tick(&mut hw, &mut store);

        assert_eq!(hw.relay, app.phase() == Phase::Online);
        assert_eq!(hw.armed, app.phase() != Phase::Stopped);
        for minutes in store.0.values() {
            assert!((0..6000).contains(minutes));
        }
        if hw.restarted {
            assert_eq!(app.phase(), Phase::Stopped);
            break;
        }
    }
    assert_eq!(app.dropped_events(), 0);
});
