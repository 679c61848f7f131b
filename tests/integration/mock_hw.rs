//! Mock board and store for integration tests.
//!
//! Records every output, timer and system call so tests can assert on the
//! full command history without touching real GPIO, I²C or esp_timer.

use std::collections::HashMap;

use timerelay::app::ports::{
    ClockPort, InputPort, LcdPort, OutputPort, StorageError, StorePort, SystemPort, TimerPort,
};
use timerelay::app::service::AppService;
use timerelay::config::SystemConfig;
use timerelay::events::Interrupt;
use timerelay::ui::Slot;

// ── Board call record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCall {
    SetRelay(bool),
    SetLed(bool),
    StartCountdown(u32),
    CancelCountdown,
    Restart,
}

// ── MockBoard ─────────────────────────────────────────────────

pub struct MockBoard {
    pub now: u64,
    pub encoder: i32,
    /// `true` = released.
    pub button: bool,
    pub calls: Vec<BoardCall>,
    pub rows: [String; 4],
    pub backlight: bool,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            now: 0,
            encoder: 0,
            button: true,
            calls: Vec::new(),
            rows: Default::default(),
            backlight: false,
        }
    }

    pub fn relay(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                BoardCall::SetRelay(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn led(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                BoardCall::SetLed(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn count(&self, call: BoardCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    pub fn row(&self, row: usize) -> &str {
        &self.rows[row]
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl InputPort for MockBoard {
    fn encoder_position(&mut self) -> i32 {
        self.encoder
    }

    fn button_level(&mut self) -> bool {
        self.button
    }
}

impl OutputPort for MockBoard {
    fn set_relay(&mut self, on: bool) {
        self.calls.push(BoardCall::SetRelay(on));
    }

    fn set_led(&mut self, on: bool) {
        self.calls.push(BoardCall::SetLed(on));
    }
}

impl LcdPort for MockBoard {
    fn write_row(&mut self, row: usize, text: &str) {
        self.rows[row] = text.to_owned();
    }

    fn set_backlight(&mut self, on: bool) {
        self.backlight = on;
    }
}

impl ClockPort for MockBoard {
    fn now_secs(&self) -> u64 {
        self.now
    }

    fn now_ms(&self) -> u32 {
        (self.now * 1000) as u32
    }
}

impl TimerPort for MockBoard {
    fn start_countdown(&mut self, period_ms: u32) {
        self.calls.push(BoardCall::StartCountdown(period_ms));
    }

    fn cancel_countdown(&mut self) {
        self.calls.push(BoardCall::CancelCountdown);
    }
}

impl SystemPort for MockBoard {
    fn restart(&mut self) {
        self.calls.push(BoardCall::Restart);
    }
}

// ── MockStore ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockStore {
    pub values: HashMap<String, i32>,
    pub clears: usize,
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl MockStore {
    pub fn with(key: &str, minutes: i32) -> Self {
        let mut store = Self::default();
        store.values.insert(key.to_owned(), minutes);
        store
    }
}

impl StorePort for MockStore {
    fn get(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set(&mut self, key: &str, value: i32) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::IoError);
        }
        self.values.insert(key.to_owned(), value);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.values.clear();
        self.clears += 1;
        Ok(())
    }
}

// ── Rig: service + board + store, driven like a user would ────

pub struct Rig {
    pub app: AppService,
    pub hw: MockBoard,
    pub store: MockStore,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_store(MockStore::default())
    }

    pub fn with_store(mut store: MockStore) -> Self {
        let mut hw = MockBoard::new();
        let mut app = AppService::new(SystemConfig::default(), &store, hw.now).unwrap();
        app.start(&mut hw, &mut store);
        Self { app, hw, store }
    }

    pub fn tick(&mut self) {
        self.app.tick(&mut self.hw, &mut self.store);
    }

    /// Encoder up one detent.
    pub fn left(&mut self) {
        self.hw.encoder += 1;
        self.tick();
    }

    /// Encoder down one detent.
    pub fn right(&mut self) {
        self.hw.encoder -= 1;
        self.tick();
    }

    /// Press and release.
    pub fn press(&mut self) {
        self.hw.button = false;
        self.tick();
        self.hw.button = true;
        self.tick();
    }

    /// Advance the clock to `now`, delivering one countdown tick.
    pub fn countdown_to(&mut self, now: u64) {
        self.hw.now = now;
        self.app.handle_interrupt(Interrupt::CountdownTick, &self.hw);
        self.tick();
    }

    /// Advance the clock to `now`, delivering one idle check.
    pub fn idle_check_at(&mut self, now: u64) {
        self.hw.now = now;
        self.app.handle_interrupt(Interrupt::IdleCheck, &self.hw);
        self.tick();
    }

    /// Move focus to `line` from SELECT mode.
    pub fn focus(&mut self, line: usize) {
        for _ in 0..4 {
            if self.app.menu().index() == line {
                return;
            }
            self.right();
        }
        panic!("line {line} is not reachable");
    }

    /// Labels the action picker currently offers.
    pub fn actions(&self) -> &'static [&'static str] {
        match &self.app.menu().slots()[3] {
            Slot::Action(a) => a.actions(),
            _ => panic!("line 3 is not the action picker"),
        }
    }

    /// Pick `label` on the action line and let the bus settle.
    pub fn command(&mut self, label: &str) {
        self.focus(3);
        self.press();
        let steps = self
            .actions()
            .iter()
            .position(|a| *a == label)
            .unwrap_or_else(|| panic!("{label} not offered in {:?}", self.actions()));
        for _ in 0..steps {
            self.right();
        }
        self.press();
        self.tick();
    }

    /// Minutes shown by the ON (line 1) or OFF (line 2) editor.
    pub fn minutes(&self, line: usize) -> u16 {
        match &self.app.menu().slots()[line] {
            Slot::Duration(d) => d.minutes(),
            _ => panic!("line {line} is not a duration"),
        }
    }
}
