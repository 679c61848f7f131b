//! 4×20 character frame buffer.
//!
//! Controllers draw into the [`Screen`]; the service flushes dirty rows to
//! the [`LcdPort`] once per tick.  A transient message (see
//! [`Screen::show_message`]) takes over the whole display and suppresses
//! normal drawing until it expires, after which the screen is cleared and
//! a [`BusEvent::Rerender`] asks every controller to draw itself again.
//!
//! The screen is the first listener on the bus so that backlight changes
//! land before anything else reacts to an idle transition.

use heapless::String;
use log::debug;

use crate::app::events::BusEvent;
use crate::app::ports::LcdPort;
use crate::bus::{BusError, EventBus, ListenerId};

pub const ROWS: usize = 4;
pub const COLS: usize = 20;

/// Lines of body text a message can carry (row 0 is the title).
const MESSAGE_LINES: usize = ROWS - 1;

pub struct Screen {
    id: ListenerId,
    cells: [[u8; COLS]; ROWS],
    dirty: [bool; ROWS],
    render_enabled: bool,
    message_until: Option<u64>,
    backlight: bool,
    backlight_dirty: bool,
}

impl Screen {
    pub fn new(bus: &mut EventBus<BusEvent>) -> Result<Self, BusError> {
        Ok(Self {
            id: bus.register()?,
            cells: [[b' '; COLS]; ROWS],
            dirty: [true; ROWS],
            render_enabled: true,
            message_until: None,
            backlight: true,
            backlight_dirty: true,
        })
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Draw `text` on `line` starting at `col`, clipped at the right edge.
    ///
    /// Ignored while a timed message is showing.
    pub fn print_line(&mut self, line: usize, text: &str, col: usize) {
        if self.render_enabled {
            self.put(line, col, text);
        }
    }

    pub fn clear(&mut self) {
        self.cells = [[b' '; COLS]; ROWS];
        self.dirty = [true; ROWS];
    }

    /// Replace the display with a centred title and up to three centred
    /// lines of `text`.
    ///
    /// With a non-zero `timeout_secs` normal drawing is suspended until
    /// [`poll`](Self::poll) sees the deadline pass.
    pub fn show_message(&mut self, text: &str, title: &str, timeout_secs: u32, now: u64) {
        self.clear();
        self.put(0, 0, &center(title, COLS));
        for (i, line) in text.lines().take(MESSAGE_LINES).enumerate() {
            self.put(i + 1, 0, &center(line.trim(), COLS));
        }
        if timeout_secs > 0 {
            self.render_enabled = false;
            self.message_until = Some(now + u64::from(timeout_secs));
        }
        debug!("Screen: message '{}' ({}s)", title, timeout_secs);
    }

    pub fn message_active(&self) -> bool {
        self.message_until.is_some()
    }

    /// Expire a timed message once `now` reaches its deadline.
    pub fn poll(&mut self, now: u64, bus: &mut EventBus<BusEvent>) {
        let Some(until) = self.message_until else {
            return;
        };
        if now >= until {
            self.message_until = None;
            self.render_enabled = true;
            self.clear();
            bus.emit(self.id, BusEvent::Rerender);
        }
    }

    pub fn receive(&mut self, event: &BusEvent) {
        match event {
            BusEvent::IdleOn => self.set_backlight(false),
            BusEvent::IdleOff => self.set_backlight(true),
            _ => {}
        }
    }

    pub fn backlight(&self) -> bool {
        self.backlight
    }

    /// Current contents of `line`.
    pub fn row(&self, line: usize) -> &str {
        self.cells
            .get(line)
            .and_then(|row| core::str::from_utf8(row).ok())
            .unwrap_or("")
    }

    /// Push dirty rows and a pending backlight change to the display.
    pub fn flush<L>(&mut self, lcd: &mut L)
    where
        L: LcdPort + ?Sized,
    {
        if self.backlight_dirty {
            lcd.set_backlight(self.backlight);
            self.backlight_dirty = false;
        }
        for line in 0..ROWS {
            if core::mem::take(&mut self.dirty[line]) {
                lcd.write_row(line, self.row(line));
            }
        }
    }

    fn set_backlight(&mut self, on: bool) {
        if self.backlight != on {
            self.backlight = on;
            self.backlight_dirty = true;
        }
    }

    fn put(&mut self, line: usize, col: usize, text: &str) {
        let Some(row) = self.cells.get_mut(line) else {
            return;
        };
        for (cell, ch) in row.iter_mut().skip(col).zip(text.chars()) {
            *cell = if ch.is_ascii() && !ch.is_ascii_control() {
                ch as u8
            } else {
                b'?'
            };
        }
        self.dirty[line] = true;
    }
}

/// Centre `text` in a field of `width` columns, clipping it to
/// [`COLS`] first.  Odd padding puts the extra space on the left when
/// `width` is odd, on the right otherwise.
pub fn center(text: &str, width: usize) -> String<COLS> {
    let width = width.min(COLS);
    let len = text.chars().take(COLS).count();
    let pad = width.saturating_sub(len);
    let left = pad / 2 + (pad & width & 1);
    let mut out = String::new();
    for _ in 0..left {
        let _ = out.push(' ');
    }
    for ch in text.chars().take(COLS) {
        let _ = out.push(ch);
    }
    for _ in 0..pad - left {
        let _ = out.push(' ');
    }
    out
}
