//! Focus / menu state machine.
//!
//! ```text
//!              press (on_enter)
//!   ┌────────┐ ─────────────────▶ ┌──────┐
//!   │ SELECT │                    │ EDIT │   left/right → focused line
//!   └────────┘ ◀───────────────── └──────┘
//!    left/right   press (on_exit)
//!    move focus
//! ```
//!
//! In SELECT, left moves focus up and right moves it down, wrapping and
//! skipping lines that cannot be selected.  The focus indicator is `>`
//! in column 0 while selecting and `<` in the last column while editing.

use log::debug;

use crate::app::context::{Context, Listener};
use crate::app::events::BusEvent;
use crate::bus::{EventBus, ListenerId};
use crate::error::{Error, Result};

use super::screen::{COLS, ROWS, Screen};
use super::{Control, Slot};

pub const SLOT_COUNT: usize = ROWS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Select,
    Edit,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Up,
    Down,
}

pub struct Menu {
    id: ListenerId,
    slots: [Slot; SLOT_COUNT],
    mode: Mode,
    index: usize,
}

impl Menu {
    /// Takes ownership of the four lines; line numbers follow array order.
    ///
    /// At least three lines must be selectable.
    pub fn new(bus: &mut EventBus<BusEvent>, mut slots: [Slot; SLOT_COUNT]) -> Result<Self> {
        let selectable = slots.iter().filter(|s| s.control().selectable()).count();
        if selectable < SLOT_COUNT - 1 {
            return Err(Error::Config("menu needs at least three selectable lines"));
        }
        for (line, slot) in slots.iter_mut().enumerate() {
            slot.control_mut().set_line(line);
        }
        let index = slots
            .iter()
            .position(|s| s.control().selectable())
            .unwrap_or_default();
        let id = bus.register()?;
        Ok(Self {
            id,
            slots,
            mode: Mode::Select,
            index,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Line holding the focus.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn slots(&self) -> &[Slot; SLOT_COUNT] {
        &self.slots
    }

    pub fn focused(&self) -> &dyn Control {
        self.slots[self.index].control()
    }

    /// The line registered on the bus as `id`, if any.
    pub fn control_mut(&mut self, id: ListenerId) -> Option<&mut dyn Control> {
        self.slots
            .iter_mut()
            .map(Slot::control_mut)
            .find(|c| c.id() == id)
    }

    pub fn on_left(&mut self, ctx: &mut Context<'_>) {
        match self.mode {
            Mode::Select => {
                self.step(Step::Up);
                self.draw_indicator(ctx.screen);
            }
            Mode::Edit => self.slots[self.index].control_mut().on_left(ctx),
        }
    }

    pub fn on_right(&mut self, ctx: &mut Context<'_>) {
        match self.mode {
            Mode::Select => {
                self.step(Step::Down);
                self.draw_indicator(ctx.screen);
            }
            Mode::Edit => self.slots[self.index].control_mut().on_right(ctx),
        }
    }

    pub fn on_press(&mut self, ctx: &mut Context<'_>) {
        let control = self.slots[self.index].control_mut();
        self.mode = match self.mode {
            Mode::Select => {
                control.on_enter(ctx);
                Mode::Edit
            }
            Mode::Edit => {
                control.on_exit(ctx);
                Mode::Select
            }
        };
        debug!("Menu: {:?} on line {}", self.mode, self.index);
        self.draw_indicator(ctx.screen);
    }

    /// Draw every line plus the indicator.
    pub fn render(&self, screen: &mut Screen) {
        for slot in &self.slots {
            slot.control().render(screen);
        }
        self.draw_indicator(screen);
    }

    fn step(&mut self, step: Step) {
        for _ in 0..SLOT_COUNT {
            self.index = match step {
                Step::Up => self.index.checked_sub(1).unwrap_or(SLOT_COUNT - 1),
                Step::Down => (self.index + 1) % SLOT_COUNT,
            };
            if self.slots[self.index].control().selectable() {
                break;
            }
        }
    }

    fn draw_indicator(&self, screen: &mut Screen) {
        for line in 0..SLOT_COUNT {
            screen.print_line(line, " ", 0);
            screen.print_line(line, " ", COLS - 1);
        }
        match self.mode {
            Mode::Select => screen.print_line(self.index, ">", 0),
            Mode::Edit => screen.print_line(self.index, "<", COLS - 1),
        }
    }
}

impl Listener for Menu {
    fn id(&self) -> ListenerId {
        self.id
    }

    fn receive(&mut self, event: &BusEvent, ctx: &mut Context<'_>) {
        if *event == BusEvent::Rerender {
            self.render(ctx.screen);
        }
    }
}
