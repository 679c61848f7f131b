//! Menu lines, the focus state machine and the frame buffer they draw on.
//!
//! | Module     | Line kind                       | Selectable |
//! |------------|---------------------------------|------------|
//! | `status`   | scheduler phase + countdown     | no         |
//! | `duration` | ON / OFF minutes (editable)     | yes        |
//! | `action`   | START / STOP / RESET / … picker | yes        |
//!
//! Every line implements [`Control`].  A line renders as its title
//! left-aligned in an 18-column field with the value right-aligned over
//! the end of it, drawn from column 1; columns 0 and 19 belong to the
//! menu's focus indicator.

pub mod action;
pub mod duration;
pub mod menu;
pub mod screen;
pub mod status;

use heapless::String;

use crate::app::context::{Context, Listener};

use self::action::ActionControl;
use self::duration::DurationControl;
use self::screen::Screen;
use self::status::StatusLine;

/// Width of the title/value field between the two indicator columns.
pub const ROW_WIDTH: usize = screen::COLS - 2;

pub type Text = String<ROW_WIDTH>;

/// One menu line.
pub trait Control: Listener {
    fn title(&self) -> &str;

    /// Right-aligned part of the line.  Empty means title only.
    fn value(&self) -> Text;

    fn selectable(&self) -> bool {
        true
    }

    fn line(&self) -> Option<usize>;

    fn set_line(&mut self, line: usize);

    /// Focus entered edit mode on this line.
    fn on_enter(&mut self, _ctx: &mut Context<'_>) {}

    fn on_left(&mut self, ctx: &mut Context<'_>) {
        self.render(ctx.screen);
    }

    fn on_right(&mut self, ctx: &mut Context<'_>) {
        self.render(ctx.screen);
    }

    /// Focus left edit mode: commit.
    fn on_exit(&mut self, ctx: &mut Context<'_>) {
        self.render(ctx.screen);
    }

    fn render(&self, screen: &mut Screen) {
        if let Some(line) = self.line() {
            screen.print_line(line, &format_row(self.title(), &self.value()), 1);
        }
    }
}

/// Lay out `title` and `value` in a [`ROW_WIDTH`] field.
pub fn format_row(title: &str, value: &str) -> Text {
    let mut cells = [' '; ROW_WIDTH];
    for (cell, ch) in cells.iter_mut().zip(title.chars()) {
        *cell = ch;
    }
    let len = value.chars().count().min(ROW_WIDTH);
    for (cell, ch) in cells[ROW_WIDTH - len..].iter_mut().zip(value.chars()) {
        *cell = ch;
    }
    cells.iter().collect()
}

/// The fixed kinds of menu line.
pub enum Slot {
    Status(StatusLine),
    Duration(DurationControl),
    Action(ActionControl),
}

impl Slot {
    pub fn control(&self) -> &dyn Control {
        match self {
            Self::Status(c) => c,
            Self::Duration(c) => c,
            Self::Action(c) => c,
        }
    }

    pub fn control_mut(&mut self) -> &mut dyn Control {
        match self {
            Self::Status(c) => c,
            Self::Duration(c) => c,
            Self::Action(c) => c,
        }
    }
}
