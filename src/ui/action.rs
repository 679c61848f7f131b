//! Command picker.
//!
//! Offers a different command list depending on whether a schedule is
//! running.  The last entry, `<=`, backs out without doing anything.
//! Leaving edit mode fires the selected command onto the bus and rewinds
//! the picker to its first entry.

use heapless::String;
use log::{info, warn};

use crate::app::context::{Context, Listener};
use crate::app::events::BusEvent;
use crate::bus::{BusError, EventBus, ListenerId};
use crate::scheduler::Phase;

use super::{Control, Text};

/// No-op entry.
pub const BACK: &str = "<=";

const INACTIVE: &[&str] = &["START", "RESET", "REBOOT", BACK];
const ACTIVE: &[&str] = &["STOP", "NEXT", "RESTART", "RESET", "REBOOT", BACK];

pub struct ActionControl {
    id: ListenerId,
    line: Option<usize>,
    active: bool,
    index: usize,
}

impl ActionControl {
    pub fn new(bus: &mut EventBus<BusEvent>) -> Result<Self, BusError> {
        Ok(Self {
            id: bus.register()?,
            line: None,
            active: false,
            index: 0,
        })
    }

    pub fn actions(&self) -> &'static [&'static str] {
        if self.active { ACTIVE } else { INACTIVE }
    }

    pub fn selected(&self) -> &'static str {
        self.actions()[self.index]
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
        self.index = self.index.min(self.actions().len() - 1);
    }
}

/// Label → bus command name: lower case, spaces become underscores.
pub fn command_name(label: &str) -> String<16> {
    label
        .chars()
        .map(|c| if c == ' ' { '_' } else { c.to_ascii_lowercase() })
        .take(16)
        .collect()
}

impl Listener for ActionControl {
    fn id(&self) -> ListenerId {
        self.id
    }

    fn receive(&mut self, event: &BusEvent, ctx: &mut Context<'_>) {
        if let BusEvent::SetState(phase) = *event {
            self.set_active(phase != Phase::Stopped);
            self.render(ctx.screen);
        }
    }
}

impl Control for ActionControl {
    fn title(&self) -> &str {
        "ACTION"
    }

    fn value(&self) -> Text {
        self.selected().chars().collect()
    }

    fn line(&self) -> Option<usize> {
        self.line
    }

    fn set_line(&mut self, line: usize) {
        self.line = Some(line);
    }

    fn on_left(&mut self, ctx: &mut Context<'_>) {
        let last = self.actions().len() - 1;
        self.index = if self.index == 0 { last } else { self.index - 1 };
        self.render(ctx.screen);
    }

    fn on_right(&mut self, ctx: &mut Context<'_>) {
        self.index = (self.index + 1) % self.actions().len();
        self.render(ctx.screen);
    }

    fn on_exit(&mut self, ctx: &mut Context<'_>) {
        let label = self.selected();
        if label != BACK {
            let name = command_name(label);
            match BusEvent::command(&name) {
                Some(event) => {
                    info!("ACTION: {}", name);
                    ctx.bus.emit(self.id, event);
                }
                None => warn!("ACTION: no command named '{}'", name),
            }
        }
        self.index = 0;
        self.render(ctx.screen);
    }
}
