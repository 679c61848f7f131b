//! First menu line: scheduler phase and time left in it.

use core::fmt::Write;

use crate::app::context::{Context, Listener};
use crate::app::events::BusEvent;
use crate::bus::{BusError, EventBus, ListenerId};
use crate::scheduler::Phase;

use super::{Control, Text};

pub struct StatusLine {
    id: ListenerId,
    line: Option<usize>,
    phase: Phase,
    eta: i64,
}

impl StatusLine {
    pub fn new(bus: &mut EventBus<BusEvent>) -> Result<Self, BusError> {
        Ok(Self {
            id: bus.register()?,
            line: None,
            phase: Phase::Stopped,
            eta: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}

/// `HH:MM:SS`; negative values read as zero.
pub fn hms(secs: i64) -> Text {
    let secs = secs.max(0);
    let mut out = Text::new();
    let _ = write!(
        out,
        "{:02}:{:02}:{:02}",
        secs / 3600,
        secs % 3600 / 60,
        secs % 60
    );
    out
}

impl Listener for StatusLine {
    fn id(&self) -> ListenerId {
        self.id
    }

    fn receive(&mut self, event: &BusEvent, ctx: &mut Context<'_>) {
        match *event {
            BusEvent::SetState(phase) => {
                self.phase = phase;
                self.render(ctx.screen);
            }
            BusEvent::UpdateEta(eta) => {
                self.eta = eta;
                self.render(ctx.screen);
            }
            _ => {}
        }
    }
}

impl Control for StatusLine {
    fn title(&self) -> &str {
        match self.phase {
            Phase::Stopped => "=====OFFLINE======",
            Phase::Online => "==ON===",
            Phase::Offline => "==OFF==",
        }
    }

    fn value(&self) -> Text {
        match self.phase {
            Phase::Stopped => Text::new(),
            _ => hms(self.eta),
        }
    }

    fn selectable(&self) -> bool {
        false
    }

    fn line(&self) -> Option<usize> {
        self.line
    }

    fn set_line(&mut self, line: usize) {
        self.line = Some(line);
    }
}
