//! Turns raw encoder / button samples into menu actions.
//!
//! The encoder position only matters through the sign of its change
//! between two polls: up is [`InputAction::Left`], down is
//! [`InputAction::Right`].  The button fires on its falling edge.
//!
//! Every action is reported on the bus as [`BusEvent::KeyActivity`].
//! While the display is idle the first action only wakes it and is not
//! passed on to the menu.

use heapless::Vec;
use log::debug;

use crate::app::commands::InputAction;
use crate::app::context::{Context, Listener};
use crate::app::events::BusEvent;
use crate::bus::{BusError, EventBus, ListenerId};

/// At most one encoder step and one button press per poll.
pub type Actions = Vec<InputAction, 2>;

pub struct InputRouter {
    id: ListenerId,
    last_position: i32,
    last_level: bool,
    suppressed: bool,
}

impl InputRouter {
    pub fn new(bus: &mut EventBus<BusEvent>) -> Result<Self, BusError> {
        Ok(Self {
            id: bus.register()?,
            last_position: 0,
            last_level: true,
            suppressed: false,
        })
    }

    /// Seed the encoder baseline so boot-time drift is not read as a turn.
    pub fn sync(&mut self, position: i32, level: bool) {
        self.last_position = position;
        self.last_level = level;
    }

    /// Compare a fresh sample against the previous one.
    pub fn poll(&mut self, position: i32, level: bool, bus: &mut EventBus<BusEvent>) -> Actions {
        let mut raw = Actions::new();
        if position != self.last_position {
            let _ = raw.push(if position > self.last_position {
                InputAction::Left
            } else {
                InputAction::Right
            });
            self.last_position = position;
        }
        if level != self.last_level {
            if !level {
                let _ = raw.push(InputAction::Press);
            }
            self.last_level = level;
        }

        let mut routed = Actions::new();
        for action in raw {
            if self.suppressed {
                debug!("Input: {:?} swallowed while idle", action);
            } else {
                let _ = routed.push(action);
            }
            bus.emit(self.id, BusEvent::KeyActivity);
            self.suppressed = false;
        }
        routed
    }
}

impl Listener for InputRouter {
    fn id(&self) -> ListenerId {
        self.id
    }

    fn receive(&mut self, event: &BusEvent, _ctx: &mut Context<'_>) {
        if *event == BusEvent::IdleOn {
            self.suppressed = true;
        }
    }
}
