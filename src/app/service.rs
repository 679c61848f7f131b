//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the event bus and every component registered on
//! it.  It exposes a hardware-agnostic API; all I/O flows through port
//! traits injected at call sites, so the whole service runs against mock
//! adapters in tests.
//!
//! ```text
//!  InputPort ──▶ ┌──────────────────────────────┐ ──▶ OutputPort
//!  ClockPort ──▶ │          AppService          │ ──▶ LcdPort
//! Interrupt  ──▶ │ Menu · Scheduler · Idle · Bus│ ──▶ TimerPort
//!                └──────────────────────────────┘ ──▶ SystemPort
//!                              ▲▼ StorePort
//! ```
//!
//! Registration order (and therefore delivery order within a pass):
//! screen, scheduler, status line, ON, OFF, action picker, menu, idle
//! timer, input router, bus trace.

use log::{debug, info, warn};

use crate::adapters::log_sink::LogTrace;
use crate::bus::{EventBus, ListenerId, Registry};
use crate::config::SystemConfig;
use crate::error::Result;
use crate::events::Interrupt;
use crate::idle::IdleTimer;
use crate::input::InputRouter;
use crate::scheduler::{Outputs, Phase, Scheduler};
use crate::ui::Slot;
use crate::ui::action::ActionControl;
use crate::ui::duration::{DurationControl, DurationKind};
use crate::ui::menu::Menu;
use crate::ui::screen::Screen;
use crate::ui::status::StatusLine;

use super::commands::InputAction;
use super::context::{Context, Listener};
use super::events::BusEvent;
use super::ports::{Board, ClockPort, StorePort};

/// Upper bound on extra bus passes run to settle the bus before a reboot.
const MAX_FLUSH_PASSES: usize = 8;

// ───────────────────────────────────────────────────────────────
// Parts
// ───────────────────────────────────────────────────────────────

/// Every bus listener, split out of [`AppService`] so a pass can borrow
/// them independently of the bus itself.
struct Parts {
    screen: Screen,
    scheduler: Scheduler,
    menu: Menu,
    idle: IdleTimer,
    input: InputRouter,
    trace: LogTrace,
}

/// Routes one delivery to the component owning the target id.
struct Dispatch<'a> {
    parts: &'a mut Parts,
    store: &'a mut dyn StorePort,
    config: &'a SystemConfig,
    now: u64,
}

impl Registry<BusEvent> for Dispatch<'_> {
    fn dispatch(&mut self, target: ListenerId, event: &BusEvent, bus: &mut EventBus<BusEvent>) {
        let parts = &mut *self.parts;
        // The screen lives inside the context, so it gets the event directly.
        if target == parts.screen.id() {
            parts.screen.receive(event);
            return;
        }

        let mut ctx = Context {
            bus,
            screen: &mut parts.screen,
            store: &mut *self.store,
            config: self.config,
            now: self.now,
        };

        if target == parts.scheduler.id() {
            parts.scheduler.receive(event, &mut ctx);
        } else if target == parts.menu.id() {
            parts.menu.receive(event, &mut ctx);
        } else if target == parts.idle.id() {
            parts.idle.receive(event, &mut ctx);
        } else if target == parts.input.id() {
            parts.input.receive(event, &mut ctx);
        } else if target == parts.trace.id() {
            parts.trace.receive(event, &mut ctx);
        } else if let Some(control) = parts.menu.control_mut(target) {
            control.receive(event, &mut ctx);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    config: SystemConfig,
    bus: EventBus<BusEvent>,
    parts: Parts,
    /// Countdown generation the hardware timer is currently armed for.
    armed: Option<u32>,
    /// Outputs last written to the hardware.
    applied: Option<Outputs>,
}

impl AppService {
    /// Validate `config`, register every component and restore the stored
    /// durations.
    ///
    /// Nothing is delivered yet: call [`start`](Self::start) next.
    pub fn new<S>(config: SystemConfig, store: &S, now: u64) -> Result<Self>
    where
        S: StorePort + ?Sized,
    {
        config.validate()?;

        let mut bus = EventBus::new();
        let screen = Screen::new(&mut bus)?;
        let scheduler = Scheduler::new(&mut bus)?;
        let status = StatusLine::new(&mut bus)?;
        let on = DurationControl::new(DurationKind::Online, config.default_on_minutes, store, &mut bus)?;
        let off = DurationControl::new(DurationKind::Offline, config.default_off_minutes, store, &mut bus)?;
        let action = ActionControl::new(&mut bus)?;
        let menu = Menu::new(
            &mut bus,
            [
                Slot::Status(status),
                Slot::Duration(on),
                Slot::Duration(off),
                Slot::Action(action),
            ],
        )?;
        let idle = IdleTimer::new(&mut bus, config.idle_timeout_secs, now)?;
        let input = InputRouter::new(&mut bus)?;
        let trace = LogTrace::new(&mut bus)?;

        info!("AppService: {} listeners registered", bus.len());

        Ok(Self {
            config,
            bus,
            parts: Parts {
                screen,
                scheduler,
                menu,
                idle,
                input,
                trace,
            },
            armed: None,
            applied: None,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Take the input baseline, draw the menu and deliver the startup
    /// events (initial state, restored durations, backlight on).
    pub fn start(&mut self, hw: &mut impl Board, store: &mut impl StorePort) {
        let now = hw.now_secs();
        self.parts
            .input
            .sync(hw.encoder_position(), hw.button_level());
        self.parts.menu.render(&mut self.parts.screen);
        self.pass(hw, store, now);
        info!(
            "AppService started (on={}s off={}s)",
            self.parts.scheduler.on_secs(),
            self.parts.scheduler.off_secs()
        );
    }

    /// Stop any running schedule and switch the relay off.
    pub fn shutdown(&mut self, hw: &mut impl Board, store: &mut impl StorePort) {
        info!("AppService: shutting down");
        let now = hw.now_secs();
        self.bus.emit(self.parts.input.id(), BusEvent::Stop);
        self.pass(hw, store, now);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one main-loop cycle: inputs → menu → message expiry → bus pass
    /// → outputs → display.
    pub fn tick(&mut self, hw: &mut impl Board, store: &mut impl StorePort) {
        let now = hw.now_secs();
        let actions = self
            .parts
            .input
            .poll(hw.encoder_position(), hw.button_level(), &mut self.bus);

        for action in actions {
            let mut ctx = Context {
                bus: &mut self.bus,
                screen: &mut self.parts.screen,
                store: &mut *store,
                config: &self.config,
                now,
            };
            let menu = &mut self.parts.menu;
            match action {
                InputAction::Left => menu.on_left(&mut ctx),
                InputAction::Right => menu.on_right(&mut ctx),
                InputAction::Press => menu.on_press(&mut ctx),
            }
        }

        self.parts.screen.poll(now, &mut self.bus);
        self.pass(hw, store, now);
    }

    /// Feed one timer interrupt drained from the interrupt queue.  The
    /// events it causes are delivered by the next [`tick`](Self::tick).
    pub fn handle_interrupt(&mut self, irq: Interrupt, clock: &impl ClockPort) {
        let now = clock.now_secs();
        match irq {
            Interrupt::CountdownTick => self.parts.scheduler.on_tick(now, &mut self.bus),
            Interrupt::IdleCheck => self.parts.idle.check(now, &mut self.bus),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.parts.scheduler.phase()
    }

    pub fn eta(&self) -> i64 {
        self.parts.scheduler.eta()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.parts.scheduler
    }

    pub fn menu(&self) -> &Menu {
        &self.parts.menu
    }

    pub fn screen(&self) -> &Screen {
        &self.parts.screen
    }

    pub fn idle(&self) -> &IdleTimer {
        &self.parts.idle
    }

    /// Events lost to full bus queues since boot.
    pub fn dropped_events(&self) -> u32 {
        self.bus.dropped()
    }

    // ── Internal ──────────────────────────────────────────────

    fn pass(&mut self, hw: &mut impl Board, store: &mut dyn StorePort, now: u64) {
        self.dispatch(&mut *store, now);

        if self.parts.scheduler.take_reboot_request() {
            for _ in 0..MAX_FLUSH_PASSES {
                if self.bus.pending() == 0 {
                    break;
                }
                self.dispatch(&mut *store, now);
            }
            self.sync_outputs(hw);
            self.parts.screen.flush(hw);
            warn!("AppService: rebooting");
            hw.restart();
            return;
        }

        self.sync_outputs(hw);
        self.parts.screen.flush(hw);
    }

    fn dispatch(&mut self, store: &mut dyn StorePort, now: u64) -> usize {
        let delivered = {
            let mut registry = Dispatch {
                parts: &mut self.parts,
                store,
                config: &self.config,
                now,
            };
            self.bus.process(&mut registry)
        };
        if delivered > 0 {
            debug!("AppService: pass delivered {} events", delivered);
        }
        delivered
    }

    /// Apply the scheduler's derived outputs and (re)arm or cancel the
    /// countdown timer when its generation changed.
    fn sync_outputs(&mut self, hw: &mut impl Board) {
        let outputs = self.parts.scheduler.outputs();
        if self.applied != Some(outputs) {
            hw.set_relay(outputs.relay);
            hw.set_led(outputs.led);
            self.applied = Some(outputs);
        }

        let countdown = self.parts.scheduler.countdown();
        if countdown != self.armed {
            match countdown {
                Some(generation) => {
                    debug!("AppService: arming countdown #{}", generation);
                    hw.start_countdown(self.config.countdown_period_ms);
                }
                None => hw.cancel_countdown(),
            }
            self.armed = countdown;
        }
    }
}

