//! ON/OFF power scheduler.
//!
//! Alternates the mains relay between an ON phase and an OFF phase of
//! user-configured length.  Time is measured against a monotonic origin
//! re-marked at every phase change; a 1 Hz countdown tick (driven by the
//! hardware timer) recomputes the remaining time and fires the flip.
//!
//! ```text
//!            start (on>0 && off>0)
//!   STOPPED ───────────────────────▶ ONLINE ◀──┐
//!      ▲                               │       │ expiry / next
//!      │ stop / reset / reboot         ▼       │
//!      └─────────────────────────── OFFLINE ───┘
//! ```
//!
//! Relay and LED outputs are a pure function of the phase
//! ([`Outputs::from`]); the service applies them after every bus pass.

use core::fmt;

use log::{debug, info, warn};

use crate::app::context::{Context, Listener};
use crate::app::events::BusEvent;
use crate::bus::{BusError, EventBus, ListenerId};

// ═══════════════════════════════════════════════════════════════
//  Phase / outputs
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No countdown, relay off.
    #[default]
    Stopped,
    /// Counting down the OFF duration, relay off.
    Offline,
    /// Counting down the ON duration, relay on.
    Online,
}

impl Phase {
    /// The phase a running schedule switches to next.  Stopped stays put.
    pub const fn flipped(self) -> Self {
        match self {
            Self::Stopped => Self::Stopped,
            Self::Online => Self::Offline,
            Self::Offline => Self::Online,
        }
    }

    pub const fn is_running(self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stopped => "STOPPED",
            Self::Offline => "OFFLINE",
            Self::Online => "ONLINE",
        })
    }
}

/// Hardware outputs derived from the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outputs {
    pub relay: bool,
    pub led: bool,
}

impl From<Phase> for Outputs {
    fn from(phase: Phase) -> Self {
        let on = phase == Phase::Online;
        Self { relay: on, led: on }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

pub struct Scheduler {
    id: ListenerId,
    phase: Phase,
    on_secs: u32,
    off_secs: u32,
    /// Monotonic second at which the current phase began.
    origin: u64,
    eta: i64,
    /// Generation of the running countdown; `None` while stopped.
    countdown: Option<u32>,
    generation: u32,
    force_flip: bool,
    reboot_requested: bool,
}

impl Scheduler {
    /// Register on the bus and announce the initial STOPPED state.
    pub fn new(bus: &mut EventBus<BusEvent>) -> Result<Self, BusError> {
        let id = bus.register()?;
        bus.emit(id, BusEvent::SetState(Phase::Stopped));
        Ok(Self {
            id,
            phase: Phase::Stopped,
            on_secs: 0,
            off_secs: 0,
            origin: 0,
            eta: 0,
            countdown: None,
            generation: 0,
            force_flip: false,
            reboot_requested: false,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds left in the current phase, as of the last tick.
    pub fn eta(&self) -> i64 {
        self.eta
    }

    pub fn on_secs(&self) -> u32 {
        self.on_secs
    }

    pub fn off_secs(&self) -> u32 {
        self.off_secs
    }

    pub fn outputs(&self) -> Outputs {
        Outputs::from(self.phase)
    }

    /// Generation of the running countdown.  A new value means the
    /// hardware timer has to be (re)armed.
    pub fn countdown(&self) -> Option<u32> {
        self.countdown
    }

    /// Returns `true` once after a reboot command was handled.
    pub fn take_reboot_request(&mut self) -> bool {
        core::mem::take(&mut self.reboot_requested)
    }

    /// One countdown period elapsed.
    pub fn on_tick(&mut self, now: u64, bus: &mut EventBus<BusEvent>) {
        if self.countdown.is_none() {
            debug!("Scheduler: stale countdown tick ignored");
            return;
        }
        let duration = self.duration(self.phase);
        let elapsed = now.saturating_sub(self.origin);
        self.eta = i64::from(duration) - elapsed as i64;
        let forced = core::mem::take(&mut self.force_flip);

        if forced || elapsed >= u64::from(duration) {
            self.enter(self.phase.flipped(), now, bus);
        } else {
            bus.emit(self.id, BusEvent::UpdateEta(self.eta));
        }
    }

    fn start(&mut self, ctx: &mut Context<'_>) {
        if self.on_secs == 0 {
            warn!("Scheduler: start rejected, ON duration is zero");
            ctx.screen
                .show_message("ON time is ZERO", "ERROR", ctx.config.message_timeout_secs, ctx.now);
            return;
        }
        if self.off_secs == 0 {
            warn!("Scheduler: start rejected, OFF duration is zero");
            ctx.screen
                .show_message("OFF time is ZERO", "ERROR", ctx.config.message_timeout_secs, ctx.now);
            return;
        }
        if self.countdown.is_some() {
            debug!("Scheduler: already running");
            return;
        }
        self.generation = self.generation.wrapping_add(1);
        self.countdown = Some(self.generation);
        info!(
            "Scheduler: started (on={}s off={}s)",
            self.on_secs, self.off_secs
        );
        self.enter(Phase::Online, ctx.now, ctx.bus);
    }

    fn stop(&mut self, bus: &mut EventBus<BusEvent>) {
        if self.phase.is_running() {
            info!("Scheduler: stopped");
        }
        self.countdown = None;
        self.force_flip = false;
        self.phase = Phase::Stopped;
        self.eta = 0;
        bus.emit(self.id, BusEvent::SetState(Phase::Stopped));
    }

    fn enter(&mut self, phase: Phase, now: u64, bus: &mut EventBus<BusEvent>) {
        info!("Scheduler: {} -> {}", self.phase, phase);
        self.phase = phase;
        self.origin = now;
        self.eta = i64::from(self.duration(phase));
        bus.emit(self.id, BusEvent::SetState(phase));
        bus.emit(self.id, BusEvent::UpdateEta(self.eta));
    }

    fn duration(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Online => self.on_secs,
            Phase::Offline => self.off_secs,
            Phase::Stopped => 0,
        }
    }
}

impl Listener for Scheduler {
    fn id(&self) -> ListenerId {
        self.id
    }

    fn receive(&mut self, event: &BusEvent, ctx: &mut Context<'_>) {
        match *event {
            BusEvent::OnlineChanged(secs) => self.on_secs = secs,
            BusEvent::OfflineChanged(secs) => self.off_secs = secs,
            BusEvent::Start => self.start(ctx),
            BusEvent::Stop => self.stop(ctx.bus),
            BusEvent::Restart => {
                ctx.bus.emit(self.id, BusEvent::Stop);
                ctx.bus.emit(self.id, BusEvent::Start);
            }
            BusEvent::Reset => {
                if let Err(e) = ctx.store.clear() {
                    warn!("Scheduler: clearing stored durations failed: {}", e);
                }
                self.stop(ctx.bus);
            }
            BusEvent::Reboot => {
                self.stop(ctx.bus);
                self.reboot_requested = true;
            }
            BusEvent::Next => {
                if self.countdown.is_some() {
                    self.force_flip = true;
                    self.on_tick(ctx.now, ctx.bus);
                }
            }
            _ => {}
        }
    }
}
