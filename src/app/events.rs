//! Events carried on the internal [`EventBus`](crate::bus::EventBus).
//!
//! Every component talks to every other component through these.  Each
//! variant has a stable snake_case name; the action controller maps its
//! menu labels onto command variants through [`BusEvent::command`].

use core::fmt;

use crate::scheduler::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    // ── Settings ──────────────────────────────────────────
    /// ON duration committed (seconds).
    OnlineChanged(u32),
    /// OFF duration committed (seconds).
    OfflineChanged(u32),

    // ── Commands ──────────────────────────────────────────
    Start,
    Stop,
    Restart,
    Reset,
    Reboot,
    /// Skip to the other phase immediately.
    Next,

    // ── Scheduler state ───────────────────────────────────
    SetState(Phase),
    /// Seconds left in the current phase.
    UpdateEta(i64),

    // ── Display / input housekeeping ─────────────────────
    /// A transient message expired; every line must be redrawn.
    Rerender,
    /// Any encoder or button activity.
    KeyActivity,
    IdleOn,
    IdleOff,
}

impl BusEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OnlineChanged(_) => "online_changed",
            Self::OfflineChanged(_) => "offline_changed",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Reset => "reset",
            Self::Reboot => "reboot",
            Self::Next => "next",
            Self::SetState(_) => "set_state",
            Self::UpdateEta(_) => "update_eta",
            Self::Rerender => "rerender",
            Self::KeyActivity => "on_key_event",
            Self::IdleOn => "idle_on",
            Self::IdleOff => "idle_off",
        }
    }

    /// Map a normalised command name (`"start"`, `"reboot"`, …) to its event.
    ///
    /// Only payload-free commands are accepted.
    pub fn command(name: &str) -> Option<Self> {
        match name {
            "start" => Some(Self::Start),
            "stop" => Some(Self::Stop),
            "restart" => Some(Self::Restart),
            "reset" => Some(Self::Reset),
            "reboot" => Some(Self::Reboot),
            "next" => Some(Self::Next),
            _ => None,
        }
    }
}

impl fmt::Display for BusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnlineChanged(secs) | Self::OfflineChanged(secs) => {
                write!(f, "{}({}s)", self.name(), secs)
            }
            Self::SetState(phase) => write!(f, "set_state({})", phase),
            Self::UpdateEta(eta) => write!(f, "update_eta({}s)", eta),
            _ => f.write_str(self.name()),
        }
    }
}
