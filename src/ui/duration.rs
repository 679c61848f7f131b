//! ON / OFF duration editors.
//!
//! Minutes live in `[0, MAX_MINUTES)`.  Turning left counts up and wraps
//! to zero at the top, turning right counts down and stops at zero.
//! Leaving edit mode persists the value and announces it (in seconds) to
//! the scheduler, every time, changed or not.

use core::fmt::Write;

use log::{info, warn};

use crate::app::context::{Context, Listener};
use crate::app::events::BusEvent;
use crate::app::ports::StorePort;
use crate::bus::{BusError, EventBus, ListenerId};

use super::{Control, Text};

/// Exclusive upper bound on an editable duration.
pub const MAX_MINUTES: u16 = 6000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationKind {
    Online,
    Offline,
}

impl DurationKind {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Online => "ON",
            Self::Offline => "OFF",
        }
    }

    /// Storage key, shared with the name of the change event.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Online => "online_changed",
            Self::Offline => "offline_changed",
        }
    }

    pub const fn changed(self, secs: u32) -> BusEvent {
        match self {
            Self::Online => BusEvent::OnlineChanged(secs),
            Self::Offline => BusEvent::OfflineChanged(secs),
        }
    }
}

pub struct DurationControl {
    id: ListenerId,
    kind: DurationKind,
    line: Option<usize>,
    minutes: u16,
}

impl DurationControl {
    /// Restore the stored value (falling back to `default_minutes`, then
    /// zero) and announce it so the scheduler starts with the right
    /// durations.
    pub fn new<S>(
        kind: DurationKind,
        default_minutes: u16,
        store: &S,
        bus: &mut EventBus<BusEvent>,
    ) -> Result<Self, BusError>
    where
        S: StorePort + ?Sized,
    {
        let id = bus.register()?;
        let stored = store.get(kind.key(), i32::from(default_minutes));
        let minutes = restore(stored, default_minutes);
        if i32::from(minutes) != stored {
            warn!(
                "{}: stored value {} out of range, using {} min",
                kind.title(),
                stored,
                minutes
            );
        }
        let control = Self {
            id,
            kind,
            line: None,
            minutes,
        };
        bus.emit(id, kind.changed(control.seconds()));
        Ok(control)
    }

    pub fn kind(&self) -> DurationKind {
        self.kind
    }

    pub fn minutes(&self) -> u16 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        u32::from(self.minutes) * 60
    }

    pub fn increment(&mut self) {
        self.minutes += 1;
        if self.minutes >= MAX_MINUTES {
            self.minutes = 0;
        }
    }

    pub fn decrement(&mut self) {
        self.minutes = self.minutes.saturating_sub(1);
    }
}

fn restore(stored: i32, default_minutes: u16) -> u16 {
    let in_range = |v: i32| (0..i32::from(MAX_MINUTES)).contains(&v);
    if in_range(stored) {
        stored as u16
    } else if in_range(i32::from(default_minutes)) {
        default_minutes
    } else {
        0
    }
}

impl Listener for DurationControl {
    fn id(&self) -> ListenerId {
        self.id
    }

    fn receive(&mut self, event: &BusEvent, ctx: &mut Context<'_>) {
        if *event == BusEvent::Reset {
            self.minutes = 0;
            ctx.bus.emit(self.id, self.kind.changed(0));
            self.render(ctx.screen);
        }
    }
}

impl Control for DurationControl {
    fn title(&self) -> &str {
        self.kind.title()
    }

    fn value(&self) -> Text {
        let mut out = Text::new();
        let _ = write!(out, "{:02}:{:02}", self.minutes / 60, self.minutes % 60);
        out
    }

    fn line(&self) -> Option<usize> {
        self.line
    }

    fn set_line(&mut self, line: usize) {
        self.line = Some(line);
    }

    fn on_left(&mut self, ctx: &mut Context<'_>) {
        self.increment();
        self.render(ctx.screen);
    }

    fn on_right(&mut self, ctx: &mut Context<'_>) {
        self.decrement();
        self.render(ctx.screen);
    }

    fn on_exit(&mut self, ctx: &mut Context<'_>) {
        match ctx.store.set(self.kind.key(), i32::from(self.minutes)) {
            Ok(()) => info!("{}: committed {} min", self.kind.title(), self.minutes),
            Err(e) => warn!("{}: persisting {} min failed: {}", self.kind.title(), self.minutes, e),
        }
        ctx.bus.emit(self.id, self.kind.changed(self.seconds()));
        self.render(ctx.screen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{Harness, MemStore};

    fn control(h: &mut Harness, kind: DurationKind, default: u16) -> DurationControl {
        let c = DurationControl::new(kind, default, &h.store, &mut h.bus).unwrap();
        h.discard();
        c
    }

    #[test]
    fn restores_stored_value_and_announces_it() {
        let mut h = Harness::new();
        h.store.values.insert("offline_changed".into(), 90);
        let c = DurationControl::new(DurationKind::Offline, 5, &h.store, &mut h.bus).unwrap();
        assert_eq!(c.minutes(), 90);
        assert_eq!(h.emitted(c.id()), vec![BusEvent::OfflineChanged(5400)]);
    }

    #[test]
    fn falls_back_to_default_then_zero() {
        let store = MemStore::default();
        let mut bus = EventBus::new();
        let c = DurationControl::new(DurationKind::Online, 5, &store, &mut bus).unwrap();
        assert_eq!(c.minutes(), 5);

        let mut bad = MemStore::default();
        bad.values.insert("online_changed".into(), -3);
        let c = DurationControl::new(DurationKind::Online, 7, &bad, &mut bus).unwrap();
        assert_eq!(c.minutes(), 7);

        bad.values.insert("online_changed".into(), 6000);
        let c = DurationControl::new(DurationKind::Online, 6000, &bad, &mut bus).unwrap();
        assert_eq!(c.minutes(), 0);
    }

    #[test]
    fn increment_wraps_and_decrement_clamps() {
        let mut h = Harness::new();
        let mut c = control(&mut h, DurationKind::Online, 5998);
        c.increment();
        assert_eq!(c.minutes(), 5999);
        c.increment();
        assert_eq!(c.minutes(), 0);
        c.decrement();
        assert_eq!(c.minutes(), 0);
    }

    #[test]
    fn left_counts_up_right_counts_down() {
        let mut h = Harness::new();
        let mut c = control(&mut h, DurationKind::Online, 5);
        c.set_line(1);
        c.on_left(&mut h.ctx(0));
        assert_eq!(c.minutes(), 6);
        assert_eq!(h.screen.row(1), " ON           00:06 ");
        c.on_right(&mut h.ctx(0));
        c.on_right(&mut h.ctx(0));
        assert_eq!(c.minutes(), 4);
        assert!(h.emitted(c.id()).is_empty());
    }

    #[test]
    fn every_commit_persists_and_emits() {
        let mut h = Harness::new();
        let mut c = control(&mut h, DurationKind::Online, 5);
        c.on_enter(&mut h.ctx(0));
        c.on_exit(&mut h.ctx(0));
        c.on_enter(&mut h.ctx(0));
        c.on_exit(&mut h.ctx(0));
        assert_eq!(
            h.emitted(c.id()),
            vec![BusEvent::OnlineChanged(300), BusEvent::OnlineChanged(300)]
        );
        assert_eq!(h.store.values.get("online_changed"), Some(&5));
    }

    #[test]
    fn reset_zeroes_and_announces() {
        let mut h = Harness::new();
        let mut c = control(&mut h, DurationKind::Offline, 12);
        c.set_line(2);
        c.receive(&BusEvent::Reset, &mut h.ctx(0));
        assert_eq!(c.minutes(), 0);
        assert_eq!(h.emitted(c.id()), vec![BusEvent::OfflineChanged(0)]);
        assert_eq!(h.screen.row(2), " OFF          00:00 ");
    }

    #[test]
    fn value_renders_hours_and_minutes() {
        let mut h = Harness::new();
        let c = control(&mut h, DurationKind::Online, 5999);
        assert_eq!(c.value().as_str(), "99:59");
    }
}
