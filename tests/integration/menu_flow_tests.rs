//! Menu navigation and duration editing through the full service.

use timerelay::scheduler::Phase;
use timerelay::ui::menu::Mode;

use crate::mock_hw::{BoardCall, MockStore, Rig};

// ── Focus ─────────────────────────────────────────────────────

#[test]
fn focus_cycles_over_selectable_lines_only() {
    let mut rig = Rig::new();
    let mut seen = Vec::new();
    for _ in 0..4 {
        rig.right();
        seen.push(rig.app.menu().index());
    }
    assert_eq!(seen, vec![2, 3, 1, 2]);

    rig.left();
    rig.left();
    assert_eq!(rig.app.menu().index(), 3, "left wraps past the status line");
}

#[test]
fn indicator_follows_focus_and_mode() {
    let mut rig = Rig::new();
    rig.right();
    assert!(rig.hw.row(1).starts_with(' '));
    assert!(rig.hw.row(2).starts_with('>'));

    rig.press();
    assert_eq!(rig.app.menu().mode(), Mode::Edit);
    assert_eq!(rig.hw.row(2), " OFF          00:05<");

    rig.press();
    assert_eq!(rig.app.menu().mode(), Mode::Select);
    assert_eq!(rig.hw.row(2), ">OFF          00:05 ");
}

// ── Duration editing ──────────────────────────────────────────

#[test]
fn editing_on_duration_persists_and_informs_scheduler() {
    let mut rig = Rig::new();
    rig.press();
    rig.left();
    rig.left();
    assert_eq!(rig.minutes(1), 7);
    assert_eq!(rig.hw.row(1), " ON           00:07<");
    assert!(rig.store.values.is_empty(), "nothing is stored before commit");
    assert_eq!(rig.app.scheduler().on_secs(), 300);

    rig.press();
    assert_eq!(rig.store.values.get("online_changed"), Some(&7));
    assert_eq!(rig.app.scheduler().on_secs(), 420);
}

#[test]
fn turning_right_counts_down_and_stops_at_zero() {
    let mut rig = Rig::with_store(MockStore::with("offline_changed", 1));
    rig.focus(2);
    rig.press();
    rig.right();
    rig.right();
    rig.right();
    rig.press();

    assert_eq!(rig.minutes(2), 0);
    assert_eq!(rig.store.values.get("offline_changed"), Some(&0));
    assert_eq!(rig.app.scheduler().off_secs(), 0);
}

#[test]
fn failed_write_still_updates_the_schedule() {
    let mut rig = Rig::new();
    rig.store.fail_writes = true;
    rig.press();
    rig.left();
    rig.press();

    assert!(rig.store.values.is_empty());
    assert_eq!(rig.app.scheduler().on_secs(), 360);
}

#[test]
fn committed_durations_survive_a_reboot() {
    let mut rig = Rig::new();
    rig.press();
    rig.left();
    rig.left();
    rig.press();
    rig.focus(2);
    rig.press();
    rig.right();
    rig.press();

    let rebooted = Rig::with_store(std::mem::take(&mut rig.store));
    assert_eq!(rebooted.minutes(1), 7);
    assert_eq!(rebooted.minutes(2), 4);
    assert_eq!(rebooted.app.scheduler().on_secs(), 420);
    assert_eq!(rebooted.app.scheduler().off_secs(), 240);
}

#[test]
fn shortened_off_duration_applies_to_the_next_off_phase() {
    let mut rig = Rig::new();
    rig.command("START");

    rig.focus(2);
    rig.press();
    for _ in 0..4 {
        rig.right();
    }
    rig.press();
    assert_eq!(rig.app.phase(), Phase::Online);

    rig.countdown_to(300);
    assert_eq!(rig.app.phase(), Phase::Offline);
    assert_eq!(rig.app.eta(), 60);
    assert_eq!(rig.hw.row(0), " ==OFF==   00:01:00 ");
}

// ── Action picker ─────────────────────────────────────────────

#[test]
fn back_entry_leaves_everything_untouched() {
    let mut rig = Rig::new();
    let before = rig.hw.calls.len();
    rig.command("<=");

    assert_eq!(rig.app.phase(), Phase::Stopped);
    assert_eq!(rig.hw.calls.len(), before);
    assert_eq!(rig.hw.row(3), ">ACTION       START ");
}

#[test]
fn picker_list_tracks_scheduler_state() {
    let mut rig = Rig::new();
    assert_eq!(rig.actions(), &["START", "RESET", "REBOOT", "<="]);

    rig.command("START");
    assert_eq!(
        rig.actions(),
        &["STOP", "NEXT", "RESTART", "RESET", "REBOOT", "<="]
    );
    assert_eq!(rig.hw.row(3), ">ACTION        STOP ");

    rig.command("STOP");
    assert_eq!(rig.actions()[0], "START");
    assert_eq!(rig.hw.count(BoardCall::CancelCountdown), 1);
}

#[test]
fn picker_scrolls_in_edit_mode() {
    let mut rig = Rig::new();
    rig.focus(3);
    rig.press();
    rig.right();
    assert_eq!(rig.hw.row(3), " ACTION       RESET<");
    rig.left();
    rig.left();
    assert_eq!(rig.hw.row(3), " ACTION          <=<");
}
