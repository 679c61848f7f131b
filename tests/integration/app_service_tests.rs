//! Integration tests for the input → menu → bus → scheduler → outputs
//! pipeline.
//!
//! These run on the host (x86_64) and drive the service the way a user
//! would: encoder detents, button presses and timer interrupts, checking
//! the relay, timer and display traffic that comes out the other end.

use timerelay::events::Interrupt;
use timerelay::scheduler::Phase;

use crate::mock_hw::{BoardCall, MockStore, Rig};

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_draws_menu_with_relay_off() {
    let rig = Rig::new();

    assert_eq!(rig.app.phase(), Phase::Stopped);
    assert_eq!(rig.hw.row(0), " =====OFFLINE====== ");
    assert_eq!(rig.hw.row(1), ">ON           00:05 ");
    assert_eq!(rig.hw.row(2), " OFF          00:05 ");
    assert_eq!(rig.hw.row(3), " ACTION       START ");
    assert!(rig.hw.backlight);

    assert_eq!(
        rig.hw.calls,
        vec![BoardCall::SetRelay(false), BoardCall::SetLed(false)],
        "boot must drive outputs off and leave the countdown disarmed"
    );
    assert_eq!(rig.app.scheduler().on_secs(), 300);
    assert_eq!(rig.app.scheduler().off_secs(), 300);
}

#[test]
fn stored_durations_are_restored_at_boot() {
    let mut store = MockStore::with("online_changed", 12);
    store.values.insert("offline_changed".into(), 90);
    let rig = Rig::with_store(store);

    assert_eq!(rig.minutes(1), 12);
    assert_eq!(rig.minutes(2), 90);
    assert_eq!(rig.app.scheduler().on_secs(), 720);
    assert_eq!(rig.app.scheduler().off_secs(), 5400);
    assert_eq!(rig.hw.row(1), ">ON           00:12 ");
    assert_eq!(rig.hw.row(2), " OFF          01:30 ");
}

// ── Start / countdown / flip ──────────────────────────────────

#[test]
fn start_from_menu_switches_relay_on_and_arms_countdown() {
    let mut rig = Rig::new();
    rig.command("START");

    assert_eq!(rig.app.phase(), Phase::Online);
    assert_eq!(rig.app.eta(), 300);
    assert!(rig.hw.relay());
    assert!(rig.hw.led());
    assert_eq!(rig.hw.count(BoardCall::StartCountdown(1000)), 1);
    assert_eq!(rig.hw.row(0), " ==ON===   00:05:00 ");
    assert_eq!(rig.actions()[0], "STOP", "running schedule offers the active list");
}

#[test]
fn countdown_ticks_update_status_then_flip_to_offline() {
    let mut rig = Rig::new();
    rig.command("START");

    rig.countdown_to(1);
    assert_eq!(rig.app.eta(), 299);
    assert_eq!(rig.hw.row(0), " ==ON===   00:04:59 ");

    rig.countdown_to(299);
    assert_eq!(rig.app.phase(), Phase::Online);
    assert_eq!(rig.hw.row(0), " ==ON===   00:00:01 ");

    rig.countdown_to(300);
    assert_eq!(rig.app.phase(), Phase::Offline);
    assert!(!rig.hw.relay());
    assert_eq!(rig.hw.row(0), " ==OFF==   00:05:00 ");
    assert_eq!(
        rig.hw.count(BoardCall::StartCountdown(1000)),
        1,
        "a phase flip keeps the running timer"
    );

    rig.countdown_to(600);
    assert_eq!(rig.app.phase(), Phase::Online);
    assert!(rig.hw.relay());
}

#[test]
fn stop_disarms_and_late_ticks_are_ignored() {
    let mut rig = Rig::new();
    rig.command("START");
    rig.command("STOP");

    assert_eq!(rig.app.phase(), Phase::Stopped);
    assert!(!rig.hw.relay());
    assert_eq!(rig.hw.count(BoardCall::CancelCountdown), 1);
    assert_eq!(rig.hw.row(0), " =====OFFLINE====== ");

    rig.countdown_to(400);
    assert_eq!(rig.app.phase(), Phase::Stopped);
    assert_eq!(rig.app.eta(), 0);
}

#[test]
fn next_skips_to_offline_without_rearming() {
    let mut rig = Rig::new();
    rig.command("START");
    rig.hw.now = 40;
    rig.command("NEXT");

    assert_eq!(rig.app.phase(), Phase::Offline);
    assert_eq!(rig.app.eta(), 300);
    assert!(!rig.hw.relay());
    assert_eq!(rig.hw.count(BoardCall::StartCountdown(1000)), 1);

    rig.countdown_to(41);
    assert_eq!(rig.app.eta(), 299);
}

#[test]
fn restart_rearms_countdown_without_relay_glitch() {
    let mut rig = Rig::new();
    rig.command("START");
    rig.countdown_to(100);
    let relay_writes = rig.hw.count(BoardCall::SetRelay(false)) + rig.hw.count(BoardCall::SetRelay(true));

    rig.command("RESTART");

    assert_eq!(rig.app.phase(), Phase::Online);
    assert_eq!(rig.app.eta(), 300);
    assert_eq!(rig.app.scheduler().countdown(), Some(2));
    assert_eq!(rig.hw.count(BoardCall::StartCountdown(1000)), 2);
    assert_eq!(rig.hw.count(BoardCall::CancelCountdown), 0);
    assert_eq!(
        rig.hw.count(BoardCall::SetRelay(false)) + rig.hw.count(BoardCall::SetRelay(true)),
        relay_writes,
        "stop and start land in one pass, so the relay never drops"
    );

    // The new phase is timed from the restart, not from boot.
    rig.countdown_to(101);
    assert_eq!(rig.app.eta(), 299);
}

// ── Start guards and transient messages ──────────────────────

#[test]
fn zero_on_duration_shows_error_until_message_expires() {
    let mut rig = Rig::with_store(MockStore::with("online_changed", 0));
    rig.command("START");

    assert_eq!(rig.app.phase(), Phase::Stopped);
    assert_eq!(rig.hw.count(BoardCall::StartCountdown(1000)), 0);
    assert!(rig.app.screen().message_active());
    assert_eq!(rig.hw.row(0), "       ERROR        ");
    assert_eq!(rig.hw.row(1), "  ON time is ZERO   ");

    // Menu drawing is suspended while the message is up.
    rig.left();
    assert_eq!(rig.hw.row(1), "  ON time is ZERO   ");

    rig.hw.now = 2;
    rig.tick();
    assert!(rig.app.screen().message_active());

    rig.hw.now = 3;
    rig.tick();
    assert!(!rig.app.screen().message_active());
    assert_eq!(rig.hw.row(0), " =====OFFLINE====== ");
    assert_eq!(rig.hw.row(1), " ON           00:00 ");
    assert_eq!(rig.hw.row(2), ">OFF          00:05 ");
    assert_eq!(rig.hw.row(3), " ACTION       START ");
}

#[test]
fn zero_off_duration_is_rejected_too() {
    let mut rig = Rig::with_store(MockStore::with("offline_changed", 0));
    rig.command("START");

    assert_eq!(rig.app.phase(), Phase::Stopped);
    assert_eq!(rig.hw.row(1), "  OFF time is ZERO  ");
}

// ── Reset / reboot ────────────────────────────────────────────

#[test]
fn reset_clears_store_zeroes_durations_and_stops() {
    let mut rig = Rig::with_store(MockStore::with("online_changed", 30));
    rig.command("START");
    rig.command("RESET");

    assert_eq!(rig.store.clears, 1);
    assert!(rig.store.values.is_empty());
    assert_eq!(rig.app.phase(), Phase::Stopped);
    assert!(!rig.hw.relay());
    assert_eq!(rig.minutes(1), 0);
    assert_eq!(rig.minutes(2), 0);
    assert_eq!(rig.app.scheduler().on_secs(), 0);
    assert_eq!(rig.app.scheduler().off_secs(), 0);
    assert_eq!(rig.hw.row(1), " ON           00:00 ");

    // With both durations at zero the schedule cannot start again.
    rig.command("START");
    assert_eq!(rig.app.phase(), Phase::Stopped);
    assert!(rig.app.screen().message_active());
}

#[test]
fn reboot_switches_everything_off_before_restarting() {
    let mut rig = Rig::new();
    rig.command("START");
    rig.command("REBOOT");

    assert_eq!(rig.app.phase(), Phase::Stopped);
    assert_eq!(rig.hw.count(BoardCall::Restart), 1);
    let n = rig.hw.calls.len();
    assert_eq!(
        rig.hw.calls[n - 4..],
        [
            BoardCall::SetRelay(false),
            BoardCall::SetLed(false),
            BoardCall::CancelCountdown,
            BoardCall::Restart,
        ]
    );
    assert_eq!(rig.hw.row(0), " =====OFFLINE====== ");
}

#[test]
fn shutdown_stops_a_running_schedule() {
    let mut rig = Rig::new();
    rig.command("START");
    rig.app.shutdown(&mut rig.hw, &mut rig.store);

    assert_eq!(rig.app.phase(), Phase::Stopped);
    assert!(!rig.hw.relay());
    assert_eq!(rig.hw.count(BoardCall::CancelCountdown), 1);
}

// ── Idle backlight ────────────────────────────────────────────

#[test]
fn idle_dims_backlight_and_first_input_only_wakes() {
    let mut rig = Rig::new();

    rig.idle_check_at(30);
    assert!(!rig.app.idle().is_idle(), "timeout is exclusive");
    assert!(rig.hw.backlight);

    rig.idle_check_at(31);
    assert!(rig.app.idle().is_idle());
    assert!(!rig.hw.backlight);

    rig.right();
    assert_eq!(rig.app.menu().index(), 1, "waking input is swallowed");
    assert!(!rig.app.idle().is_idle());

    rig.tick();
    assert!(rig.hw.backlight);

    rig.right();
    assert_eq!(rig.app.menu().index(), 2);
}

#[test]
fn key_activity_postpones_idle() {
    let mut rig = Rig::new();
    rig.hw.now = 20;
    rig.right();

    rig.idle_check_at(45);
    assert!(!rig.app.idle().is_idle());
    rig.idle_check_at(51);
    assert!(rig.app.idle().is_idle());
}

// ── Interrupt queue hand-off ──────────────────────────────────

#[test]
fn interrupt_effects_wait_for_the_next_tick() {
    let mut rig = Rig::new();
    rig.command("START");

    rig.hw.now = 5;
    rig.app.handle_interrupt(Interrupt::CountdownTick, &rig.hw);
    assert_eq!(rig.app.eta(), 295);
    assert_eq!(rig.hw.row(0), " ==ON===   00:05:00 ");

    rig.tick();
    assert_eq!(rig.hw.row(0), " ==ON===   00:04:55 ");
    assert_eq!(rig.app.dropped_events(), 0);
}
