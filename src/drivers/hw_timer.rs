//! Periodic timers on ESP-IDF's esp_timer API.
//!
//! Two timers feed the interrupt queue:
//!
//! | Timer     | Lifetime                        | Pushes                      |
//! |-----------|---------------------------------|-----------------------------|
//! | countdown | armed while a schedule runs     | `Interrupt::CountdownTick`  |
//! | idle      | from boot until shutdown        | `Interrupt::IdleCheck`      |
//!
//! Callbacks execute in the ESP timer task (not ISR context) and only push
//! into [`INTERRUPTS`]; all state stays with the main loop.
//! On host targets the functions log and do nothing.

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicPtr, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::{error, info, warn};

#[cfg(target_os = "espidf")]
use crate::events::{INTERRUPTS, Interrupt};

#[cfg(target_os = "espidf")]
static COUNTDOWN_TIMER: AtomicPtr<esp_timer> = AtomicPtr::new(core::ptr::null_mut());
#[cfg(target_os = "espidf")]
static IDLE_TIMER: AtomicPtr<esp_timer> = AtomicPtr::new(core::ptr::null_mut());

#[cfg(target_os = "espidf")]
unsafe extern "C" fn countdown_cb(_arg: *mut core::ffi::c_void) {
    if !INTERRUPTS.push(Interrupt::CountdownTick) {
        warn!("hw_timer: interrupt queue full, countdown tick dropped");
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn idle_cb(_arg: *mut core::ffi::c_void) {
    // Losing an idle check is harmless; the next one comes a period later.
    let _ = INTERRUPTS.push(Interrupt::IdleCheck);
}

/// Create a timer once and cache its handle in `slot`.
#[cfg(target_os = "espidf")]
fn timer_handle(
    slot: &AtomicPtr<esp_timer>,
    callback: unsafe extern "C" fn(*mut core::ffi::c_void),
    name: &'static core::ffi::CStr,
) -> Option<esp_timer_handle_t> {
    let existing = slot.load(Ordering::Acquire);
    if !existing.is_null() {
        return Some(existing);
    }
    let args = esp_timer_create_args_t {
        callback: Some(callback),
        arg: core::ptr::null_mut(),
        dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: name.as_ptr(),
        skip_unhandled_events: true,
    };
    let mut handle: esp_timer_handle_t = core::ptr::null_mut();
    // SAFETY: args outlives the call; handle is written by esp_timer_create.
    let ret = unsafe { esp_timer_create(&args, &mut handle) };
    if ret != ESP_OK as i32 {
        error!("hw_timer: {:?} timer create failed (rc={})", name, ret);
        return None;
    }
    slot.store(handle, Ordering::Release);
    Some(handle)
}

/// Stop `handle` if running, then start it with a period of `period_ms`.
#[cfg(target_os = "espidf")]
fn restart_periodic(handle: esp_timer_handle_t, period_ms: u32) -> bool {
    // SAFETY: handle came from esp_timer_create and is never deleted.
    // Stopping a timer that is not running returns ESP_ERR_INVALID_STATE,
    // which is fine here.
    unsafe {
        esp_timer_stop(handle);
        esp_timer_start_periodic(handle, u64::from(period_ms) * 1_000) == ESP_OK as i32
    }
}

/// (Re)arm the countdown timer; the first tick arrives one period from now.
#[cfg(target_os = "espidf")]
pub fn start_countdown(period_ms: u32) {
    let Some(handle) = timer_handle(&COUNTDOWN_TIMER, countdown_cb, c"countdown") else {
        return;
    };
    if restart_periodic(handle, period_ms) {
        info!("hw_timer: countdown armed ({} ms)", period_ms);
    } else {
        error!("hw_timer: countdown start failed");
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn start_countdown(period_ms: u32) {
    log::info!("hw_timer(sim): countdown armed ({} ms)", period_ms);
}

#[cfg(target_os = "espidf")]
pub fn cancel_countdown() {
    let handle = COUNTDOWN_TIMER.load(Ordering::Acquire);
    if !handle.is_null() {
        // SAFETY: valid handle; stopping an idle timer is harmless.
        unsafe { esp_timer_stop(handle) };
        info!("hw_timer: countdown cancelled");
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn cancel_countdown() {
    log::info!("hw_timer(sim): countdown cancelled");
}

/// Start the periodic idle check.
#[cfg(target_os = "espidf")]
pub fn start_idle_timer(period_ms: u32) {
    let Some(handle) = timer_handle(&IDLE_TIMER, idle_cb, c"idle") else {
        error!("hw_timer: continuing without idle checks");
        return;
    };
    if restart_periodic(handle, period_ms) {
        info!("hw_timer: idle check every {} ms", period_ms);
    } else {
        error!("hw_timer: idle timer start failed");
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn start_idle_timer(period_ms: u32) {
    log::info!("hw_timer(sim): idle check every {} ms (not started)", period_ms);
}

/// Stop both timers.
#[cfg(target_os = "espidf")]
pub fn stop_timers() {
    for slot in [&COUNTDOWN_TIMER, &IDLE_TIMER] {
        let handle = slot.load(Ordering::Acquire);
        if !handle.is_null() {
            // SAFETY: valid handle from timer_handle(); never deleted.
            unsafe { esp_timer_stop(handle) };
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_timers() {}
