//! TimeRelay Firmware: Main Entry Point
//!
//! Hexagonal architecture with a cooperative main loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter<Hd44780>       NvsStore        Esp32Time      │
//! │  (Input/Output/Lcd/Timer/Sys)   (StorePort)     (ClockPort)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  EventBus · Scheduler · Menu · Idle · Screen           │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  esp_timer callbacks ──▶ INTERRUPTS ──▶ main loop              │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::hal::delay::{Ets, FreeRtos};
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::units::Hertz;
use log::{info, warn};

use timerelay::adapters::hardware::HardwareAdapter;
use timerelay::adapters::nvs::NvsStore;
use timerelay::adapters::time::Esp32TimeAdapter;
use timerelay::app::ports::ClockPort;
use timerelay::app::service::AppService;
use timerelay::config::SystemConfig;
use timerelay::drivers::lcd::Hd44780;
use timerelay::drivers::{hw_init, hw_timer};
use timerelay::error::Error;
use timerelay::events::INTERRUPTS;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  TimeRelay v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = SystemConfig::default();
    config.validate()?;

    // ── 2. GPIO, encoder ISR, idle timer ──────────────────────
    hw_init::init_peripherals().map_err(Error::from)?;
    if let Err(e) = hw_init::init_isr_service() {
        warn!("ISR service init failed ({}), encoder disabled", e);
    }
    hw_timer::start_idle_timer(config.idle_check_period_ms);

    // ── 3. Display ────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &I2cConfig::new().baudrate(Hertz(config.i2c_baudrate_hz)),
    )?;
    let mut lcd = Hd44780::new(i2c, Ets, config.lcd_i2c_addr);
    if let Err(e) = lcd.init() {
        warn!("LCD init failed ({:?}), continuing headless", e);
    }

    // ── 4. Adapters ───────────────────────────────────────────
    let mut store = NvsStore::new().map_err(Error::from)?;
    let mut hw = HardwareAdapter::new(lcd, Esp32TimeAdapter::new());

    // ── 5. App service ────────────────────────────────────────
    let mut app = AppService::new(config.clone(), &store, hw.now_secs())?;
    app.start(&mut hw, &mut store);

    info!("System ready. Entering main loop.");

    // ── 6. Main loop ──────────────────────────────────────────
    loop {
        INTERRUPTS.drain(|irq| app.handle_interrupt(irq, &hw));
        app.tick(&mut hw, &mut store);
        FreeRtos::delay_ms(config.loop_interval_ms);
    }
}
