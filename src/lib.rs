//! TimeRelay firmware library.
//!
//! Exposes the pure-logic modules for integration testing and the
//! binary. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod bus;
pub mod config;
pub mod error;
pub mod events;
pub mod idle;
pub mod input;
pub mod pins;
pub mod scheduler;
pub mod ui;

// Hardware-facing layers; the implementations are cfg-gated inside.
pub mod adapters;
pub mod drivers;
