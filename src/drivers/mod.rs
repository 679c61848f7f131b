//! Peripheral drivers and one-shot hardware initialisation.

pub mod button;
pub mod encoder;
pub mod hw_init;
pub mod hw_timer;
pub mod lcd;
pub mod relay;
