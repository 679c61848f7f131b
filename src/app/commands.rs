//! Inbound user input.
//!
//! The [`InputRouter`](crate::input::InputRouter) turns raw encoder and
//! button samples into these; the [`Menu`](crate::ui::menu::Menu) consumes
//! them.

/// One directional or activation gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Encoder turned so that its position increased.
    Left,
    /// Encoder turned so that its position decreased.
    Right,
    /// Button pressed (falling edge).
    Press,
}
