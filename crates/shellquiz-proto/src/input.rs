//! Terminal-agnostic input events.

use serde::{Deserialize, Serialize};

/// Keyboard input abstraction.
///
/// Decouples the quiz from terminal libraries so the same state machine runs
/// against a local terminal, a remote client or a scripted test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Character pressed together with Control.
    Ctrl(char),
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Esc,
    /// Backspace key.
    Backspace,
    /// Tab key.
    Tab,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Page Up key.
    PageUp,
    /// Page Down key.
    PageDown,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// Mouse wheel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScrollDirection {
    /// Wheel moved away from the user.
    Up,
    /// Wheel moved towards the user.
    Down,
}
