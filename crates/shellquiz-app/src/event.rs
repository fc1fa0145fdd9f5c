//! Quiz input events.
//!
//! [`QuizEvent`] is the complete set of inputs that drive the
//! [`crate::Quiz`] state machine. Events come from the session's input
//! stream (keys, wheel, resize) or from the quiz itself via scheduled and
//! dispatched actions.

use crate::{KeyInput, ScrollDirection};

/// Events processed by the Quiz state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    /// Session started. Arms the intro timer.
    Init,

    /// The intro delay has passed.
    IntroElapsed,

    /// Keyboard input.
    Key(KeyInput),

    /// Mouse wheel input.
    Scroll(ScrollDirection),

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Switch to the results screen.
    ShowResults,

    /// End the session.
    Quit,
}
