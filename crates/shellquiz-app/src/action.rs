//! Quiz output actions.
//!
//! [`QuizAction`] represents the side effects requested by the
//! [`crate::Quiz`] state machine. The quiz never performs I/O itself; the
//! [`crate::Runtime`] executes these actions on its behalf.

use std::time::Duration;

use crate::QuizEvent;

/// Actions returned by the Quiz state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizAction {
    /// State changed, redraw the screen.
    Render,

    /// Deliver `event` back to the quiz after `delay`.
    Schedule {
        /// How long to wait.
        delay: Duration,
        /// Event to deliver.
        event: QuizEvent,
    },

    /// Ask the driver for the current window size and feed it back as a
    /// [`QuizEvent::Resize`].
    ProbeWindowSize,

    /// End the session.
    Quit,
}
