//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the quiz runtime from where input comes
//! from and where frames go. Each frontend implements the trait, while the
//! generic [`crate::Runtime`] handles all orchestration.

use std::future::Future;

use crate::{Quiz, QuizEvent};

/// Abstracts I/O operations for the quiz runtime.
///
/// # Implementations
///
/// - **Local terminal**: crossterm events, ratatui over stdout
/// - **Remote session**: decoded client frames, ratatui into an in-memory
///   buffer shipped back as output frames
/// - **Tests**: scripted events and a ratatui test backend
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next input event.
    ///
    /// Returns `None` once the input side is closed. Must be cancel safe:
    /// the runtime drops this future whenever a scheduled event wins the
    /// race.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<QuizEvent>, Self::Error>> + Send;

    /// Draw the quiz.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be drawn or delivered.
    fn render(&mut self, quiz: &Quiz) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Current window size (columns, rows).
    fn window_size(&self) -> Result<(u16, u16), Self::Error>;

    /// Release the output side. Called once when the session ends.
    fn stop(&mut self) -> impl Future<Output = ()> + Send;
}
