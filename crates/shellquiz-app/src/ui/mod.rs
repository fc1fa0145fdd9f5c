//! UI rendering
//!
//! Rendering functions that convert Quiz state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! drawing into a frame.

mod intro;
mod question;
mod results;

use ratatui::Frame;

use crate::{Phase, Quiz};

/// Render the view for the quiz's current phase.
pub fn render(frame: &mut Frame, quiz: &Quiz) {
    let area = frame.area();
    match quiz.phase() {
        Phase::Intro => intro::render(frame, area),
        Phase::Playing => question::render(frame, quiz, area),
        Phase::Results => results::render(frame, quiz, area),
        Phase::Done => {},
    }
}
