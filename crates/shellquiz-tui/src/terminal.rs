//! Terminal driver for local mode.
//!
//! Implements the [`Driver`] trait for the controlling terminal using
//! crossterm for events and ratatui for rendering.

use std::io::{self, Stdout, stdout};

use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use shellquiz_app::{Driver, Quiz, QuizEvent, ui};
use thiserror::Error;

use crate::input;

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Raw mode, alternate screen and mouse capture for as long as it lives.
///
/// Dropping the guard restores the terminal, also on error paths.
pub struct RawTerminal {
    _private: (),
}

impl RawTerminal {
    /// Switch the controlling terminal into full-screen raw mode.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self { _private: () };
        execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        Ok(guard)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, Show);
        let _ = disable_raw_mode();
    }
}

/// Terminal driver implementing the [`Driver`] trait.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    events: EventStream,
    // Dropped last so the final frame lands before the screen is restored.
    _raw: RawTerminal,
}

impl TerminalDriver {
    /// Take over the controlling terminal.
    pub fn new() -> Result<Self, TerminalError> {
        let raw = RawTerminal::enter()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        terminal.clear()?;

        Ok(Self { terminal, events: EventStream::new(), _raw: raw })
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self) -> Result<Option<QuizEvent>, Self::Error> {
        while let Some(event) = self.events.next().await {
            if let Some(event) = input::quiz_event(event?) {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }

    async fn render(&mut self, quiz: &Quiz) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::render(frame, quiz))?;
        Ok(())
    }

    fn window_size(&self) -> Result<(u16, u16), Self::Error> {
        Ok(crossterm::terminal::size()?)
    }

    async fn stop(&mut self) {
        let _ = self.terminal.show_cursor();
    }
}
