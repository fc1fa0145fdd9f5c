//! Crossterm event translation.
//!
//! Converts terminal events into the terminal-agnostic inputs the quiz and
//! the wire protocol understand.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use shellquiz_app::{KeyInput, QuizEvent, ScrollDirection};
use shellquiz_proto::ClientFrame;

/// Convert a crossterm key event. Only presses are forwarded.
pub fn convert_key(event: KeyEvent) -> Option<KeyInput> {
    if event.kind != KeyEventKind::Press {
        return None;
    }

    if event.modifiers.contains(KeyModifiers::CONTROL)
        && let KeyCode::Char(c) = event.code
    {
        return Some(KeyInput::Ctrl(c.to_ascii_lowercase()));
    }

    match event.code {
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Esc => Some(KeyInput::Esc),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Tab => Some(KeyInput::Tab),
        KeyCode::Left => Some(KeyInput::Left),
        KeyCode::Right => Some(KeyInput::Right),
        KeyCode::Up => Some(KeyInput::Up),
        KeyCode::Down => Some(KeyInput::Down),
        KeyCode::PageUp => Some(KeyInput::PageUp),
        KeyCode::PageDown => Some(KeyInput::PageDown),
        KeyCode::Home => Some(KeyInput::Home),
        KeyCode::End => Some(KeyInput::End),
        _ => None,
    }
}

/// Convert a crossterm mouse event. Only the wheel is forwarded.
pub fn convert_mouse(event: MouseEvent) -> Option<ScrollDirection> {
    match event.kind {
        MouseEventKind::ScrollUp => Some(ScrollDirection::Up),
        MouseEventKind::ScrollDown => Some(ScrollDirection::Down),
        _ => None,
    }
}

/// Convert a terminal event into a quiz event.
pub fn quiz_event(event: Event) -> Option<QuizEvent> {
    match event {
        Event::Key(key) => convert_key(key).map(QuizEvent::Key),
        Event::Mouse(mouse) => convert_mouse(mouse).map(QuizEvent::Scroll),
        Event::Resize(cols, rows) => Some(QuizEvent::Resize(cols, rows)),
        _ => None,
    }
}

/// Convert a terminal event into a frame for a remote session.
pub fn client_frame(event: Event) -> Option<ClientFrame> {
    match event {
        Event::Key(key) => convert_key(key).map(ClientFrame::Key),
        Event::Mouse(mouse) => convert_mouse(mouse).map(ClientFrame::Scroll),
        Event::Resize(cols, rows) => Some(ClientFrame::Resize { cols, rows }),
        _ => None,
    }
}
