//! Intro banner

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::Paragraph,
};

use crate::theme;

/// Render the banner centred in `area`.
pub fn render(frame: &mut Frame, area: Rect) {
    let banner_height = theme::INTRO_LINES.len() as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(banner_height), Constraint::Fill(1)])
        .split(area);

    let [_, banner_area, _] = chunks.as_ref() else {
        return;
    };

    let lines: Vec<Line> = theme::INTRO_LINES.iter().copied().map(Line::from).collect();
    let banner = Paragraph::new(lines).style(theme::INTRO_BANNER).alignment(Alignment::Center);

    frame.render_widget(banner, *banner_area);
}
