//! Results screen
//!
//! Header with the title, the scrollable results document, and a footer
//! with the scroll position.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use crate::{FOOTER_HEIGHT, HEADER_HEIGHT, Quiz, theme};

/// Render the results screen.
pub fn render(frame: &mut Frame, quiz: &Quiz, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);

    let [header_area, body_area, footer_area] = chunks.as_ref() else {
        return;
    };

    let header = Line::from(vec![
        Span::styled(theme::RESULTS_TITLE, theme::HEADER),
        Span::raw(rule(area.width, theme::RESULTS_TITLE.width())),
    ]);
    frame.render_widget(Paragraph::new(header), *header_area);

    let body = quiz.viewport().visible_text().to_vec();
    frame.render_widget(Paragraph::new(body), *body_area);

    let info = format!("{:3.0}%", quiz.viewport().scroll_percent());
    let footer = Line::from(vec![
        Span::raw(rule(area.width, info.width())),
        Span::styled(info, theme::HEADER),
    ]);
    frame.render_widget(Paragraph::new(footer), *footer_area);
}

fn rule(total: u16, used: usize) -> String {
    theme::RULE.repeat(usize::from(total).saturating_sub(used))
}
