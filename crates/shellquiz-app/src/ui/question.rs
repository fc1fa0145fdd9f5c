//! Question screen
//!
//! Shows the current question, its choices with the cursor marker, and the
//! help line.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{Quiz, markup::wrap, report::WRAP_WIDTH, theme};

/// Render the question screen.
pub fn render(frame: &mut Frame, quiz: &Quiz, area: Rect) {
    let question = quiz.question();
    let width = usize::from(area.width).clamp(1, WRAP_WIDTH);

    let mut lines = vec![
        Line::styled(
            format!("Question #{} of {}", quiz.current_question() + 1, quiz.bank().len()),
            theme::QUESTION_HEADING,
        ),
        Line::default(),
    ];
    lines.extend(wrap(&question.prompt, width).lines().map(|line| Line::raw(line.to_owned())));
    lines.push(Line::default());

    for (index, choice) in question.choices.iter().enumerate() {
        let row = if index == quiz.cursor() {
            Line::from(vec![
                Span::raw(theme::SELECTED_MARKER),
                Span::styled(choice.clone(), theme::SELECTED_ROW),
            ])
        } else {
            Line::from(vec![Span::raw(theme::UNSELECTED_MARKER), Span::raw(choice.clone())])
        };
        lines.push(row);
        lines.push(Line::default());
    }

    lines.push(Line::styled(theme::HELP_LINE, theme::HELP));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}
