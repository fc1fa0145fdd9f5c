//! Lightweight markup rendering for terminal output.
//!
//! Supports the subset the results document uses: headings, paragraphs,
//! strong and emphasis spans, line breaks, and bullet lists. Everything
//! else is rendered as plain text.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};
use unicode_width::UnicodeWidthStr;

use crate::theme;

/// Render markup into styled terminal text.
pub fn render_markup(source: &str) -> Text<'static> {
    let mut renderer = Renderer::default();
    for event in Parser::new(source) {
        renderer.event(event);
    }
    renderer.finish()
}

#[derive(Default)]
struct Renderer {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
    list_depth: usize,
}

impl Renderer {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { .. }) => self.push_style(theme::HEADING),
            Event::Start(Tag::Strong) => self.push_style(Style::new().add_modifier(Modifier::BOLD)),
            Event::Start(Tag::Emphasis) => {
                self.push_style(Style::new().add_modifier(Modifier::ITALIC));
            },
            Event::Start(Tag::List(_)) => {
                self.flush_line();
                self.list_depth += 1;
            },
            Event::Start(Tag::Item) => {
                let indent = "  ".repeat(self.list_depth.saturating_sub(1));
                self.current.push(Span::raw(format!("{indent}• ")));
            },
            Event::End(TagEnd::Heading(_)) => {
                self.styles.pop();
                self.end_block();
            },
            Event::End(TagEnd::Paragraph) => {
                if self.list_depth == 0 {
                    self.end_block();
                } else {
                    self.flush_line();
                }
            },
            Event::End(TagEnd::Strong | TagEnd::Emphasis) => {
                self.styles.pop();
            },
            Event::End(TagEnd::Item) => self.flush_line(),
            Event::End(TagEnd::List(_)) => {
                self.list_depth = self.list_depth.saturating_sub(1);
                if self.list_depth == 0 {
                    self.end_block();
                }
            },
            Event::Text(text) | Event::Code(text) => {
                let style = self.style();
                self.current.push(Span::styled(text.into_string(), style));
            },
            Event::SoftBreak | Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_line();
                self.lines.push(Line::from("─".repeat(20)));
                self.lines.push(Line::default());
            },
            _ => {},
        }
    }

    fn push_style(&mut self, style: Style) {
        let merged = self.style().patch(style);
        self.styles.push(merged);
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn flush_line(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.current)));
        }
    }

    fn end_block(&mut self) {
        self.flush_line();
        self.lines.push(Line::default());
    }

    fn finish(mut self) -> Text<'static> {
        self.flush_line();
        while self.lines.last().is_some_and(|line| line.width() == 0) {
            self.lines.pop();
        }
        Text::from(self.lines)
    }
}

/// Greedy word wrap to `width` display columns.
///
/// Existing line breaks are kept. Words longer than `width` are placed on
/// their own line without being split.
pub fn wrap(text: &str, width: usize) -> String {
    let width = width.max(1);
    let mut out = String::with_capacity(text.len());

    for (i, paragraph) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }

        let mut line_width = 0;
        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            if line_width > 0 && line_width + 1 + word_width > width {
                out.push('\n');
                line_width = 0;
            }
            if line_width > 0 {
                out.push(' ');
                line_width += 1;
            }
            out.push_str(word);
            line_width += word_width;
        }
    }

    out
}
