//! Scrollable window over pre-rendered text.

use ratatui::text::{Line, Text};

/// Lines moved per mouse wheel notch.
pub const WHEEL_SCROLL: usize = 3;

/// Vertical scroll window over a fixed buffer of styled lines.
///
/// # Invariants
///
/// - `y_offset` is always within `0..=max(0, line_count - height)`.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    width: u16,
    height: u16,
    y_offset: usize,
    lines: Vec<Line<'static>>,
}

impl Viewport {
    /// Create an empty viewport of the given size.
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height, y_offset: 0, lines: Vec::new() }
    }

    /// Replace the content, keeping the offset where it still fits.
    pub fn set_content(&mut self, content: impl Into<Text<'static>>) {
        self.lines = content.into().lines;
        self.clamp();
    }

    /// Change the window dimensions.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.clamp();
    }

    /// Scroll by `delta` lines; negative scrolls up.
    pub fn scroll(&mut self, delta: isize) {
        self.y_offset = if delta.is_negative() {
            self.y_offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.y_offset.saturating_add(delta.unsigned_abs())
        };
        self.clamp();
    }

    /// Jump to an absolute offset (clamped).
    pub fn set_y_offset(&mut self, offset: usize) {
        self.y_offset = offset;
        self.clamp();
    }

    /// Scroll up by `n` lines.
    pub fn line_up(&mut self, n: usize) {
        self.set_y_offset(self.y_offset.saturating_sub(n));
    }

    /// Scroll down by `n` lines.
    pub fn line_down(&mut self, n: usize) {
        self.set_y_offset(self.y_offset.saturating_add(n));
    }

    /// Scroll up one window.
    pub fn page_up(&mut self) {
        self.line_up(self.page());
    }

    /// Scroll down one window.
    pub fn page_down(&mut self) {
        self.line_down(self.page());
    }

    /// Scroll up half a window.
    pub fn half_page_up(&mut self) {
        self.line_up((self.page() / 2).max(1));
    }

    /// Scroll down half a window.
    pub fn half_page_down(&mut self) {
        self.line_down((self.page() / 2).max(1));
    }

    /// Show the first line.
    pub fn goto_top(&mut self) {
        self.y_offset = 0;
    }

    /// Show the last line.
    pub fn goto_bottom(&mut self) {
        self.y_offset = self.max_offset();
    }

    /// Scroll position in percent (`0.0..=100.0`).
    ///
    /// Content that fits entirely in the window reports `0.0`.
    pub fn scroll_percent(&self) -> f64 {
        let max = self.max_offset();
        if max == 0 {
            return 0.0;
        }
        (self.y_offset as f64 / max as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// Lines currently inside the window.
    pub fn visible_text(&self) -> &[Line<'static>] {
        let end = self.y_offset.saturating_add(usize::from(self.height)).min(self.lines.len());
        self.lines.get(self.y_offset..end).unwrap_or_default()
    }

    /// Current top line.
    pub fn y_offset(&self) -> usize {
        self.y_offset
    }

    /// Window width in columns.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Window height in rows.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Total number of content lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether the last line is visible.
    pub fn at_bottom(&self) -> bool {
        self.y_offset >= self.max_offset()
    }

    fn page(&self) -> usize {
        usize::from(self.height).max(1)
    }

    fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(usize::from(self.height))
    }

    fn clamp(&mut self) {
        self.y_offset = self.y_offset.min(self.max_offset());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Text<'static> {
        Text::from((0..count).map(|i| Line::from(format!("line {i}"))).collect::<Vec<_>>())
    }

    #[test]
    fn scroll_percent_at_both_ends() {
        let mut viewport = Viewport::new(80, 20);
        viewport.set_content(numbered(100));

        assert!(viewport.scroll_percent().abs() < f64::EPSILON);

        viewport.set_y_offset(80);
        assert!((viewport.scroll_percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fitting_content_reports_zero() {
        let mut viewport = Viewport::new(80, 20);
        viewport.set_content(numbered(5));
        viewport.goto_bottom();

        assert_eq!(viewport.y_offset(), 0);
        assert!(viewport.scroll_percent().abs() < f64::EPSILON);
        assert_eq!(viewport.visible_text().len(), 5);
    }

    #[test]
    fn offset_is_clamped() {
        let mut viewport = Viewport::new(80, 20);
        viewport.set_content(numbered(30));

        viewport.scroll(100);
        assert_eq!(viewport.y_offset(), 10);
        assert!(viewport.at_bottom());

        viewport.scroll(-100);
        assert_eq!(viewport.y_offset(), 0);
    }

    #[test]
    fn shrinking_content_pulls_offset_back() {
        let mut viewport = Viewport::new(80, 10);
        viewport.set_content(numbered(50));
        viewport.goto_bottom();
        assert_eq!(viewport.y_offset(), 40);

        viewport.set_content(numbered(15));
        assert_eq!(viewport.y_offset(), 5);
    }

    #[test]
    fn growing_window_pulls_offset_back() {
        let mut viewport = Viewport::new(80, 10);
        viewport.set_content(numbered(30));
        viewport.goto_bottom();

        viewport.set_size(80, 25);
        assert_eq!(viewport.y_offset(), 5);
    }

    #[test]
    fn visible_text_is_the_window() {
        let mut viewport = Viewport::new(80, 3);
        viewport.set_content(numbered(10));
        viewport.line_down(4);

        let visible: Vec<String> = viewport.visible_text().iter().map(ToString::to_string).collect();
        assert_eq!(visible, vec!["line 4", "line 5", "line 6"]);
    }

    #[test]
    fn paging_moves_by_window_height() {
        let mut viewport = Viewport::new(80, 10);
        viewport.set_content(numbered(40));

        viewport.page_down();
        assert_eq!(viewport.y_offset(), 10);
        viewport.half_page_down();
        assert_eq!(viewport.y_offset(), 15);
        viewport.page_up();
        assert_eq!(viewport.y_offset(), 5);
        viewport.half_page_up();
        assert_eq!(viewport.y_offset(), 0);
    }
}
