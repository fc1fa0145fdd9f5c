//! Styles and fixed strings.

use ratatui::style::{Color, Modifier, Style};

/// Intro banner: bold green.
pub const INTRO_BANNER: Style = Style::new().fg(Color::Rgb(0x13, 0xEC, 0x1F)).add_modifier(Modifier::BOLD);

/// Results header and footer badges.
pub const HEADER: Style = Style::new().fg(Color::Rgb(0xFA, 0xFA, 0xFA)).bg(Color::Rgb(0x7D, 0x56, 0xF4));

/// Headings in rendered markup.
pub const HEADING: Style = Style::new().fg(Color::Rgb(0x7D, 0x56, 0xF4)).add_modifier(Modifier::BOLD);

/// Question heading on the playing screen.
pub const QUESTION_HEADING: Style = Style::new().add_modifier(Modifier::BOLD);

/// Row under the cursor.
pub const SELECTED_ROW: Style = Style::new().fg(Color::Rgb(0x13, 0xEC, 0x1F));

/// Help line at the bottom of the playing screen.
pub const HELP: Style = Style::new().fg(Color::DarkGray);

/// Banner lines shown during the intro.
pub const INTRO_LINES: [&str; 3] = ["Welcome to", "AWS QUIZ OVER SSH", "A Zachary Proser joint"];

/// Title in the results header.
pub const RESULTS_TITLE: &str = "Your AWS SSH Quiz Results!";

/// Help line on the playing screen.
pub const HELP_LINE: &str = "(press q to quit - {h, <-} for prev - {l, ->} for next)";

/// Correct answer glyph.
pub const SUCCESS_GLYPH: &str = "✅";

/// Incorrect answer glyph.
pub const FAILURE_GLYPH: &str = "❌";

/// Prefix of the choice under the cursor.
pub const SELECTED_MARKER: &str = "[✅] ";

/// Prefix of every other choice.
pub const UNSELECTED_MARKER: &str = "[  ] ";

/// Horizontal rule glyph for the results header and footer.
pub const RULE: &str = "─";
