//! Quiz state machine.
//!
//! [`Quiz`] owns everything one session knows about its progress: the
//! phase, the question being shown, the cursor, the answers given so far and
//! the results viewport. It consumes [`QuizEvent`]s and returns
//! [`QuizAction`]s; it never performs I/O, so the same machine runs behind a
//! local terminal, a remote session or a test script.
//!
//! # Phases
//!
//! ```text
//! Intro --IntroElapsed--> Playing --enter on last--> Results
//!   \                       |                          |
//!    `------- quit ---------+--------- quit -----------'--> Done
//! ```

use std::{collections::BTreeMap, time::Duration};

use crate::{
    KeyInput, Question, QuestionBank, QuizAction, QuizEvent, ScrollDirection, Viewport,
    compute_score, markup::render_markup, report::results_document, viewport::WHEEL_SCROLL,
};

/// Rows used by the results header.
pub const HEADER_HEIGHT: u16 = 1;

/// Rows used by the results footer.
pub const FOOTER_HEIGHT: u16 = 1;

/// Chosen answer per question index, in question order.
pub type AnswerRecord = BTreeMap<usize, usize>;

/// Tunables for a single quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizConfig {
    /// How long the intro banner stays up.
    pub intro_delay: Duration,
    /// Whether any key (other than quit) skips the intro.
    pub dismiss_intro_on_key: bool,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self { intro_delay: Duration::from_secs(3), dismiss_intro_on_key: false }
    }
}

/// Where a session is in the quiz flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Banner shown while the intro timer runs.
    Intro,
    /// Answering questions.
    Playing,
    /// Scrolling through the scored results.
    Results,
    /// Terminal. Every further event is ignored.
    Done,
}

/// Per-session quiz state machine.
///
/// # Invariants
///
/// - `current < bank.len()`.
/// - `cursor < bank[current].choices.len()`.
/// - Answers only hold indices recorded by [`Quiz::submit`].
#[derive(Debug, Clone)]
pub struct Quiz {
    bank: QuestionBank,
    config: QuizConfig,
    phase: Phase,
    current: usize,
    cursor: usize,
    answers: AnswerRecord,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    viewport: Viewport,
    /// Set once the results screen has been shown.
    completed: bool,
}

impl Quiz {
    /// Create a quiz in the intro phase for a terminal of `terminal_size`.
    pub fn new(bank: QuestionBank, config: QuizConfig, terminal_size: (u16, u16)) -> Self {
        let (cols, rows) = terminal_size;
        Self {
            bank,
            config,
            phase: Phase::Intro,
            current: 0,
            cursor: 0,
            answers: AnswerRecord::new(),
            terminal_size,
            viewport: Viewport::new(cols, viewport_height(rows)),
            completed: false,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: QuizEvent) -> Vec<QuizAction> {
        if self.phase == Phase::Done {
            return vec![];
        }

        match event {
            QuizEvent::Init => {
                if self.phase != Phase::Intro {
                    return vec![];
                }
                vec![
                    QuizAction::Schedule {
                        delay: self.config.intro_delay,
                        event: QuizEvent::IntroElapsed,
                    },
                    QuizAction::Render,
                ]
            },
            QuizEvent::IntroElapsed => {
                if self.phase != Phase::Intro {
                    return vec![];
                }
                self.start_playing()
            },
            QuizEvent::Key(key) => self.handle_key(key),
            QuizEvent::Scroll(direction) => {
                if self.phase != Phase::Results {
                    return vec![];
                }
                match direction {
                    ScrollDirection::Up => self.viewport.line_up(WHEEL_SCROLL),
                    ScrollDirection::Down => self.viewport.line_down(WHEEL_SCROLL),
                }
                vec![QuizAction::Render]
            },
            QuizEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                self.viewport.set_size(cols, viewport_height(rows));
                vec![QuizAction::Render]
            },
            QuizEvent::ShowResults => match self.phase {
                Phase::Intro | Phase::Playing => self.enter_results(),
                Phase::Results | Phase::Done => vec![],
            },
            QuizEvent::Quit => self.quit(),
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<QuizAction> {
        if is_quit_key(key) {
            return self.quit();
        }

        match self.phase {
            Phase::Intro if self.config.dismiss_intro_on_key => self.start_playing(),
            Phase::Intro | Phase::Done => vec![],
            Phase::Playing => self.handle_playing_key(key),
            Phase::Results => self.handle_results_key(key),
        }
    }

    fn handle_playing_key(&mut self, key: KeyInput) -> Vec<QuizAction> {
        match key {
            KeyInput::Down | KeyInput::Char('j') => self.cursor_down(),
            KeyInput::Up | KeyInput::Char('k') => self.cursor_up(),
            KeyInput::Left | KeyInput::Char('h') => self.previous_question(),
            KeyInput::Right | KeyInput::Char('l') => self.next_question(),
            KeyInput::Enter => return self.submit(),
            _ => return vec![],
        }
        vec![QuizAction::Render]
    }

    fn handle_results_key(&mut self, key: KeyInput) -> Vec<QuizAction> {
        let viewport = &mut self.viewport;
        match key {
            KeyInput::Up | KeyInput::Char('k') => viewport.line_up(1),
            KeyInput::Down | KeyInput::Char('j') => viewport.line_down(1),
            KeyInput::PageUp | KeyInput::Char('b') => viewport.page_up(),
            KeyInput::PageDown | KeyInput::Char('f' | ' ') => viewport.page_down(),
            KeyInput::Char('u') | KeyInput::Ctrl('u') => viewport.half_page_up(),
            KeyInput::Char('d') | KeyInput::Ctrl('d') => viewport.half_page_down(),
            KeyInput::Home | KeyInput::Char('g') => viewport.goto_top(),
            KeyInput::End | KeyInput::Char('G') => viewport.goto_bottom(),
            _ => return vec![],
        }
        vec![QuizAction::Render]
    }

    /// Move the cursor to the next choice, wrapping to the first.
    pub fn cursor_down(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        let count = self.choice_count();
        self.cursor = (self.cursor + 1) % count;
    }

    /// Move the cursor to the previous choice, wrapping to the last.
    pub fn cursor_up(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        let count = self.choice_count();
        self.cursor = (self.cursor + count - 1) % count;
    }

    /// Show the next question, staying put on the last one.
    pub fn next_question(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.current = (self.current + 1).min(self.bank.last_index());
        self.cursor = 0;
    }

    /// Show the previous question, staying put on the first one.
    pub fn previous_question(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.current = self.current.saturating_sub(1);
        self.cursor = 0;
    }

    /// Record the cursor as the answer to the current question.
    ///
    /// Advances to the next question, or enters the results on the last.
    pub fn submit(&mut self) -> Vec<QuizAction> {
        if self.phase != Phase::Playing {
            return vec![];
        }

        self.answers.insert(self.current, self.cursor);
        tracing::debug!(question = self.current, choice = self.cursor, "answer recorded");

        if self.current >= self.bank.last_index() {
            return self.enter_results();
        }

        self.current += 1;
        self.cursor = 0;
        vec![QuizAction::Render]
    }

    fn start_playing(&mut self) -> Vec<QuizAction> {
        self.phase = Phase::Playing;
        self.current = 0;
        self.cursor = 0;
        vec![QuizAction::Render]
    }

    fn enter_results(&mut self) -> Vec<QuizAction> {
        self.phase = Phase::Results;
        self.completed = true;

        let (cols, rows) = self.terminal_size;
        let document = results_document(&self.bank, &self.answers);
        self.viewport.set_size(cols, viewport_height(rows));
        self.viewport.set_content(render_markup(&document));
        self.viewport.goto_top();

        tracing::debug!(score = self.score(), answered = self.answers.len(), "showing results");
        vec![QuizAction::Render, QuizAction::ProbeWindowSize]
    }

    fn quit(&mut self) -> Vec<QuizAction> {
        self.phase = Phase::Done;
        vec![QuizAction::Quit]
    }

    fn choice_count(&self) -> usize {
        self.question().choices.len().max(1)
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the question being shown.
    pub fn current_question(&self) -> usize {
        self.current
    }

    /// Highlighted choice of the current question.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Answers recorded so far.
    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    /// Score for the answers recorded so far.
    pub fn score(&self) -> u8 {
        compute_score(&self.bank, &self.answers)
    }

    /// Score, once the results screen has been reached.
    ///
    /// Stays available after the session quits from the results screen.
    pub fn final_score(&self) -> Option<u8> {
        self.completed.then(|| self.score())
    }

    /// The question being shown.
    pub fn question(&self) -> &Question {
        // `current` never leaves the bank and the bank is never empty.
        &self.bank.questions()[self.current]
    }

    /// The question bank this session draws from.
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Results viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Last known terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }
}

fn viewport_height(rows: u16) -> u16 {
    rows.saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT)
}

fn is_quit_key(key: KeyInput) -> bool {
    matches!(key, KeyInput::Char('q') | KeyInput::Esc | KeyInput::Ctrl('c'))
}
