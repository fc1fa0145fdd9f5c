//! Fuzz target for the quiz state machine
//!
//! Drives a quiz over the builtin bank with arbitrary key, wheel and resize
//! sequences, including degenerate terminal sizes.
//!
//! # Invariants
//!
//! - Current question and cursor always index into the bank
//! - Recorded answers always name a real question and choice
//! - Viewport offset stays within its content
//! - Score stays within 0..=100
//! - Once Done, no event produces an action

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shellquiz_app::{
    KeyInput, Phase, QuestionBank, Quiz, QuizConfig, QuizEvent, ScrollDirection,
};

#[derive(Debug, Clone, Arbitrary)]
enum Input {
    Char(char),
    Ctrl(char),
    Enter,
    Esc,
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    WheelUp,
    WheelDown,
    Resize(u16, u16),
    IntroElapsed,
    ShowResults,
    Quit,
}

impl Input {
    fn event(self) -> QuizEvent {
        match self {
            Self::Char(c) => QuizEvent::Key(KeyInput::Char(c)),
            Self::Ctrl(c) => QuizEvent::Key(KeyInput::Ctrl(c)),
            Self::Enter => QuizEvent::Key(KeyInput::Enter),
            Self::Esc => QuizEvent::Key(KeyInput::Esc),
            Self::Left => QuizEvent::Key(KeyInput::Left),
            Self::Right => QuizEvent::Key(KeyInput::Right),
            Self::Up => QuizEvent::Key(KeyInput::Up),
            Self::Down => QuizEvent::Key(KeyInput::Down),
            Self::PageUp => QuizEvent::Key(KeyInput::PageUp),
            Self::PageDown => QuizEvent::Key(KeyInput::PageDown),
            Self::Home => QuizEvent::Key(KeyInput::Home),
            Self::End => QuizEvent::Key(KeyInput::End),
            Self::WheelUp => QuizEvent::Scroll(ScrollDirection::Up),
            Self::WheelDown => QuizEvent::Scroll(ScrollDirection::Down),
            Self::Resize(cols, rows) => QuizEvent::Resize(cols, rows),
            Self::IntroElapsed => QuizEvent::IntroElapsed,
            Self::ShowResults => QuizEvent::ShowResults,
            Self::Quit => QuizEvent::Quit,
        }
    }
}

#[derive(Debug, Arbitrary)]
struct Session {
    cols: u16,
    rows: u16,
    dismiss_intro_on_key: bool,
    inputs: Vec<Input>,
}

fuzz_target!(|session: Session| {
    let config = QuizConfig { dismiss_intro_on_key: session.dismiss_intro_on_key, ..QuizConfig::default() };
    let mut quiz = Quiz::new(QuestionBank::builtin(), config, (session.cols, session.rows));
    let _ = quiz.handle(QuizEvent::Init);

    for input in session.inputs.into_iter().take(256) {
        let was_done = quiz.phase() == Phase::Done;
        let actions = quiz.handle(input.event());
        if was_done {
            assert!(actions.is_empty());
        }
        check(&quiz);
    }
});

fn check(quiz: &Quiz) {
    let bank = quiz.bank();
    assert!(quiz.current_question() < bank.len());
    assert!(quiz.cursor() < quiz.question().choices.len());

    for (&question, &choice) in quiz.answers() {
        assert!(bank.get(question).is_some_and(|q| choice < q.choices.len()));
    }

    let viewport = quiz.viewport();
    let max_offset = viewport.line_count().saturating_sub(usize::from(viewport.height()));
    assert!(viewport.y_offset() <= max_offset);
    assert!(quiz.score() <= 100);
}
