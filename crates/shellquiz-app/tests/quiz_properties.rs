//! Property-based tests for the Quiz state machine.
//!
//! Tests verify that invariants hold under arbitrary event sequences and
//! arbitrary question banks.

use proptest::prelude::*;
use shellquiz_app::{
    AnswerRecord, KeyInput, Phase, Question, QuestionBank, Quiz, QuizConfig, QuizEvent,
    ScrollDirection, compute_score,
};

/// Generate a valid bank of 1..20 questions with 1..6 choices each.
fn bank_strategy() -> impl Strategy<Value = QuestionBank> {
    prop::collection::vec(
        (1usize..6).prop_flat_map(|choices| (Just(choices), 0..choices)),
        1..20,
    )
    .prop_map(|specs| {
        let questions = specs
            .into_iter()
            .enumerate()
            .map(|(i, (choices, correct))| {
                Question::new(format!("q{i}"), (0..choices).map(|c| format!("c{c}")), correct)
            })
            .collect();
        QuestionBank::new(questions).unwrap()
    })
}

/// Generate random quiz events, weighted towards navigation.
fn event_strategy() -> impl Strategy<Value = QuizEvent> {
    prop_oneof![
        1 => Just(QuizEvent::Init),
        2 => Just(QuizEvent::IntroElapsed),
        4 => prop::sample::select(vec![
            KeyInput::Up,
            KeyInput::Down,
            KeyInput::Left,
            KeyInput::Right,
            KeyInput::Enter,
            KeyInput::Char('j'),
            KeyInput::Char('k'),
            KeyInput::Char('h'),
            KeyInput::Char('l'),
            KeyInput::Char('G'),
            KeyInput::PageDown,
        ])
        .prop_map(QuizEvent::Key),
        1 => prop_oneof![Just(ScrollDirection::Up), Just(ScrollDirection::Down)]
            .prop_map(QuizEvent::Scroll),
        1 => (1u16..200, 1u16..100).prop_map(|(c, r)| QuizEvent::Resize(c, r)),
    ]
}

/// Check the structural invariants of a quiz.
fn assert_invariants(quiz: &Quiz) -> Result<(), TestCaseError> {
    let bank = quiz.bank();
    prop_assert!(quiz.current_question() < bank.len());
    prop_assert!(quiz.cursor() < quiz.question().choices.len());

    for (&question, &choice) in quiz.answers() {
        let q = bank.get(question);
        prop_assert!(q.is_some(), "answer for unknown question {}", question);
        prop_assert!(q.is_some_and(|q| choice < q.choices.len()));
    }

    let viewport = quiz.viewport();
    let max_offset = viewport.line_count().saturating_sub(usize::from(viewport.height()));
    prop_assert!(viewport.y_offset() <= max_offset);
    prop_assert!((0.0..=100.0).contains(&viewport.scroll_percent()));
    Ok(())
}

proptest! {
    #[test]
    fn prop_invariants_hold(
        bank in bank_strategy(),
        events in prop::collection::vec(event_strategy(), 0..80),
    ) {
        let mut quiz = Quiz::new(bank, QuizConfig::default(), (80, 24));
        assert_invariants(&quiz)?;

        for event in events {
            quiz.handle(event);
            assert_invariants(&quiz)?;
        }
    }

    #[test]
    fn prop_done_is_absorbing(
        bank in bank_strategy(),
        before in prop::collection::vec(event_strategy(), 0..20),
        after in prop::collection::vec(event_strategy(), 0..20),
    ) {
        let mut quiz = Quiz::new(bank, QuizConfig::default(), (80, 24));
        for event in before {
            quiz.handle(event);
        }

        quiz.handle(QuizEvent::Quit);
        prop_assert_eq!(quiz.phase(), Phase::Done);
        let answers = quiz.answers().clone();

        for event in after {
            prop_assert!(quiz.handle(event).is_empty());
        }
        prop_assert_eq!(quiz.phase(), Phase::Done);
        prop_assert_eq!(quiz.answers(), &answers);
    }

    #[test]
    fn prop_cursor_wraps(bank in bank_strategy(), steps in 0usize..20) {
        let mut quiz = Quiz::new(bank, QuizConfig::default(), (80, 24));
        quiz.handle(QuizEvent::IntroElapsed);
        let count = quiz.question().choices.len();

        quiz.cursor_up();
        prop_assert_eq!(quiz.cursor(), count - 1);
        quiz.cursor_down();
        prop_assert_eq!(quiz.cursor(), 0);

        for _ in 0..steps {
            quiz.cursor_down();
        }
        prop_assert_eq!(quiz.cursor(), steps % count);
    }

    #[test]
    fn prop_navigation_clamps(bank in bank_strategy(), steps in 0usize..40) {
        let mut quiz = Quiz::new(bank, QuizConfig::default(), (80, 24));
        quiz.handle(QuizEvent::IntroElapsed);
        let last = quiz.bank().last_index();

        for _ in 0..steps {
            quiz.next_question();
        }
        prop_assert_eq!(quiz.current_question(), steps.min(last));

        for _ in 0..steps + 1 {
            quiz.previous_question();
        }
        prop_assert_eq!(quiz.current_question(), 0);
        prop_assert_eq!(quiz.cursor(), 0);
    }

    #[test]
    fn prop_score_in_range(bank in bank_strategy(), picks in prop::collection::vec(any::<usize>(), 0..20)) {
        let answers: AnswerRecord = picks
            .iter()
            .enumerate()
            .filter_map(|(i, pick)| bank.get(i).map(|q| (i, pick % q.choices.len())))
            .collect();

        let score = compute_score(&bank, &answers);
        prop_assert!(score <= 100);

        let all_correct = answers.len() == bank.len()
            && answers.iter().all(|(&i, &c)| bank.get(i).is_some_and(|q| q.correct_choice == c));
        prop_assert_eq!(score == 100, all_correct);
    }

    #[test]
    fn prop_submitting_every_question_reaches_results(bank in bank_strategy()) {
        let mut quiz = Quiz::new(bank, QuizConfig::default(), (80, 24));
        quiz.handle(QuizEvent::IntroElapsed);

        for index in 0..quiz.bank().len() {
            prop_assert_eq!(quiz.current_question(), index);
            prop_assert_eq!(quiz.phase(), Phase::Playing);
            quiz.submit();
        }

        prop_assert_eq!(quiz.phase(), Phase::Results);
        prop_assert_eq!(quiz.answers().len(), quiz.bank().len());
        prop_assert!(quiz.final_score().is_some());
    }
}
