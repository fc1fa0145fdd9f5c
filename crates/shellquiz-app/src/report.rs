//! Results document.
//!
//! Builds the markup shown on the results screen: one block per answered
//! question followed by the final score.

use std::fmt::Write;

use crate::{QuestionBank, compute_score, markup::wrap, quiz::AnswerRecord, theme};

/// Column at which prompts and answers are wrapped.
pub const WRAP_WIDTH: usize = 65;

/// Build the results document for `answers`, in question order.
pub fn results_document(bank: &QuestionBank, answers: &AnswerRecord) -> String {
    let mut doc = String::from("# Your quiz results\n\n");

    for (&index, &choice) in answers {
        let Some(question) = bank.get(index) else {
            continue;
        };
        let glyph = if question.correct_choice == choice {
            theme::SUCCESS_GLYPH
        } else {
            theme::FAILURE_GLYPH
        };
        let answer = question.choices.get(choice).map_or("", String::as_str);

        // Writing to a String cannot fail.
        let _ = write!(
            doc,
            "**Question {}**\n\n{}\n\n**Your answer**:\n\n{glyph} {}\n\n",
            index + 1,
            wrap(&question.prompt, WRAP_WIDTH),
            wrap(answer, WRAP_WIDTH),
        );
    }

    let _ = write!(doc, "# Your score: {}%", compute_score(bank, answers));
    doc
}
