//! Score computation.

use crate::{QuestionBank, quiz::AnswerRecord};

/// Percentage of questions answered correctly, rounded half up.
///
/// Unanswered questions count as incorrect, as do entries whose question
/// index is not in the bank. The divisor is the bank size, which is never
/// zero, so the result is always within `0..=100`. Only a perfect run scores
/// 100: anything short of it is capped at 99 however large the bank.
pub fn compute_score(bank: &QuestionBank, answers: &AnswerRecord) -> u8 {
    let total = bank.len();
    let correct = answers
        .iter()
        .filter(|(question, choice)| {
            bank.get(**question).is_some_and(|q| q.correct_choice == **choice)
        })
        .count();

    let percent = (correct * 100 + total / 2) / total.max(1);
    let ceiling = if correct < total { 99 } else { 100 };
    u8::try_from(percent.min(ceiling)).unwrap_or(ceiling as u8)
}
