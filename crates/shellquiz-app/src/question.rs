//! Question bank.
//!
//! The bank is built once at startup and shared read-only by every session.
//! Cloning a [`QuestionBank`] only bumps a reference count.

use std::sync::Arc;

use thiserror::Error;

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Question text.
    pub prompt: String,
    /// Possible answers, in display order.
    pub choices: Vec<String>,
    /// Index into `choices` of the correct answer.
    pub correct_choice: usize,
}

impl Question {
    /// Create a question.
    pub fn new(
        prompt: impl Into<String>,
        choices: impl IntoIterator<Item = impl Into<String>>,
        correct_choice: usize,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            choices: choices.into_iter().map(Into::into).collect(),
            correct_choice,
        }
    }
}

/// Reasons a question bank is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    /// The bank holds no questions.
    #[error("question bank is empty")]
    Empty,

    /// A question has no choices.
    #[error("question {index} has no choices")]
    NoChoices {
        /// Position of the question in the bank.
        index: usize,
    },

    /// A question's correct answer points past its choices.
    #[error("question {index} marks choice {correct} correct but has {choices} choices")]
    CorrectChoiceOutOfRange {
        /// Position of the question in the bank.
        index: usize,
        /// Declared correct choice.
        correct: usize,
        /// Number of choices.
        choices: usize,
    },
}

/// Immutable, validated set of questions.
///
/// # Invariants
///
/// - At least one question.
/// - Every question has at least one choice.
/// - Every `correct_choice` is a valid index into its choices.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Arc<[Question]>,
}

impl QuestionBank {
    /// Validate and wrap a list of questions.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        validate(&questions)?;
        Ok(Self { questions: questions.into() })
    }

    /// The bank served by default.
    pub fn builtin() -> Self {
        Self { questions: builtin_questions().into() }
    }

    /// Number of questions (never zero).
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Question at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// All questions in order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Index of the last question.
    pub fn last_index(&self) -> usize {
        self.questions.len().saturating_sub(1)
    }
}

fn validate(questions: &[Question]) -> Result<(), BankError> {
    if questions.is_empty() {
        return Err(BankError::Empty);
    }

    for (index, question) in questions.iter().enumerate() {
        if question.choices.is_empty() {
            return Err(BankError::NoChoices { index });
        }
        if question.correct_choice >= question.choices.len() {
            return Err(BankError::CorrectChoiceOutOfRange {
                index,
                correct: question.correct_choice,
                choices: question.choices.len(),
            });
        }
    }

    Ok(())
}

fn builtin_questions() -> Vec<Question> {
    vec![
        Question::new(
            "You need to provide AWS credentials to an EC2 instance so that an application \
             running on the instance can contact the S3 and DynamoDB services. How should you \
             provide AWS credentials to the instance?",
            [
                "Create an IAM role",
                "Create an IAM user. Generate security credentials for the IAM user, then write \
                 them to ~/.aws/credentials on the EC2 instance",
                "SSH into the EC2 instance. Export the ${AWS_ACCESS_KEY_ID} and \
                 ${AWS_SECRET_ACCESS_KEY} environment variables so that the application running \
                 on the instance can contact the other AWS services",
            ],
            0,
        ),
        Question::new("Is it a good idea to learn AWS?", ["Yes", "No"], 0),
        Question::new(
            "What is the maximum amount of time a Lambda function can run for?",
            ["10 minutes", "15 minutes", "25 minutes"],
            1,
        ),
        Question::new("Can you use S3 buckets to host a static web site?", ["Yes", "No"], 0),
        Question::new(
            "Should you leak sensitive secrets by uploading them to a public S3 bucket?",
            ["Yes", "No"],
            1,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_bank_is_valid() {
        assert_eq!(validate(&builtin_questions()), Ok(()));
        assert_eq!(QuestionBank::builtin().len(), 5);
    }

    #[test]
    fn builtin_answer_key() {
        let bank = QuestionBank::builtin();
        let key: Vec<_> = bank.questions().iter().map(|q| q.correct_choice).collect();
        assert_eq!(key, vec![0, 0, 1, 0, 1]);

        // Leaking secrets is never the right answer.
        let leak = &bank.questions()[4];
        assert!(leak.prompt.contains("leak sensitive secrets"));
        assert_eq!(leak.choices[leak.correct_choice], "No");
    }

    #[test]
    fn rejects_empty_bank() {
        assert_eq!(QuestionBank::new(Vec::new()).unwrap_err(), BankError::Empty);
    }

    #[test]
    fn rejects_question_without_choices() {
        let questions = vec![
            Question::new("ok", ["a"], 0),
            Question::new("broken", Vec::<String>::new(), 0),
        ];
        assert_eq!(QuestionBank::new(questions).unwrap_err(), BankError::NoChoices { index: 1 });
    }

    #[test]
    fn rejects_out_of_range_correct_choice() {
        let questions = vec![Question::new("q", ["a", "b"], 2)];
        assert_eq!(
            QuestionBank::new(questions).unwrap_err(),
            BankError::CorrectChoiceOutOfRange { index: 0, correct: 2, choices: 2 }
        );
    }
}
