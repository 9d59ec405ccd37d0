use thiserror::Error;

use crate::model::ids::TopicId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("a question needs at least two options, got {count}")]
    TooFewOptions { count: usize },

    #[error("correct index {index} is out of range for {count} options")]
    CorrectIndexOutOfRange { index: usize, count: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question.
///
/// Invariants: at least two options, and `correct_index` names one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_index: usize,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::TooFewOptions` for fewer than two options and
    /// `QuestionError::CorrectIndexOutOfRange` if the index names no option.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
    ) -> Result<Self, QuestionError> {
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                count: options.len(),
            });
        }
        if correct_index >= options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_index,
                count: options.len(),
            });
        }
        Ok(Self {
            text: text.into(),
            options,
            correct_index,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    /// True if `answer` is a valid choice for this question (or unanswered).
    #[must_use]
    pub fn accepts(&self, answer: Option<usize>) -> bool {
        answer.is_none_or(|idx| idx < self.options.len())
    }

    /// Unanswered never counts as correct.
    #[must_use]
    pub fn is_correct(&self, answer: Option<usize>) -> bool {
        answer == Some(self.correct_index)
    }

    /// Rebuilds the question with options in the order given by `order`,
    /// where `order[new_pos]` is the old position.
    pub(crate) fn permuted(&self, order: &[usize]) -> Self {
        let options = order.iter().map(|&old| self.options[old].clone()).collect();
        let correct_index = order
            .iter()
            .position(|&old| old == self.correct_index)
            .unwrap_or(self.correct_index);
        Self {
            text: self.text.clone(),
            options,
            correct_index,
        }
    }
}

/// One entry of a session sequence: a (per-session shuffled) question and its topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionQuestion {
    pub question: Question,
    pub topic: TopicId,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
