use crate::config::PASS_THRESHOLD_PERCENT;
use crate::model::{SessionQuestion, TopicId};

//
// ─── SCORE ─────────────────────────────────────────────────────────────────────
//

/// Aggregate result of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    pub percent: u32,
}

impl Score {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.percent >= PASS_THRESHOLD_PERCENT
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        if self.passed() {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

/// Scores answers against a sequence. Pure; calling it twice gives the same result.
///
/// A position counts as correct only if its answer equals the question's
/// correct index. Missing answers count as unanswered.
#[must_use]
pub fn score(sequence: &[SessionQuestion], answers: &[Option<usize>]) -> Score {
    let total = sequence.len();
    let correct = sequence
        .iter()
        .enumerate()
        .filter(|(idx, entry)| entry.question.is_correct(answers.get(*idx).copied().flatten()))
        .count();
    Score {
        correct,
        total,
        percent: percent(correct, total),
    }
}

fn percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    // Integer round-half-up of correct * 100 / total.
    let scaled = (correct * 200 + total) / (total * 2);
    u32::try_from(scaled).unwrap_or(100)
}

//
// ─── DETAILS ───────────────────────────────────────────────────────────────────
//

/// How an option is annotated in the per-question breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Correct,
    WrongChoice,
    Plain,
}

impl OptionMark {
    /// Suffix shown after the option text.
    #[must_use]
    pub fn note(self) -> &'static str {
        match self {
            OptionMark::Correct => " — correct",
            OptionMark::WrongChoice => " — your answer",
            OptionMark::Plain => "",
        }
    }
}

/// Everything needed to show one question in results or review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDetail {
    pub number: usize,
    pub topic: TopicId,
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub chosen: Option<usize>,
}

impl QuestionDetail {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.chosen == Some(self.correct_index)
    }

    #[must_use]
    pub fn mark(&self, option: usize) -> OptionMark {
        if option == self.correct_index {
            OptionMark::Correct
        } else if self.chosen == Some(option) {
            OptionMark::WrongChoice
        } else {
            OptionMark::Plain
        }
    }
}

/// Score plus per-question breakdown, captured once when a session finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReport {
    pub score: Score,
    pub details: Vec<QuestionDetail>,
}

impl ScoreReport {
    #[must_use]
    pub fn build(sequence: &[SessionQuestion], answers: &[Option<usize>]) -> Self {
        let details = sequence
            .iter()
            .enumerate()
            .map(|(idx, entry)| QuestionDetail {
                number: idx + 1,
                topic: entry.topic.clone(),
                text: entry.question.text().to_string(),
                options: entry.question.options().to_vec(),
                correct_index: entry.question.correct_index(),
                chosen: answers.get(idx).copied().flatten(),
            })
            .collect();
        Self {
            score: score(sequence, answers),
            details,
        }
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        self.score.verdict()
    }
}
