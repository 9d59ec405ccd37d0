use std::fmt;

use rand::Rng;

use crate::bank::QuestionBank;
use crate::model::{SessionQuestion, TopicId, TopicSelection};
use crate::scoring::ScoreReport;
use crate::shuffle::build_sequence;

//
// ─── MODE ──────────────────────────────────────────────────────────────────────
//

/// Lifecycle of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    #[default]
    Idle,
    Active,
    Finished,
    Reviewing,
}

/// Outcome of [`QuizSession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved,
    Finished,
    Ignored,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// The quiz session state machine.
///
/// Idle → Active → Finished → Reviewing → (reset) Idle. Transitions that are
/// not valid in the current mode are no-ops and report that they did nothing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct QuizSession {
    selected: TopicSelection,
    sequence: Vec<SessionQuestion>,
    position: usize,
    answers: Vec<Option<usize>>,
    mode: SessionMode,
    report: Option<ScoreReport>,
}

impl QuizSession {
    /// An idle session with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An idle session with a pre-filled topic selection.
    #[must_use]
    pub fn with_selection(selected: TopicSelection) -> Self {
        Self {
            selected,
            ..Self::default()
        }
    }

    /// Rebuilds an active session from persisted parts.
    ///
    /// Answers are padded or truncated to the sequence length, answers that do
    /// not name an option become unanswered, and `position` is clamped into
    /// range. Returns `None` for an empty sequence.
    #[must_use]
    pub fn from_parts(
        selected: TopicSelection,
        sequence: Vec<SessionQuestion>,
        mut answers: Vec<Option<usize>>,
        position: usize,
    ) -> Option<Self> {
        if sequence.is_empty() {
            return None;
        }
        answers.resize(sequence.len(), None);
        for (answer, entry) in answers.iter_mut().zip(&sequence) {
            if !entry.question.accepts(*answer) {
                *answer = None;
            }
        }
        let position = position.min(sequence.len() - 1);
        Some(Self {
            selected,
            sequence,
            position,
            answers,
            mode: SessionMode::Active,
            report: None,
        })
    }

    //
    // ─── TOPIC SELECTION (IDLE ONLY) ──────────────────────────────────────────
    //

    /// Adds or removes a topic while idle. Returns true if the selection changed.
    pub fn select_topic(&mut self, id: TopicId, selected: bool) -> bool {
        if self.mode != SessionMode::Idle {
            return false;
        }
        self.selected.set(id, selected)
    }

    /// Flips a topic while idle. Returns true if the selection changed.
    pub fn toggle_topic(&mut self, id: TopicId) -> bool {
        let selected = !self.selected.contains(&id);
        self.select_topic(id, selected)
    }

    //
    // ─── TRANSITIONS ──────────────────────────────────────────────────────────
    //

    /// Starts a session from the current selection.
    ///
    /// No-op (returns false) unless idle with a non-empty selection that yields
    /// at least one question.
    pub fn start<R: Rng + ?Sized>(&mut self, bank: &QuestionBank, rng: &mut R) -> bool {
        if self.mode != SessionMode::Idle || self.selected.is_empty() {
            return false;
        }
        let sequence = build_sequence(bank, &self.selected, rng);
        if sequence.is_empty() {
            return false;
        }
        self.answers = vec![None; sequence.len()];
        self.sequence = sequence;
        self.position = 0;
        self.mode = SessionMode::Active;
        self.report = None;
        true
    }

    /// Records the answer for the current position. Active only.
    ///
    /// Rejects indexes that do not name an option of the current question.
    pub fn record_answer(&mut self, answer: Option<usize>) -> bool {
        if self.mode != SessionMode::Active {
            return false;
        }
        let Some(entry) = self.sequence.get(self.position) else {
            return false;
        };
        if !entry.question.accepts(answer) {
            return false;
        }
        self.answers[self.position] = answer;
        true
    }

    /// Marks the current position unanswered. Active only.
    pub fn clear_current(&mut self) -> bool {
        self.record_answer(None)
    }

    /// Moves to the next question, or finishes on the last one. Active only.
    pub fn advance(&mut self) -> Advance {
        if self.mode != SessionMode::Active {
            return Advance::Ignored;
        }
        if self.is_last() {
            self.finish_scored();
            return Advance::Finished;
        }
        self.position += 1;
        Advance::Moved
    }

    /// Moves to the previous question. Active or Reviewing; no-op at the start.
    pub fn retreat(&mut self) -> bool {
        let navigable = matches!(self.mode, SessionMode::Active | SessionMode::Reviewing);
        if !navigable || self.position == 0 {
            return false;
        }
        self.position -= 1;
        true
    }

    /// Finishes an active session at any position.
    pub fn finish(&mut self) -> bool {
        if self.mode != SessionMode::Active {
            return false;
        }
        self.finish_scored();
        true
    }

    /// Starts a read-only replay of the finished session from the first question.
    pub fn enter_review(&mut self) -> bool {
        if self.mode != SessionMode::Finished {
            return false;
        }
        self.mode = SessionMode::Reviewing;
        self.position = 0;
        true
    }

    /// Moves forward in review mode. No-op on the last question.
    pub fn review_next(&mut self) -> bool {
        if self.mode != SessionMode::Reviewing || self.is_last() {
            return false;
        }
        self.position += 1;
        true
    }

    /// Ends the replay and shows the results again.
    pub fn leave_review(&mut self) -> bool {
        if self.mode != SessionMode::Reviewing {
            return false;
        }
        self.mode = SessionMode::Finished;
        self.position = 0;
        true
    }

    /// Drops everything, including the topic selection, and returns to idle.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn finish_scored(&mut self) {
        self.report = Some(ScoreReport::build(&self.sequence, &self.answers));
        self.mode = SessionMode::Finished;
    }

    //
    // ─── READS ────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    #[must_use]
    pub fn selected(&self) -> &TopicSelection {
        &self.selected
    }

    #[must_use]
    pub fn sequence(&self) -> &[SessionQuestion] {
        &self.sequence
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn answer_at(&self, index: usize) -> Option<usize> {
        self.answers.get(index).copied().flatten()
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    #[must_use]
    pub fn current(&self) -> Option<&SessionQuestion> {
        match self.mode {
            SessionMode::Active | SessionMode::Reviewing => self.sequence.get(self.position),
            SessionMode::Idle | SessionMode::Finished => None,
        }
    }

    #[must_use]
    pub fn current_answer(&self) -> Option<usize> {
        self.answer_at(self.position)
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        !self.sequence.is_empty() && self.position + 1 == self.sequence.len()
    }

    /// Set once, when the session finishes.
    #[must_use]
    pub fn report(&self) -> Option<&ScoreReport> {
        self.report.as_ref()
    }

    /// Progress including the current question, rounded to whole percent.
    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        let total = self.sequence.len();
        if total == 0 {
            return 0;
        }
        let shown = self.position + 1;
        u32::try_from((shown * 200 + total) / (total * 2)).unwrap_or(100)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("mode", &self.mode)
            .field("selected", &self.selected)
            .field("sequence_len", &self.sequence.len())
            .field("position", &self.position)
            .field("answers", &self.answers)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;
    use crate::scoring::Verdict;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    fn two_question_bank() -> QuestionBank {
        let q = |text: &str, answer| {
            Question::new(text, vec!["a".into(), "b".into(), "c".into()], answer).unwrap()
        };
        QuestionBank::from_topics([(TopicId::new("cpp"), vec![q("one", 0), q("two", 2)])])
    }

    fn started(bank: &QuestionBank) -> QuizSession {
        let mut session = QuizSession::new();
        session.select_topic(TopicId::new("cpp"), true);
        assert!(session.start(bank, &mut rng()));
        session
    }

    fn correct_at(session: &QuizSession) -> usize {
        session.current().unwrap().question.correct_index()
    }

    #[test]
    fn start_without_topics_is_a_noop() {
        let mut session = QuizSession::new();
        assert!(!session.start(&QuestionBank::builtin(), &mut rng()));
        assert_eq!(session.mode(), SessionMode::Idle);
        assert!(session.is_empty());
    }

    #[test]
    fn start_with_topic_missing_from_bank_is_a_noop() {
        let mut session = QuizSession::new();
        session.select_topic(TopicId::new("java"), true);
        assert!(!session.start(&two_question_bank(), &mut rng()));
        assert_eq!(session.mode(), SessionMode::Idle);
    }

    #[test]
    fn start_builds_full_sequence_with_unanswered_slots() {
        let bank = QuestionBank::builtin();
        let mut session = QuizSession::new();
        session.toggle_topic(TopicId::new("cpp"));
        session.toggle_topic(TopicId::new("java"));
        assert!(session.start(&bank, &mut rng()));

        assert_eq!(session.mode(), SessionMode::Active);
        assert_eq!(session.len(), 4);
        assert_eq!(session.answers(), &[None::<usize>; 4]);
        assert_eq!(session.position(), 0);
    }

    #[test]
    fn record_answer_rejects_out_of_range_index() {
        let bank = two_question_bank();
        let mut session = started(&bank);
        assert!(!session.record_answer(Some(3)));
        assert!(session.record_answer(Some(2)));
        assert_eq!(session.current_answer(), Some(2));
        assert!(session.clear_current());
        assert_eq!(session.current_answer(), None);
    }

    #[test]
    fn advance_moves_then_finishes_on_last() {
        let bank = two_question_bank();
        let mut session = started(&bank);
        assert_eq!(session.advance(), Advance::Moved);
        assert!(session.is_last());
        assert_eq!(session.advance(), Advance::Finished);
        assert_eq!(session.mode(), SessionMode::Finished);
        assert_eq!(session.advance(), Advance::Ignored);
        assert!(session.report().is_some());
    }

    #[test]
    fn retreat_is_bounded_at_zero() {
        let bank = two_question_bank();
        let mut session = started(&bank);
        assert!(!session.retreat());
        session.advance();
        assert!(session.retreat());
        assert_eq!(session.position(), 0);
    }

    #[test]
    fn finish_scores_at_any_position() {
        let bank = two_question_bank();
        let mut session = started(&bank);
        let correct = correct_at(&session);
        session.record_answer(Some(correct));
        assert!(session.finish());

        let report = session.report().unwrap();
        assert_eq!(report.score.correct, 1);
        assert_eq!(report.score.total, 2);
        assert_eq!(report.score.percent, 50);
        assert_eq!(report.verdict(), Verdict::Pass);
    }

    #[test]
    fn review_is_read_only() {
        let bank = two_question_bank();
        let mut session = started(&bank);
        session.record_answer(Some(1));
        session.finish();
        let answers_at_finish = session.answers().to_vec();

        assert!(session.enter_review());
        assert_eq!(session.mode(), SessionMode::Reviewing);
        assert_eq!(session.position(), 0);

        assert!(!session.record_answer(Some(0)));
        assert!(!session.clear_current());
        assert_eq!(session.advance(), Advance::Ignored);
        assert!(!session.finish());
        assert_eq!(session.answers(), &answers_at_finish[..]);

        assert!(session.review_next());
        assert!(!session.review_next());
        assert!(session.retreat());

        assert!(session.leave_review());
        assert_eq!(session.mode(), SessionMode::Finished);
        assert_eq!(session.answers(), &answers_at_finish[..]);
        assert!(!session.leave_review());
    }

    #[test]
    fn review_requires_finished() {
        let bank = two_question_bank();
        let mut session = started(&bank);
        assert!(!session.enter_review());
    }

    #[test]
    fn topics_are_frozen_outside_idle() {
        let bank = two_question_bank();
        let mut session = started(&bank);
        assert!(!session.toggle_topic(TopicId::new("java")));
        assert!(!session.start(&bank, &mut rng()));
    }

    #[test]
    fn reset_returns_to_idle() {
        let bank = two_question_bank();
        let mut session = started(&bank);
        session.finish();
        session.reset();
        assert_eq!(session, QuizSession::new());
    }

    #[test]
    fn from_parts_clamps_and_sanitizes() {
        let bank = two_question_bank();
        let sequence: Vec<SessionQuestion> = bank
            .questions(&TopicId::new("cpp"))
            .iter()
            .map(|q| SessionQuestion {
                question: q.clone(),
                topic: TopicId::new("cpp"),
            })
            .collect();
        let session =
            QuizSession::from_parts(TopicSelection::new(), sequence, vec![Some(9)], 5).unwrap();
        assert_eq!(session.position(), 1);
        assert_eq!(session.answers(), &[None::<usize>, None]);
        assert_eq!(session.mode(), SessionMode::Active);
    }

    #[test]
    fn progress_includes_current_question() {
        let bank = two_question_bank();
        let mut session = started(&bank);
        assert_eq!(session.progress_percent(), 50);
        session.advance();
        assert_eq!(session.progress_percent(), 100);
    }
}
