//! Persisted snapshot of an in-progress session.
//!
//! The JSON shape is fixed (`selected`, `started`, `current`, `answers`,
//! `questionMeta`, `timestamp`) so snapshots written by earlier builds keep
//! restoring.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::{Question, QuestionError, SessionQuestion, TopicId, TopicSelection};
use crate::session::QuizSession;
use crate::time::Clock;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CheckpointError {
    #[error("checkpoint is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("checkpoint question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// One question as stored in a checkpoint, options already in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionMeta {
    pub q: String,
    pub options: Vec<String>,
    pub answer: usize,
    pub lang: TopicId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    #[serde(default)]
    pub selected: Vec<TopicId>,
    #[serde(default)]
    pub started: bool,
    #[serde(default, deserialize_with = "lenient_position")]
    pub current: usize,
    #[serde(default, deserialize_with = "lenient_answers")]
    pub answers: Vec<Option<usize>>,
    #[serde(rename = "questionMeta", default)]
    pub question_meta: Vec<QuestionMeta>,
    #[serde(default)]
    pub timestamp: i64,
}

/// What a checkpoint turns back into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restored {
    /// An active session at the saved position.
    Session(QuizSession),
    /// Only the topic choice survived; the session itself was not started.
    Selection(TopicSelection),
}

impl Checkpoint {
    /// Snapshots the session. Timer values are not part of the snapshot.
    #[must_use]
    pub fn capture(session: &QuizSession, clock: &Clock) -> Self {
        let question_meta: Vec<QuestionMeta> = session
            .sequence()
            .iter()
            .map(|entry| QuestionMeta {
                q: entry.question.text().to_string(),
                options: entry.question.options().to_vec(),
                answer: entry.question.correct_index(),
                lang: entry.topic.clone(),
            })
            .collect();
        Self {
            selected: session.selected().to_vec(),
            started: !question_meta.is_empty(),
            current: session.position(),
            answers: session.answers().to_vec(),
            question_meta,
            timestamp: clock.now_millis(),
        }
    }

    /// Parses a stored snapshot.
    ///
    /// Missing fields take their defaults. A `current` that is not a
    /// non-negative integer reads as 0; an `answers` that is not an array
    /// reads as empty, and entries that are not non-negative integers read
    /// as unanswered.
    ///
    /// # Errors
    ///
    /// Returns `CheckpointError::Json` if `raw` is not a JSON object of the
    /// expected shape.
    pub fn from_json(raw: &str) -> Result<Self, CheckpointError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// # Errors
    ///
    /// Returns `CheckpointError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        Ok(serde_json::to_string(self)?)
    }

    /// True if the snapshot holds a started session rather than just a topic choice.
    #[must_use]
    pub fn has_session(&self) -> bool {
        !self.question_meta.is_empty()
    }

    /// Rebuilds what the snapshot describes.
    ///
    /// With question data this is an active session; `current` is clamped
    /// into range and the answers are fitted to the sequence length. Without
    /// question data only the topic selection comes back.
    ///
    /// # Errors
    ///
    /// Returns `CheckpointError::InvalidQuestion` if any stored question breaks
    /// the question invariants.
    pub fn restore(self) -> Result<Restored, CheckpointError> {
        let selected: TopicSelection = self.selected.into_iter().collect();

        let sequence = self
            .question_meta
            .into_iter()
            .enumerate()
            .map(|(index, meta)| {
                Question::new(meta.q, meta.options, meta.answer)
                    .map(|question| SessionQuestion {
                        question,
                        topic: meta.lang,
                    })
                    .map_err(|source| CheckpointError::InvalidQuestion { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match QuizSession::from_parts(selected.clone(), sequence, self.answers, self.current) {
            Some(session) => Ok(Restored::Session(session)),
            None => Ok(Restored::Selection(selected)),
        }
    }
}

fn lenient_position<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(as_index(&raw).unwrap_or(0))
}

fn lenient_answers<'de, D>(deserializer: D) -> Result<Vec<Option<usize>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Array(values) => values.iter().map(as_index).collect(),
        _ => Vec::new(),
    })
}

fn as_index(value: &Value) -> Option<usize> {
    value.as_u64().and_then(|n| usize::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::QuestionBank;
    use crate::time::{FIXED_TEST_TIMESTAMP, fixed_clock};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn active_session() -> QuizSession {
        let mut session = QuizSession::new();
        session.select_topic(TopicId::new("cpp"), true);
        session.select_topic(TopicId::new("java"), true);
        assert!(session.start(&QuestionBank::builtin(), &mut StdRng::seed_from_u64(3)));
        session
    }

    #[test]
    fn capture_uses_wire_field_names() {
        let mut session = active_session();
        session.record_answer(Some(1));
        session.advance();

        let json = Checkpoint::capture(&session, &fixed_clock()).to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["selected"], serde_json::json!(["cpp", "java"]));
        assert_eq!(value["started"], Value::Bool(true));
        assert_eq!(value["current"], 1);
        assert_eq!(value["answers"], serde_json::json!([1, null, null, null]));
        assert_eq!(value["questionMeta"].as_array().unwrap().len(), 4);
        assert!(value["questionMeta"][0]["lang"].is_string());
        assert_eq!(value["timestamp"], FIXED_TEST_TIMESTAMP * 1000);
    }

    #[test]
    fn capture_then_restore_gives_back_the_session() {
        let mut session = active_session();
        session.record_answer(Some(2));
        session.advance();
        session.advance();

        let raw = Checkpoint::capture(&session, &fixed_clock()).to_json().unwrap();
        let restored = Checkpoint::from_json(&raw).unwrap().restore().unwrap();

        assert_eq!(restored, Restored::Session(session));
    }

    #[test]
    fn restore_clamps_current_and_fits_answers() {
        let raw = r#"{
            "selected": ["cpp"],
            "current": 9,
            "answers": [1, "x", 7],
            "questionMeta": [
                { "q": "A", "options": ["a", "b"], "answer": 0, "lang": "cpp" },
                { "q": "B", "options": ["a", "b"], "answer": 1, "lang": "cpp" },
                { "q": "C", "options": ["a", "b"], "answer": 1, "lang": "cpp" },
                { "q": "D", "options": ["a", "b"], "answer": 0, "lang": "cpp" }
            ]
        }"#;
        let Restored::Session(session) = Checkpoint::from_json(raw).unwrap().restore().unwrap()
        else {
            panic!("expected a session");
        };
        assert_eq!(session.position(), 3);
        assert_eq!(session.answers(), &[Some(1), None, None, None]);
    }

    fn two_question_checkpoint(current: &str, answers: &str) -> String {
        format!(
            r#"{{
                "selected": ["java"],
                "started": true,
                "current": {current},
                "answers": {answers},
                "questionMeta": [
                    {{ "q": "A", "options": ["a", "b"], "answer": 0, "lang": "java" }},
                    {{ "q": "B", "options": ["a", "b"], "answer": 1, "lang": "java" }}
                ]
            }}"#
        )
    }

    #[test]
    fn non_array_answers_restore_as_unanswered() {
        let raw = two_question_checkpoint("1", "5");
        let Restored::Session(session) = Checkpoint::from_json(&raw).unwrap().restore().unwrap()
        else {
            panic!("expected a session");
        };
        assert_eq!(session.position(), 1);
        assert_eq!(session.answers(), &[None, None]);
    }

    #[test]
    fn non_numeric_current_restores_at_the_first_question() {
        for current in [r#""1""#, "-2", "1.5", "null", "{}"] {
            let raw = two_question_checkpoint(current, "[1, 0]");
            let Restored::Session(session) =
                Checkpoint::from_json(&raw).unwrap().restore().unwrap()
            else {
                panic!("expected a session for current = {current}");
            };
            assert_eq!(session.position(), 0, "current = {current}");
            assert_eq!(session.answers(), &[Some(1), Some(0)]);
        }
    }

    #[test]
    fn selection_only_checkpoint_restores_topics() {
        let raw = r#"{ "selected": ["python", "java"], "questionMeta": [] }"#;
        let restored = Checkpoint::from_json(raw).unwrap().restore().unwrap();
        let Restored::Selection(selection) = restored else {
            panic!("expected a selection");
        };
        assert_eq!(selection.to_vec(), vec![TopicId::new("python"), TopicId::new("java")]);
    }

    #[test]
    fn invalid_question_is_rejected() {
        let raw = r#"{
            "questionMeta": [ { "q": "A", "options": ["a"], "answer": 0, "lang": "cpp" } ]
        }"#;
        let err = Checkpoint::from_json(raw).unwrap().restore().unwrap_err();
        assert!(matches!(err, CheckpointError::InvalidQuestion { index: 0, .. }));
    }

    #[test]
    fn garbage_is_a_json_error() {
        assert!(matches!(
            Checkpoint::from_json("not json").unwrap_err(),
            CheckpointError::Json(_)
        ));
    }
}
