use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::model::{Question, TopicId};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("question source is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("question source root must be an object")]
    InvalidRoot,

    #[error("question source contains no valid questions")]
    NoValidQuestions,
}

/// Questions grouped by topic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    topics: BTreeMap<TopicId, Vec<Question>>,
}

impl QuestionBank {
    /// Builds a bank from already-validated questions. Empty topics are skipped.
    pub fn from_topics(entries: impl IntoIterator<Item = (TopicId, Vec<Question>)>) -> Self {
        let topics = entries
            .into_iter()
            .filter(|(_, questions)| !questions.is_empty())
            .collect();
        Self { topics }
    }

    /// Parses the external question source format.
    ///
    /// The root must be an object mapping topic ids to arrays of
    /// `{ q, options, answer }`. Non-array topics and invalid entries are
    /// dropped silently; a topic with nothing left is dropped too.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Json` for malformed JSON, `BankError::InvalidRoot` if
    /// the root is not an object, and `BankError::NoValidQuestions` if nothing
    /// survives validation.
    pub fn from_json_str(raw: &str) -> Result<Self, BankError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_json_value(&value)
    }

    /// See [`QuestionBank::from_json_str`].
    ///
    /// # Errors
    ///
    /// Same as [`QuestionBank::from_json_str`], minus JSON syntax errors.
    pub fn from_json_value(value: &Value) -> Result<Self, BankError> {
        let Value::Object(root) = value else {
            return Err(BankError::InvalidRoot);
        };

        let mut topics = BTreeMap::new();
        for (topic, entries) in root {
            let Value::Array(entries) = entries else {
                continue;
            };
            let questions: Vec<Question> = entries.iter().filter_map(parse_entry).collect();
            if !questions.is_empty() {
                topics.insert(TopicId::new(topic.as_str()), questions);
            }
        }

        if topics.is_empty() {
            return Err(BankError::NoValidQuestions);
        }
        Ok(Self { topics })
    }

    /// The fixed bank used when the external source is unavailable.
    #[must_use]
    pub fn builtin() -> Self {
        fn q(text: &str, options: [&str; 4], answer: usize) -> Option<Question> {
            Question::new(text, options.iter().map(|o| (*o).to_string()).collect(), answer).ok()
        }

        let cpp = [
            q(
                "Which header file is required for cout and cin?",
                ["<stdio.h>", "<iostream>", "<conio.h>", "<string.h>"],
                1,
            ),
            q(
                "Which of the following is a valid C++ comment?",
                ["/ comment", "<!-- comment--->", "/* comment */", "# comment"],
                2,
            ),
        ];
        let java = [
            q(
                "What will be the result of the expression 10 % 3?",
                ["3", "0", "1", "9"],
                2,
            ),
            q(
                "Who developed the Java programming language?",
                [
                    "Dennis Ritchie",
                    "James Gosling",
                    "Bjarne Stroustrup",
                    "Guido van Rossum",
                ],
                1,
            ),
        ];
        let python = [
            q(
                "Who developed the Python programming language?",
                [
                    "Dennis Ritchie",
                    "James Gosling",
                    "Bjarne Stroustrup",
                    "Guido van Rossum",
                ],
                3,
            ),
            q(
                "What is the correct file extension for Python files?",
                [".c", ".py", ".cpp", ".js"],
                1,
            ),
        ];
        let javascript = [
            q(
                "What is the correct file extension for JavaScript files?",
                [".c", ".py", ".cpp", ".js"],
                3,
            ),
            q(
                "Which company developed JavaScript?",
                ["Netscape", "Microsoft", "Oracle", "Sun Microsystems"],
                0,
            ),
        ];

        Self::from_topics([
            (TopicId::new("cpp"), cpp.into_iter().flatten().collect()),
            (TopicId::new("java"), java.into_iter().flatten().collect()),
            (TopicId::new("python"), python.into_iter().flatten().collect()),
            (
                TopicId::new("javascript"),
                javascript.into_iter().flatten().collect(),
            ),
        ])
    }

    /// Questions for a topic; empty if the topic is unknown.
    #[must_use]
    pub fn questions(&self, topic: &TopicId) -> &[Question] {
        self.topics.get(topic).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn topics(&self) -> impl Iterator<Item = &TopicId> {
        self.topics.keys()
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.topics.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

fn parse_entry(entry: &Value) -> Option<Question> {
    let Value::Object(fields) = entry else {
        return None;
    };
    let text = fields.get("q")?.as_str()?;
    let Value::Array(raw_options) = fields.get("options")? else {
        return None;
    };
    let answer = answer_index(fields.get("answer")?)?;

    let options = raw_options.iter().map(stringify_option).collect();
    Question::new(text, options, answer).ok()
}

fn answer_index(value: &Value) -> Option<usize> {
    let index = match value.as_u64() {
        Some(index) => index,
        None => {
            let float = value.as_f64()?;
            if float < 0.0 || float.fract() != 0.0 {
                return None;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let index = float as u64;
            index
        }
    };
    usize::try_from(index).ok()
}

fn stringify_option(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
