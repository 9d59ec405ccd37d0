use quiz_core::model::topic_label;
use quiz_core::session::SessionMode;
use services::QuizRun;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub text: String,
    pub checked: bool,
    pub input_id: String,
}

/// The question card for an active or reviewed session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionCardVm {
    pub topic_label: String,
    pub counter: String,
    pub text: String,
    pub options: Vec<OptionVm>,
    /// Review mode: answers cannot change.
    pub read_only: bool,
    pub back_disabled: bool,
    pub clear_disabled: bool,
    pub next_label: &'static str,
    pub progress_percent: u32,
}

impl QuestionCardVm {
    /// `None` unless the run is active or in review.
    #[must_use]
    pub fn from_run(run: &QuizRun) -> Option<Self> {
        let read_only = match run.mode() {
            SessionMode::Active => false,
            SessionMode::Reviewing => true,
            SessionMode::Idle | SessionMode::Finished => return None,
        };
        let session = &run.session;
        let entry = session.current()?;
        let position = session.position();
        let chosen = session.current_answer();

        let options = entry
            .question
            .options()
            .iter()
            .enumerate()
            .map(|(index, text)| OptionVm {
                index,
                text: text.clone(),
                checked: chosen == Some(index),
                input_id: format!("choice-{position}-{index}"),
            })
            .collect();

        Some(Self {
            topic_label: topic_label(&entry.topic).to_string(),
            counter: format!("Question {} / {}", position + 1, session.len()),
            text: entry.question.text().to_string(),
            options,
            read_only,
            back_disabled: position == 0,
            clear_disabled: read_only,
            next_label: if session.is_last() { "Finish" } else { "Next" },
            progress_percent: session.progress_percent(),
        })
    }
}
