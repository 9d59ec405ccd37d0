use quiz_core::model::topic_label;
use quiz_core::scoring::{OptionMark, QuestionDetail, Verdict};
use quiz_core::session::SessionMode;
use services::QuizRun;

use super::time_fmt::results_time_label;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailOptionVm {
    pub text: String,
    /// `"correct"`, `"wrong"` or empty.
    pub class: &'static str,
    pub note: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailVm {
    pub heading: String,
    pub options: Vec<DetailOptionVm>,
}

impl DetailVm {
    fn from_detail(detail: &QuestionDetail) -> Self {
        let options = detail
            .options
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let mark = detail.mark(index);
                DetailOptionVm {
                    text: text.clone(),
                    class: match mark {
                        OptionMark::Correct => "correct",
                        OptionMark::WrongChoice => "wrong",
                        OptionMark::Plain => "",
                    },
                    note: mark.note(),
                }
            })
            .collect();
        Self {
            heading: format!(
                "Q{} ({}): {}",
                detail.number,
                topic_label(&detail.topic),
                detail.text
            ),
            options,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub score_label: String,
    pub percent_label: String,
    pub time_label: String,
    pub passed: bool,
    pub banner: &'static str,
    pub details: Vec<DetailVm>,
}

impl ResultsVm {
    /// `None` until the run has been scored and is showing results.
    #[must_use]
    pub fn from_run(run: &QuizRun) -> Option<Self> {
        if run.mode() != SessionMode::Finished {
            return None;
        }
        let report = run.session.report()?;
        let passed = report.verdict() == Verdict::Pass;
        Some(Self {
            score_label: format!("Score: {} / {}", report.score.correct, report.score.total),
            percent_label: format!("{}%", report.score.percent),
            time_label: results_time_label(&run.session_clock),
            passed,
            banner: if passed {
                "Congratulations — you passed!"
            } else {
                "Not passed — try again later."
            },
            details: report.details.iter().map(DetailVm::from_detail).collect(),
        })
    }
}
