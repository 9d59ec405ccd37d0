mod question_vm;
mod quiz_vm;
mod results_vm;
mod time_fmt;
mod topic_vm;

pub use question_vm::{OptionVm, QuestionCardVm};
pub use quiz_vm::{QuizVm, ResumeUpload, Screen};
pub use results_vm::{DetailOptionVm, DetailVm, ResultsVm};
pub use time_fmt::{question_timer_label, results_time_label, session_timer_label};
pub use topic_vm::{TopicChipVm, map_topic_chips, selection_placeholder};
