mod ids;
mod question;
mod topic;

pub use ids::TopicId;
pub use question::{Question, QuestionError, SessionQuestion};
pub use topic::{TOPICS, Topic, TopicSelection, find_topic, topic_label};
