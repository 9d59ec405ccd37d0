use quiz_core::model::{Topic, TopicId, TopicSelection};

/// One entry in the language picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicChipVm {
    pub id: TopicId,
    pub label: &'static str,
    pub selected: bool,
    /// False when the loaded bank has no questions for this topic.
    pub available: bool,
}

#[must_use]
pub fn map_topic_chips(
    topics: &[(&'static Topic, bool)],
    selection: &TopicSelection,
) -> Vec<TopicChipVm> {
    topics
        .iter()
        .map(|(topic, available)| {
            let id = topic.topic_id();
            TopicChipVm {
                selected: selection.contains(&id),
                id,
                label: topic.label,
                available: *available,
            }
        })
        .collect()
}

#[must_use]
pub fn selection_placeholder(selection: &TopicSelection) -> String {
    if selection.is_empty() {
        "Choose language(s)".to_string()
    } else {
        format!("{} selected", selection.len())
    }
}
