use serde::{Deserialize, Serialize};

use crate::model::ids::TopicId;

//
// ─── REGISTRY ──────────────────────────────────────────────────────────────────
//

/// A selectable quiz topic: registry id plus display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topic {
    pub id: &'static str,
    pub label: &'static str,
}

impl Topic {
    #[must_use]
    pub fn topic_id(&self) -> TopicId {
        TopicId::new(self.id)
    }
}

/// Topics offered in the selection control, in display order.
pub static TOPICS: [Topic; 4] = [
    Topic {
        id: "cpp",
        label: "C++",
    },
    Topic {
        id: "java",
        label: "Java",
    },
    Topic {
        id: "python",
        label: "Python",
    },
    Topic {
        id: "javascript",
        label: "JavaScript",
    },
];

/// Looks up a registry entry by id.
#[must_use]
pub fn find_topic(id: &TopicId) -> Option<&'static Topic> {
    TOPICS.iter().find(|topic| topic.id == id.as_str())
}

/// Display label for a topic, falling back to the raw id for unknown topics.
#[must_use]
pub fn topic_label(id: &TopicId) -> &str {
    find_topic(id).map_or(id.as_str(), |topic| topic.label)
}

//
// ─── SELECTION ─────────────────────────────────────────────────────────────────
//

/// Ordered, de-duplicated set of selected topics.
///
/// Insertion order is kept so chips and the session build follow the order in
/// which the user picked topics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicSelection(Vec<TopicId>);

impl TopicSelection {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds or removes a topic. Returns true if the selection changed.
    pub fn set(&mut self, id: TopicId, selected: bool) -> bool {
        let present = self.contains(&id);
        match (selected, present) {
            (true, false) => {
                self.0.push(id);
                true
            }
            (false, true) => {
                self.0.retain(|existing| existing != &id);
                true
            }
            _ => false,
        }
    }

    /// Flips membership of a topic.
    pub fn toggle(&mut self, id: TopicId) {
        let selected = !self.contains(&id);
        self.set(id, selected);
    }

    #[must_use]
    pub fn contains(&self, id: &TopicId) -> bool {
        self.0.iter().any(|existing| existing == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TopicId> {
        self.0.iter()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<TopicId> {
        self.0.clone()
    }
}

impl FromIterator<TopicId> for TopicSelection {
    fn from_iter<I: IntoIterator<Item = TopicId>>(iter: I) -> Self {
        let mut selection = Self::new();
        for id in iter {
            selection.set(id, true);
        }
        selection
    }
}
