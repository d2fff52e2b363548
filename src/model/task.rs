use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dated task as supplied by the host. The timeline only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInterval {
    pub id: String,
    pub name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TaskInterval {
    /// Create a task with a fresh random id.
    pub fn new(name: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            start,
            end,
        }
    }

    /// `end < start` intervals are treated as zero-length at `start`.
    pub fn effective_end(&self) -> NaiveDateTime {
        self.end.max(self.start)
    }

    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }
}
