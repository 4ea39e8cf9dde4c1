//! Assistant conversation messages and classification labels.

use super::{new_id, Entity, EntityId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

/// Coarse action label assigned to one chat input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Create,
    List,
    Complete,
    Delete,
    Start,
    GeneralQuery,
    Greeting,
    Unknown,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::List => "list",
            Self::Complete => "complete",
            Self::Delete => "delete",
            Self::Start => "start",
            Self::GeneralQuery => "general_query",
            Self::Greeting => "greeting",
            Self::Unknown => "unknown",
        }
    }
}

/// Coarse domain label assigned to one chat input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Task,
    Note,
    Focus,
    Habit,
    Goal,
    Coding,
    General,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Note => "note",
            Self::Focus => "focus",
            Self::Habit => "habit",
            Self::Goal => "goal",
            Self::Coding => "coding",
            Self::General => "general",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: EntityId,
    pub text: String,
    pub sender: Sender,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub intent: Option<Intent>,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            sender,
            timestamp: now,
            category: None,
            intent: None,
        }
    }

    pub fn with_labels(mut self, category: Category, intent: Intent) -> Self {
        self.category = Some(category);
        self.intent = Some(intent);
        self
    }
}

impl Entity for Message {
    fn id(&self) -> EntityId {
        self.id
    }

    // Messages are append-only.
    fn touch(&mut self, _now: Timestamp) {}
}
