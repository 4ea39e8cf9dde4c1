//! Journal entries, one or more per calendar day.

use super::{new_id, Entity, EntityId, Patch, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MIN_MOOD: u8 = 1;
pub const MAX_MOOD: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: EntityId,
    pub date: NaiveDate,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub mood: Option<u8>,
    #[serde(default)]
    pub gratitude: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl JournalEntry {
    pub fn from_draft(draft: JournalDraft, now: Timestamp) -> Self {
        Self {
            id: new_id(),
            date: draft.date,
            content: draft.content,
            mood: draft.mood.map(clamp_mood),
            gratitude: clean_list(draft.gratitude),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for JournalEntry {
    fn id(&self) -> EntityId {
        self.id
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalDraft {
    pub date: NaiveDate,
    pub content: String,
    pub mood: Option<u8>,
    pub gratitude: Vec<String>,
}

impl JournalDraft {
    pub fn new(date: NaiveDate, content: impl Into<String>) -> Self {
        Self {
            date,
            content: content.into(),
            mood: None,
            gratitude: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalPatch {
    pub content: Option<String>,
    pub mood: Option<Option<u8>>,
    pub gratitude: Option<Vec<String>>,
}

impl Patch<JournalEntry> for JournalPatch {
    fn apply_to(self, entry: &mut JournalEntry, _now: Timestamp) {
        if let Some(content) = self.content {
            entry.content = content;
        }
        if let Some(mood) = self.mood {
            entry.mood = mood.map(clamp_mood);
        }
        if let Some(gratitude) = self.gratitude {
            entry.gratitude = clean_list(gratitude);
        }
    }

    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn clamp_mood(mood: u8) -> u8 {
    mood.clamp(MIN_MOOD, MAX_MOOD)
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
