//! Note domain model.
//!
//! # Responsibility
//! - Define markdown notes with tags, pin/archive flags and links.
//! - Own tag normalization rules.
//!
//! # Invariants
//! - Tags are trimmed, lowercase, deduplicated and sorted.
//! - A note never links to itself and holds at most one link per target.

use super::review::ReviewSchedule;
use super::{new_id, normalize_optional, normalize_title, Entity, EntityId, Patch, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type NoteId = EntityId;

/// Outgoing link to another note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteLink {
    pub target: NoteId,
    /// When `true`, the target holds the mirrored link back to this note.
    pub bidirectional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub links: Vec<NoteLink>,
    #[serde(default)]
    pub review: Option<ReviewSchedule>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Note {
    pub fn from_draft(draft: NoteDraft, now: Timestamp) -> Self {
        Self {
            id: new_id(),
            title: normalize_title(&draft.title, "Untitled note"),
            content: draft.content,
            tags: normalize_tags(&draft.tags),
            color: normalize_optional(draft.color),
            pinned: draft.pinned,
            archived: false,
            links: Vec::new(),
            review: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn links_to(&self, target: NoteId) -> bool {
        self.links.iter().any(|link| link.target == target)
    }

    /// Adds or upgrades a link. Returns whether anything changed.
    pub(crate) fn upsert_link(&mut self, target: NoteId, bidirectional: bool) -> bool {
        if target == self.id {
            return false;
        }
        match self.links.iter_mut().find(|link| link.target == target) {
            Some(link) if bidirectional && !link.bidirectional => {
                link.bidirectional = true;
                true
            }
            Some(_) => false,
            None => {
                self.links.push(NoteLink {
                    target,
                    bidirectional,
                });
                true
            }
        }
    }

    /// Removes the link to `target`. Returns whether one existed.
    pub(crate) fn remove_link(&mut self, target: NoteId) -> bool {
        let before = self.links.len();
        self.links.retain(|link| link.target != target);
        before != self.links.len()
    }

    /// Case-insensitive match over title, content and tags.
    pub fn matches_text(&self, needle_lowercase: &str) -> bool {
        self.title.to_lowercase().contains(needle_lowercase)
            || self.content.to_lowercase().contains(needle_lowercase)
            || self.tags.iter().any(|tag| tag.contains(needle_lowercase))
    }
}

impl Entity for Note {
    fn id(&self) -> EntityId {
        self.id
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub color: Option<String>,
    pub pinned: bool,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|tag| (*tag).to_string()).collect();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub color: Option<Option<String>>,
}

impl Patch<Note> for NotePatch {
    fn apply_to(self, note: &mut Note, _now: Timestamp) {
        if let Some(title) = self.title {
            note.title = normalize_title(&title, &note.title);
        }
        if let Some(content) = self.content {
            note.content = content;
        }
        if let Some(tags) = self.tags {
            note.tags = normalize_tags(&tags);
        }
        if let Some(color) = self.color {
            note.color = normalize_optional(color);
        }
    }

    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Normalizes one tag value. Blank input yields `None`.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim().trim_start_matches('#').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes, deduplicates and sorts tag values.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for tag in tags {
        if let Some(value) = normalize_tag(tag) {
            unique.insert(value);
        }
    }
    unique.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::{normalize_tags, Note, NoteDraft};
    use chrono::Utc;

    #[test]
    fn tags_are_lowercased_deduplicated_and_sorted() {
        let tags = vec![
            "Work".to_string(),
            "#ideas".to_string(),
            "work".to_string(),
            "  ".to_string(),
        ];
        assert_eq!(normalize_tags(&tags), vec!["ideas", "work"]);
    }

    #[test]
    fn upsert_link_rejects_self_and_upgrades_direction() {
        let mut note = Note::from_draft(NoteDraft::new("a", ""), Utc::now());
        let other = Note::from_draft(NoteDraft::new("b", ""), Utc::now());

        assert!(!note.upsert_link(note.id, false));
        assert!(note.upsert_link(other.id, false));
        assert!(!note.upsert_link(other.id, false));
        assert!(note.upsert_link(other.id, true));
        assert_eq!(note.links.len(), 1);
        assert!(note.links[0].bidirectional);
    }
}
