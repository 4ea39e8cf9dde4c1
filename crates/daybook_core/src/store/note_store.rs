//! Note store with links and spaced-repetition review.
//!
//! # Invariants
//! - Deleting a note removes every link pointing at it from other notes.
//! - A bidirectional link exists on both ends; `unlink` removes both ends.
//! - Links only target notes present in the store.

use super::{apply_patch, find, modify, PersistedState};
use crate::model::note::{normalize_tags, Note, NoteDraft, NoteId, NotePatch};
use crate::model::review::ReviewSchedule;
use crate::model::{Patch, Timestamp};
use crate::storage::{SharedStorage, NOTES_KEY};
use chrono::{NaiveDate, Utc};
use log::debug;

/// Filter options for note listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
    pub tag: Option<String>,
    pub text: Option<String>,
    pub include_archived: bool,
}

pub struct NoteStore {
    state: PersistedState<Vec<Note>>,
}

impl NoteStore {
    pub fn load(storage: SharedStorage) -> Self {
        Self {
            state: PersistedState::load(storage, NOTES_KEY),
        }
    }

    pub fn notes(&self) -> &[Note] {
        self.state.get()
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        find(self.state.get(), id)
    }

    pub fn len(&self) -> usize {
        self.state.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.get().is_empty()
    }

    pub fn add(&mut self, draft: NoteDraft) -> NoteId {
        let note = Note::from_draft(draft, Utc::now());
        let id = note.id;
        self.state.commit("note_add", |notes| {
            notes.push(note);
            Some(())
        });
        id
    }

    pub fn update(&mut self, id: NoteId, patch: NotePatch) -> bool {
        if patch.is_empty() {
            return self.get(id).is_some();
        }
        let now = Utc::now();
        self.state
            .commit("note_update", |notes| apply_patch(notes, id, patch, now))
            .is_some()
    }

    /// Deletes a note and cascades link removal to every other note.
    pub fn delete(&mut self, id: NoteId) -> bool {
        let now = Utc::now();
        self.state
            .commit("note_delete", |notes| {
                let index = notes.iter().position(|note| note.id == id)?;
                notes.remove(index);
                let mut cascaded = 0usize;
                for note in notes.iter_mut() {
                    if note.remove_link(id) {
                        note.updated_at = now;
                        cascaded += 1;
                    }
                }
                debug!("event=note_delete module=store status=ok cascaded_links={cascaded}");
                Some(())
            })
            .is_some()
    }

    pub fn toggle_pin(&mut self, id: NoteId) -> Option<bool> {
        let now = Utc::now();
        self.state.commit("note_toggle_pin", |notes| {
            modify(notes, id, now, |note| {
                note.pinned = !note.pinned;
                Some(note.pinned)
            })
        })
    }

    pub fn toggle_archive(&mut self, id: NoteId) -> Option<bool> {
        let now = Utc::now();
        self.state.commit("note_toggle_archive", |notes| {
            modify(notes, id, now, |note| {
                note.archived = !note.archived;
                Some(note.archived)
            })
        })
    }

    /// Replaces the full tag set of one note.
    pub fn set_tags(&mut self, id: NoteId, tags: &[String]) -> bool {
        let normalized = normalize_tags(tags);
        let now = Utc::now();
        self.state
            .commit("note_set_tags", |notes| {
                modify(notes, id, now, |note| {
                    note.tags = normalized;
                    Some(())
                })
            })
            .is_some()
    }

    /// Links `from` to `to`; a bidirectional link is mirrored on `to`.
    ///
    /// Self links and links involving unknown notes are ignored.
    pub fn link(&mut self, from: NoteId, to: NoteId, bidirectional: bool) -> bool {
        if from == to || self.get(from).is_none() || self.get(to).is_none() {
            return false;
        }
        let now = Utc::now();
        self.state
            .commit("note_link", |notes| {
                let mut changed = false;
                for note in notes.iter_mut() {
                    let updated = if note.id == from {
                        note.upsert_link(to, bidirectional)
                    } else if note.id == to && bidirectional {
                        note.upsert_link(from, true)
                    } else {
                        false
                    };
                    if updated {
                        note.updated_at = now;
                        changed = true;
                    }
                }
                changed.then_some(())
            })
            .is_some()
    }

    /// Removes links between two notes in both directions.
    pub fn unlink(&mut self, a: NoteId, b: NoteId) -> bool {
        let now = Utc::now();
        self.state
            .commit("note_unlink", |notes| {
                let mut changed = false;
                for note in notes.iter_mut() {
                    let updated = if note.id == a {
                        note.remove_link(b)
                    } else if note.id == b {
                        note.remove_link(a)
                    } else {
                        false
                    };
                    if updated {
                        note.updated_at = now;
                        changed = true;
                    }
                }
                changed.then_some(())
            })
            .is_some()
    }

    /// Notes whose outgoing links target `id`.
    pub fn backlinks(&self, id: NoteId) -> Vec<&Note> {
        self.state
            .get()
            .iter()
            .filter(|note| note.links_to(id))
            .collect()
    }

    /// Notes `id` links to, in link order.
    pub fn linked(&self, id: NoteId) -> Vec<&Note> {
        let Some(note) = self.get(id) else {
            return Vec::new();
        };
        note.links
            .iter()
            .filter_map(|link| self.get(link.target))
            .collect()
    }

    /// Lists notes: pinned first, then most recently updated.
    pub fn query(&self, query: &NoteQuery) -> Vec<&Note> {
        let tag = query.tag.as_deref().and_then(crate::model::note::normalize_tag);
        let text = query
            .text
            .as_deref()
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty());

        let mut items: Vec<&Note> = self
            .state
            .get()
            .iter()
            .filter(|note| query.include_archived || !note.archived)
            .filter(|note| tag.as_ref().map_or(true, |t| note.tags.contains(t)))
            .filter(|note| text.as_deref().map_or(true, |needle| note.matches_text(needle)))
            .collect();

        items.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        items
    }

    /// Distinct tags over all notes, sorted.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .state
            .get()
            .iter()
            .flat_map(|note| note.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// Starts a review schedule for a note, due on `today`.
    ///
    /// An existing schedule is left untouched.
    pub fn enable_review(&mut self, id: NoteId, today: NaiveDate) -> bool {
        let now = Utc::now();
        self.state
            .commit("note_enable_review", |notes| {
                modify(notes, id, now, |note| {
                    if note.review.is_some() {
                        return None;
                    }
                    note.review = Some(ReviewSchedule::new(today));
                    Some(())
                })
            })
            .is_some()
    }

    pub fn disable_review(&mut self, id: NoteId) -> bool {
        let now = Utc::now();
        self.state
            .commit("note_disable_review", |notes| {
                modify(notes, id, now, |note| note.review.take().map(|_| ()))
            })
            .is_some()
    }

    /// Records one review with quality `1..=5` and returns the new interval.
    ///
    /// Notes without a schedule get one on first review.
    pub fn review(&mut self, id: NoteId, quality: u8, now: Timestamp) -> Option<u32> {
        self.state.commit("note_review", |notes| {
            modify(notes, id, now, |note| {
                let schedule = note
                    .review
                    .get_or_insert_with(|| ReviewSchedule::new(now.date_naive()));
                Some(schedule.apply_review(quality, now))
            })
        })
    }

    /// Notes with a schedule due on or before `today`, earliest first.
    pub fn due_for_review(&self, today: NaiveDate) -> Vec<&Note> {
        let mut items: Vec<&Note> = self
            .state
            .get()
            .iter()
            .filter(|note| !note.archived)
            .filter(|note| note.review.as_ref().is_some_and(|r| r.is_due(today)))
            .collect();
        items.sort_by_key(|note| note.review.as_ref().map(|r| r.next_review));
        items
    }
}
