//! Journal store.

use super::{apply_patch, find, remove, PersistedState};
use crate::model::journal::{JournalDraft, JournalEntry, JournalPatch};
use crate::model::{EntityId, Patch};
use crate::storage::{SharedStorage, JOURNAL_KEY};
use chrono::{NaiveDate, Utc};

pub struct JournalStore {
    state: PersistedState<Vec<JournalEntry>>,
}

impl JournalStore {
    pub fn load(storage: SharedStorage) -> Self {
        Self {
            state: PersistedState::load(storage, JOURNAL_KEY),
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&JournalEntry> {
        find(self.state.get(), id)
    }

    pub fn add(&mut self, draft: JournalDraft) -> EntityId {
        let entry = JournalEntry::from_draft(draft, Utc::now());
        let id = entry.id;
        self.state.commit("journal_add", |entries| {
            entries.push(entry);
            Some(())
        });
        id
    }

    pub fn update(&mut self, id: EntityId, patch: JournalPatch) -> bool {
        if patch.is_empty() {
            return self.get(id).is_some();
        }
        let now = Utc::now();
        self.state
            .commit("journal_update", |entries| {
                apply_patch(entries, id, patch, now)
            })
            .is_some()
    }

    pub fn delete(&mut self, id: EntityId) -> bool {
        self.state
            .commit("journal_delete", |entries| remove(entries, id))
            .is_some()
    }

    /// Entries written for `date`, oldest first.
    pub fn entries_for(&self, date: NaiveDate) -> Vec<&JournalEntry> {
        self.state
            .get()
            .iter()
            .filter(|entry| entry.date == date)
            .collect()
    }

    /// All entries, newest date first.
    pub fn entries(&self) -> Vec<&JournalEntry> {
        let mut items: Vec<&JournalEntry> = self.state.get().iter().collect();
        items.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        items
    }
}
