//! Research session store.

use super::{apply_patch, find, modify, remove, PersistedState};
use crate::model::research::{ResearchPatch, ResearchSession, ResearchStatus, Source};
use crate::model::{new_id, normalize_optional, EntityId, Patch, Timestamp};
use crate::storage::{SharedStorage, RESEARCH_KEY};
use chrono::Utc;

pub struct ResearchStore {
    state: PersistedState<Vec<ResearchSession>>,
}

impl ResearchStore {
    pub fn load(storage: SharedStorage) -> Self {
        Self {
            state: PersistedState::load(storage, RESEARCH_KEY),
        }
    }

    pub fn sessions(&self) -> &[ResearchSession] {
        self.state.get()
    }

    pub fn get(&self, id: EntityId) -> Option<&ResearchSession> {
        find(self.state.get(), id)
    }

    /// Starts a new active session.
    pub fn add(&mut self, topic: &str, question: Option<String>) -> EntityId {
        let session = ResearchSession::start(topic, question, Utc::now());
        let id = session.id;
        self.state.commit("research_add", |sessions| {
            sessions.push(session);
            Some(())
        });
        id
    }

    pub fn update(&mut self, id: EntityId, patch: ResearchPatch) -> bool {
        if patch.is_empty() {
            return self.get(id).is_some();
        }
        let now = Utc::now();
        self.state
            .commit("research_update", |sessions| {
                apply_patch(sessions, id, patch, now)
            })
            .is_some()
    }

    pub fn delete(&mut self, id: EntityId) -> bool {
        self.state
            .commit("research_delete", |sessions| remove(sessions, id))
            .is_some()
    }

    pub fn add_source(
        &mut self,
        id: EntityId,
        title: &str,
        url: Option<String>,
        notes: &str,
    ) -> Option<EntityId> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let now = Utc::now();
        self.state.commit("research_add_source", |sessions| {
            modify(sessions, id, now, |session| {
                let source_id = new_id();
                session.sources.push(Source {
                    id: source_id,
                    title: title.to_string(),
                    url: normalize_optional(url),
                    notes: notes.trim().to_string(),
                });
                Some(source_id)
            })
        })
    }

    pub fn remove_source(&mut self, id: EntityId, source_id: EntityId) -> bool {
        let now = Utc::now();
        self.state
            .commit("research_remove_source", |sessions| {
                modify(sessions, id, now, |session| {
                    let index = session.sources.iter().position(|s| s.id == source_id)?;
                    session.sources.remove(index);
                    Some(())
                })
            })
            .is_some()
    }

    /// Marks a session completed. `ended_at` is set only once.
    pub fn complete(&mut self, id: EntityId, now: Timestamp) -> bool {
        self.state
            .commit("research_complete", |sessions| {
                modify(sessions, id, now, |session| {
                    if session.status == ResearchStatus::Completed {
                        return None;
                    }
                    session.status = ResearchStatus::Completed;
                    session.ended_at.get_or_insert(now);
                    Some(())
                })
            })
            .is_some()
    }

    pub fn active(&self) -> Vec<&ResearchSession> {
        self.state
            .get()
            .iter()
            .filter(|session| session.status == ResearchStatus::Active)
            .collect()
    }
}
