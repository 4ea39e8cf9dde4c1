//! Blob-backed state holder shared by every domain store.

use crate::storage::{load_json, save_json, SharedStorage};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// In-memory store state mirrored to one local storage key.
pub struct PersistedState<S> {
    storage: SharedStorage,
    key: &'static str,
    state: S,
}

impl<S> PersistedState<S>
where
    S: Serialize + DeserializeOwned + Default,
{
    /// Loads the blob under `key`. Absent or malformed blobs start empty.
    pub fn load(storage: SharedStorage, key: &'static str) -> Self {
        let state = match load_json::<S>(storage.as_ref(), key) {
            Some(state) => {
                info!("event=store_load module=store status=ok key={key}");
                state
            }
            None => {
                info!("event=store_load module=store status=ok key={key} empty=true");
                S::default()
            }
        };
        Self {
            storage,
            key,
            state,
        }
    }

    pub fn get(&self) -> &S {
        &self.state
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Applies one mutation and persists when it reports a change.
    ///
    /// `f` returns `None` for a no-op (for example an unknown id); nothing is
    /// written in that case.
    pub fn commit<R>(&mut self, op: &'static str, f: impl FnOnce(&mut S) -> Option<R>) -> Option<R> {
        match f(&mut self.state) {
            Some(result) => {
                self.persist(op);
                Some(result)
            }
            None => {
                debug!(
                    "event=store_mutation module=store status=skip key={} op={op} reason=no_change",
                    self.key
                );
                None
            }
        }
    }

    /// Rewrites the blob from current state.
    pub fn persist(&self, op: &'static str) -> bool {
        let written = save_json(self.storage.as_ref(), self.key, &self.state);
        if written {
            debug!(
                "event=store_mutation module=store status=ok key={} op={op}",
                self.key
            );
        } else {
            warn!(
                "event=store_mutation module=store status=error key={} op={op} error_code=persist_failed",
                self.key
            );
        }
        written
    }
}
