//! Domain model for every Daybook store.
//!
//! # Responsibility
//! - Define the entities owned by each domain store.
//! - Define typed drafts (for `add`) and patches (for `update`).
//! - Keep derived fields (streaks, progress, review intervals) as pure formulas.
//!
//! # Invariants
//! - Every entity is identified by a random, never-reused `EntityId`.
//! - Each entity type is owned by exactly one store.
//! - Serialized field names are camelCase to stay compatible with existing blobs.

pub mod academic;
pub mod growth;
pub mod journal;
pub mod message;
pub mod note;
pub mod research;
pub mod review;
pub mod task;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// Stable identifier for every stored entity.
pub type EntityId = Uuid;

/// Timestamp type used across the model.
pub type Timestamp = DateTime<Utc>;

/// Record that can live in a persisted collection.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    fn id(&self) -> EntityId;

    /// Stamps the update time after a mutation.
    fn touch(&mut self, now: Timestamp);
}

/// Partial update merged into an existing entity.
///
/// Only fields set on the patch are written.
pub trait Patch<T> {
    fn apply_to(self, target: &mut T, now: Timestamp);

    /// Returns whether applying the patch changes nothing.
    fn is_empty(&self) -> bool;
}

/// Generates a new random entity id.
pub fn new_id() -> EntityId {
    Uuid::new_v4()
}

/// Trims a free-text title; blank input becomes `fallback`.
pub(crate) fn normalize_title(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Trims optional text; blank input becomes `None`.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|text| {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
