//! Domain stores: in-memory collections persisted as one blob per store.
//!
//! # Responsibility
//! - Provide add/update/delete/toggle operations over each entity type.
//! - Rewrite the store blob in local storage after every mutation.
//!
//! # Invariants
//! - No store operation returns an error. A missing id is a silent no-op,
//!   reported only through the `bool`/`Option` return value.
//! - Persistence failures are logged; in-memory state stays authoritative.
//! - Read-only queries never write to storage.

pub mod academic_store;
pub mod assistant_store;
pub mod growth_store;
pub mod journal_store;
pub mod note_store;
mod persisted;
pub mod research_store;
pub mod task_store;

pub use persisted::PersistedState;

use crate::model::{Entity, EntityId, Patch, Timestamp};

/// Finds one entity by id.
pub(crate) fn find<T: Entity>(items: &[T], id: EntityId) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

/// Runs `f` on the matching entity and stamps its update time.
///
/// `f` returns `None` to signal that nothing changed.
pub(crate) fn modify<T: Entity, R>(
    items: &mut [T],
    id: EntityId,
    now: Timestamp,
    f: impl FnOnce(&mut T) -> Option<R>,
) -> Option<R> {
    let item = items.iter_mut().find(|item| item.id() == id)?;
    let result = f(item)?;
    item.touch(now);
    Some(result)
}

/// Merges a patch into the matching entity.
pub(crate) fn apply_patch<T: Entity, P: Patch<T>>(
    items: &mut [T],
    id: EntityId,
    patch: P,
    now: Timestamp,
) -> Option<()> {
    modify(items, id, now, |item| {
        patch.apply_to(item, now);
        Some(())
    })
}

/// Removes and returns the matching entity.
pub(crate) fn remove<T: Entity>(items: &mut Vec<T>, id: EntityId) -> Option<T> {
    let index = items.iter().position(|item| item.id() == id)?;
    Some(items.remove(index))
}
