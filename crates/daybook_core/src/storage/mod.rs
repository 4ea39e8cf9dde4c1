//! Key/value local storage used to persist one JSON blob per store.
//!
//! # Responsibility
//! - Define the key/value contract every domain store persists through.
//! - Provide SQLite-backed and in-memory implementations.
//! - Convert persistence failures into logged "nothing loaded/written" outcomes.
//!
//! # Invariants
//! - One key holds exactly one store blob; writes replace the whole value.
//! - Blobs carry no schema version; unreadable blobs load as absent.

pub mod json;
pub mod kv;

pub use json::{load_json, save_json};
pub use kv::{
    KeyValueStore, MemoryKeyValueStore, SharedStorage, SqliteKeyValueStore, StorageError,
    StorageResult,
};

pub const TASKS_KEY: &str = "daybook.tasks";
pub const NOTES_KEY: &str = "daybook.notes";
pub const ASSISTANT_KEY: &str = "daybook.assistant";
pub const ACADEMIC_KEY: &str = "daybook.academic";
pub const GROWTH_KEY: &str = "daybook.growth";
pub const RESEARCH_KEY: &str = "daybook.research";
pub const JOURNAL_KEY: &str = "daybook.journal";

/// Key under which the last working model of one provider is cached.
pub fn preferred_model_key(provider_id: &str) -> String {
    format!("daybook.assistant.preferred_model.{provider_id}")
}
