//! Core domain logic for Daybook.
//! Stores, the assistant pipeline, and the focus timer live here; front ends
//! only call into this crate.

pub mod assistant;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;
pub mod timer;
pub mod workspace;

pub use assistant::{
    classify, AssistantAction, AssistantPipeline, AssistantReply, ChatTransport, Classification,
    ProviderConfig, ProviderKind, ReplySource, APOLOGY,
};
pub use config::{AppConfig, ConfigError};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::message::{Category, Intent, Message, Sender};
pub use storage::{KeyValueStore, MemoryKeyValueStore, SharedStorage, SqliteKeyValueStore};
pub use timer::{FocusTimer, TimerDurations, TimerEvent};
pub use workspace::{AppliedAction, ChatOutcome, Workspace, WorkspaceError};

/// Minimal health-check API for front ends.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
