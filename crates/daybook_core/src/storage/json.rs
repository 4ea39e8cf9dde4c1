//! JSON blob helpers over [`KeyValueStore`].
//!
//! Failures never reach store callers: they are logged and reported as
//! "nothing loaded" (`None`) or "nothing written" (`false`).

use crate::storage::kv::KeyValueStore;
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Loads and parses one blob. Absent, unreadable, or malformed blobs yield `None`.
pub fn load_json<T: DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("event=blob_load module=storage status=skip key={key} reason=absent");
            return None;
        }
        Err(err) => {
            error!("event=blob_load module=storage status=error key={key} error={err}");
            return None;
        }
    };

    match serde_json::from_str::<T>(&raw) {
        Ok(value) => {
            debug!(
                "event=blob_load module=storage status=ok key={key} bytes={}",
                raw.len()
            );
            Some(value)
        }
        Err(err) => {
            warn!(
                "event=blob_load module=storage status=error key={key} error_code=blob_malformed line={} column={}",
                err.line(),
                err.column()
            );
            None
        }
    }
}

/// Serializes and writes one blob, replacing any previous value.
///
/// Returns whether the blob was written.
pub fn save_json<T: Serialize + ?Sized>(storage: &dyn KeyValueStore, key: &str, value: &T) -> bool {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(err) => {
            error!("event=blob_save module=storage status=error key={key} error_code=serialize_failed error={err}");
            return false;
        }
    };

    match storage.set(key, &raw) {
        Ok(()) => {
            debug!(
                "event=blob_save module=storage status=ok key={key} bytes={}",
                raw.len()
            );
            true
        }
        Err(err) => {
            error!("event=blob_save module=storage status=error key={key} error={err}");
            false
        }
    }
}
