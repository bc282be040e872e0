//! Typed JSON documents on top of `KeyValueStore`.
//!
//! # Responsibility
//! - `load_json`: decode a stored document or fall back to a default.
//! - `save_json`: encode and write a document.
//! - `PersistReport`: collect write failures so mutations stay non-fatal.

use crate::repo::kv_repo::{KeyValueStore, StoreError, StoreResult};
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const UPCOMING_EXAMS_KEY: &str = "upcomingExams";
pub const PAST_EXAMS_KEY: &str = "pastExams";
pub const TASKS_KEY: &str = "tasks";
pub const CURRENT_GOAL_KEY: &str = "currentGoal";
pub const GOAL_ACHIEVED_KEY: &str = "goalAchieved";
pub const THEME_KEY: &str = "theme";

/// How a document load was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Stored,
    Missing,
    Corrupt,
    ReadFailed,
}

/// Loads `key` and reports whether the default was used.
pub fn load_json_with_source<T, S>(store: &S, key: &str, default: T) -> (T, LoadSource)
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get_raw(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return (default, LoadSource::Missing),
        Err(err) => {
            warn!(
                "event=store_read_fallback module=repo status=error key={} reason=read_failed error={}",
                key, err
            );
            return (default, LoadSource::ReadFailed);
        }
    };

    match serde_json::from_str::<T>(&raw) {
        Ok(value) => (value, LoadSource::Stored),
        Err(err) => {
            warn!(
                "event=store_read_fallback module=repo status=error key={} reason=corrupt bytes={} error={}",
                key,
                raw.len(),
                err
            );
            (default, LoadSource::Corrupt)
        }
    }
}

/// Loads `key`, returning `default` on a missing, unreadable or corrupt document.
pub fn load_json<T, S>(store: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    load_json_with_source(store, key, default).0
}

/// Serializes `value` and writes it under `key`.
pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(StoreError::Serialize)?;
    store.put_raw(key, &encoded)
}

/// One key that could not be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistFailure {
    pub key: &'static str,
    pub message: String,
}

/// Write outcomes of one command; failures are warnings, not aborts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub failures: Vec<PersistFailure>,
}

impl PersistReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves `value` and records a failure instead of returning it.
    ///
    /// Returns whether the write succeeded.
    pub fn save<T, S>(&mut self, store: &S, key: &'static str, value: &T) -> bool
    where
        T: Serialize + ?Sized,
        S: KeyValueStore + ?Sized,
    {
        match save_json(store, key, value) {
            Ok(()) => true,
            Err(err) => {
                error!(
                    "event=store_write module=repo status=error key={} error={}",
                    key, err
                );
                self.failures.push(PersistFailure {
                    key,
                    message: err.to_string(),
                });
                false
            }
        }
    }

    pub fn merge(&mut self, other: PersistReport) {
        self.failures.extend(other.failures);
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// User-facing warning text, `None` when every write succeeded.
    pub fn warning(&self) -> Option<String> {
        if self.is_clean() {
            return None;
        }
        let mut keys: Vec<&str> = Vec::new();
        for failure in &self.failures {
            if !keys.contains(&failure.key) {
                keys.push(failure.key);
            }
        }
        let keys = keys.join(", ");
        Some(format!(
            "changes are kept for this session but could not be saved ({keys})"
        ))
    }
}
