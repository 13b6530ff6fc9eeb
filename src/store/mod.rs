//! Document persistence.
//!
//! The dashboard keeps one JSON document per data category. Two seams hold
//! them:
//!
//! - [`DocumentStore`]: the shared, durable store. Last write wins per
//!   document.
//! - [`LocalCache`]: a local mirror read first on startup and written through
//!   on every change.
//!
//! Callers must not care which of the two supplied a document, only that it
//! has the expected shape.

mod cache;
mod document;
mod schema;
mod sqlite;

use serde_json::Value;

pub use cache::{FileCache, MemoryCache};
pub use document::StoredDocument;
pub use sqlite::SqliteStore;

pub const MILESTONES_PATH: &str = "dashboard/milestones";
pub const WEEKLY_PLANS_PATH: &str = "dashboard/weeklyPlans";
pub const DAILY_LOGS_PATH: &str = "dashboard/dailyLogs";
pub const RESOURCING_PATH: &str = "dashboard/resourcing";
pub const WEEK_HISTORY_PATH: &str = "dashboard/history/weeks";

pub const MILESTONES_KEY: &str = "milestonesData";
pub const WEEKLY_PLANS_KEY: &str = "weeklyPlans";
pub const DAILY_LOGS_KEY: &str = "dailyLogs";
pub const RESOURCING_KEY: &str = "resourcingData_v1";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} lock poisoned")]
    Poisoned(&'static str),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Whole-document storage keyed by slash-separated paths.
pub trait DocumentStore: Send + Sync {
    fn get(&self, path: &str) -> StoreResult<Option<Value>>;

    /// Write a document. With `merge`, object fields are merged recursively
    /// into the stored document; otherwise it is replaced.
    fn set(&self, path: &str, document: &Value, merge: bool) -> StoreResult<()>;
}

/// Synchronous key/value mirror of the store.
///
/// Cache failures are never surfaced: a broken cache behaves like an empty
/// one.
pub trait LocalCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: &Value);
}

/// Merge `patch` into `target`. Objects merge key by key; any other value in
/// `patch` replaces what is in `target`.
pub fn merge_json(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_combines_nested_objects() {
        let mut target = json!({ "Q425": { "Materials": 1 }, "Q126": {} });
        merge_json(&mut target, &json!({ "Q425": { "Durability": 2 } }));
        assert_eq!(
            target,
            json!({ "Q425": { "Materials": 1, "Durability": 2 }, "Q126": {} })
        );
    }

    #[test]
    fn merge_replaces_arrays_and_scalars() {
        let mut target = json!({ "list": [1, 2, 3], "n": 1 });
        merge_json(&mut target, &json!({ "list": [4], "n": { "x": 1 } }));
        assert_eq!(target, json!({ "list": [4], "n": { "x": 1 } }));
    }
}
