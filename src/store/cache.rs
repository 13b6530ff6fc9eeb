use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::LocalCache;

/// In-process cache. Shared between clones.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.lock().ok()?;
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &Value) {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(key.to_string(), value.clone());
            }
            Err(_) => tracing::warn!(key, "cache lock poisoned, dropping write"),
        }
    }
}

/// Cache persisted as one `<key>.json` file per key in a directory.
#[derive(Clone, Debug)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '-' })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl LocalCache for FileCache {
    fn get(&self, key: &str) -> Option<Value> {
        let body = std::fs::read_to_string(self.file(key)).ok()?;
        match serde_json::from_str(&body) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, "ignoring unreadable cache entry: {}", e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &Value) {
        let write = || -> std::io::Result<()> {
            std::fs::create_dir_all(&self.dir)?;
            std::fs::write(self.file(key), value.to_string())
        };
        if let Err(e) = write() {
            tracing::warn!(key, "cache write failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_cache_is_shared_between_clones() {
        let cache = MemoryCache::new();
        let other = cache.clone();
        cache.set("dailyLogs", &json!({ "2025-11-03": {} }));
        assert_eq!(other.get("dailyLogs"), Some(json!({ "2025-11-03": {} })));
        assert_eq!(other.get("weeklyPlans"), None);
    }

    #[test]
    fn file_cache_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("cache"));
        assert_eq!(cache.get("milestonesData"), None);

        cache.set("milestonesData", &json!({ "Q425": {} }));
        let reopened = FileCache::new(dir.path().join("cache"));
        assert_eq!(reopened.get("milestonesData"), Some(json!({ "Q425": {} })));
    }

    #[test]
    fn file_cache_treats_garbage_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dailyLogs.json"), "{not json").unwrap();
        let cache = FileCache::new(dir.path());
        assert_eq!(cache.get("dailyLogs"), None);
    }
}
