use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Query key of the image collection.
pub const IMAGES_KEY: &str = "images";

/// Marks cached query results stale so their consumers refetch.
pub trait QueryCache: Send + Sync {
    fn invalidate(&self, key: &str);
}

#[derive(Debug)]
struct Entry {
    data: Value,
    stale: bool,
}

/// In-memory keyed store of fetched query results.
///
/// Values are kept as JSON so one client can hold results of any type.
#[derive(Debug, Default)]
pub struct QueryClient {
    entries: Mutex<HashMap<String, Entry>>,
}

impl QueryClient {
    /// Creates an empty client.
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a freshly fetched result under `key`.
    pub fn set<T: Serialize>(&self, key: &str, data: &T) -> Result<(), serde_json::Error> {
        let data = serde_json::to_value(data)?;
        self.entries()
            .insert(key.to_string(), Entry { data, stale: false });
        Ok(())
    }

    /// Returns the cached result for `key` unless it is missing or stale.
    pub fn get_fresh<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
        let entries = self.entries();
        match entries.get(key) {
            Some(entry) if !entry.stale => serde_json::from_value(entry.data.clone()).map(Some),
            _ => Ok(None),
        }
    }

    /// Returns `true` if `key` has no entry or its entry was invalidated.
    pub fn is_stale(&self, key: &str) -> bool {
        self.entries().get(key).is_none_or(|entry| entry.stale)
    }
}

impl QueryCache for QueryClient {
    fn invalidate(&self, key: &str) {
        if let Some(entry) = self.entries().get_mut(key) {
            debug!(key, "invalidating query");
            entry.stale = true;
        }
    }
}
