use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the JSON array of recent searches.
pub const RECENT_SEARCHES_KEY: &str = "recentWeatherSearches";

pub const MAX_RECENT_SEARCHES: usize = 5;

/// Most-recent-first list of successfully searched city strings.
///
/// Holds at most [`MAX_RECENT_SEARCHES`] entries with no duplicates (exact string match).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentSearches(Vec<String>);

impl RecentSearches {
    /// Build from arbitrary entries, keeping the first occurrence of each and capping the length.
    pub fn from_entries(entries: impl IntoIterator<Item = String>) -> Self {
        let mut list = Vec::with_capacity(MAX_RECENT_SEARCHES);
        for entry in entries {
            if list.len() == MAX_RECENT_SEARCHES {
                break;
            }
            if !list.contains(&entry) {
                list.push(entry);
            }
        }
        Self(list)
    }

    /// Read the list from `store`. Missing or unreadable data yields an empty list.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let raw = match store.get(RECENT_SEARCHES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(err) => {
                warn!(error = %err, "could not read recent searches");
                return Self::default();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(entries) => Self::from_entries(entries),
            Err(err) => {
                warn!(error = %err, "ignoring malformed recent searches");
                Self::default()
            }
        }
    }

    pub fn persist(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.0)?;
        store.set(RECENT_SEARCHES_KEY, &json)
    }

    /// Move `city` to the front, dropping any other occurrence and the oldest overflow.
    pub fn record(&mut self, city: &str) {
        self.0.retain(|existing| existing != city);
        self.0.insert(0, city.to_string());
        self.0.truncate(MAX_RECENT_SEARCHES);
    }

    pub fn latest(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
