//! Durable side of the pipeline: news records keyed by title.
//!
//! The store is behind a trait so the in-memory default can be swapped for a
//! database-backed one without touching the pipeline.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Persisted record. `title` is the unique key; re-ingesting a title
/// overwrites every other field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsRecord {
    pub title: String,
    pub link: String,
    /// Unix seconds; `None` when the source date did not parse.
    pub published: Option<i64>,
    pub sentiment_score: f64,
    pub trend_names: String,
}

pub trait NewsStore: Send + Sync {
    /// Insert or update by title. Returns `true` when the record was created.
    fn upsert(&self, record: NewsRecord) -> Result<bool>;
    fn read_all(&self) -> Result<Vec<NewsRecord>>;
}

pub type DynNewsStore = Arc<dyn NewsStore>;

/// In-memory store. BTreeMap keeps `read_all` deterministic (title order).
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<BTreeMap<String, NewsRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NewsStore for MemoryStore {
    fn upsert(&self, record: NewsRecord) -> Result<bool> {
        let mut map = self.inner.write().expect("store rwlock poisoned");
        let created = map.insert(record.title.clone(), record).is_none();
        Ok(created)
    }

    fn read_all(&self) -> Result<Vec<NewsRecord>> {
        let map = self.inner.read().expect("store rwlock poisoned");
        Ok(map.values().cloned().collect())
    }
}
