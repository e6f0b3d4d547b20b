//! In-process cache backed by a concurrent map.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{CacheEntrySummary, CacheStore};
use crate::types::{PresentationData, Result};

#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: DashMap<String, PresentationData>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<PresentationData>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(&self, key: &str, data: &PresentationData) -> Result<()> {
        self.entries.insert(key.to_string(), data.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<CacheEntrySummary>> {
        let mut summaries: Vec<_> = self
            .entries
            .iter()
            .map(|entry| CacheEntrySummary::new(entry.key().as_str(), entry.value()))
            .collect();
        summaries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(summaries)
    }

    async fn clear(&self) -> Result<usize> {
        let count = self.entries.len();
        self.entries.clear();
        Ok(count)
    }
}
