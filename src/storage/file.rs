//! Durable JSON-file cache: one `<cache_dir>/<key>.json` per entry.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{CacheEntrySummary, CacheStore};
use crate::types::{PresentationData, Result};

pub struct FileCacheStore {
    cache_dir: PathBuf,
}

impl FileCacheStore {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    async fn json_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let mut entries = match tokio::fs::read_dir(&self.cache_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(files),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                files.push(path);
            }
        }

        Ok(files)
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn get(&self, key: &str) -> Result<Option<PresentationData>> {
        let path = self.entry_path(key);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<PresentationData>(&content) {
            Ok(data) => {
                debug!("Loaded cache '{}' with {} slides", key, data.slide_count());
                Ok(Some(data))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupt cache entry, treating as miss");
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &str, data: &PresentationData) -> Result<()> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;

        let path = self.entry_path(key);
        let content = serde_json::to_string_pretty(data)?;
        tokio::fs::write(&path, &content).await?;

        info!(
            "Saved cache '{}' ({} slides, {} bytes)",
            key,
            data.slide_count(),
            content.len()
        );
        Ok(())
    }

    async fn list(&self) -> Result<Vec<CacheEntrySummary>> {
        let mut summaries = Vec::new();

        for path in self.json_files().await? {
            if let Some(key) = path.file_stem().and_then(|s| s.to_str())
                && let Ok(content) = tokio::fs::read_to_string(&path).await
                && let Ok(data) = serde_json::from_str::<PresentationData>(&content)
            {
                summaries.push(CacheEntrySummary::new(key, &data));
            }
        }

        summaries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(summaries)
    }

    async fn clear(&self) -> Result<usize> {
        let files = self.json_files().await?;
        for path in &files {
            tokio::fs::remove_file(path).await?;
        }

        info!("Cleared {} cache entries", files.len());
        Ok(files.len())
    }
}
