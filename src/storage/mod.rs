//! Content Cache
//!
//! Generated decks are cached by value under a key derived from the request.
//!
//! ## Key derivation
//!
//! `"{theme}_{slideCount}_{audience}"`, every character outside `[A-Za-z0-9]`
//! replaced by `_`, then lowercased. `additionalInfo` and `style` are not
//! part of the key: requests differing only in those share one entry. Since
//! only ASCII alphanumerics survive, non-Latin themes of equal length with
//! the same count and audience also share a key.
//!
//! Entries are overwritten on put and never expire.

mod file;
mod memory;

pub use file::FileCacheStore;
pub use memory::MemoryCacheStore;

use async_trait::async_trait;
use std::sync::Arc;

use crate::types::{PresentationData, PresentationRequest, Result};

/// Derive the cache key for a request
pub fn cache_key(request: &PresentationRequest) -> String {
    format!(
        "{}_{}_{}",
        request.theme(),
        request.slide_count(),
        request.audience()
    )
    .chars()
    .map(|c| {
        if c.is_ascii_alphanumeric() {
            c.to_ascii_lowercase()
        } else {
            '_'
        }
    })
    .collect()
}

/// Summary of one cached deck
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntrySummary {
    pub key: String,
    pub title: String,
    pub slide_count: usize,
}

impl CacheEntrySummary {
    fn new(key: impl Into<String>, data: &PresentationData) -> Self {
        Self {
            key: key.into(),
            title: data.title.clone(),
            slide_count: data.slide_count(),
        }
    }
}

/// Key-value store for generated decks
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// `Ok(None)` on miss
    async fn get(&self, key: &str) -> Result<Option<PresentationData>>;

    async fn put(&self, key: &str, data: &PresentationData) -> Result<()>;

    /// Readable entries, sorted by key
    async fn list(&self) -> Result<Vec<CacheEntrySummary>>;

    /// Remove every entry, returning how many were removed
    async fn clear(&self) -> Result<usize>;
}

pub type SharedCache = Arc<dyn CacheStore>;

#[cfg(test)]
mod tests {
    use super::*;

    fn request(theme: &str, count: u32, audience: &str) -> PresentationRequest {
        PresentationRequest::new(theme)
            .unwrap()
            .with_slide_count(count)
            .unwrap()
            .with_audience(audience)
    }

    #[test]
    fn test_key_format() {
        assert_eq!(
            cache_key(&request("Climate Change", 3, "Students")),
            "climate_change_3_students"
        );
        assert_eq!(
            cache_key(&PresentationRequest::new("AI & Ethics!").unwrap()),
            "ai___ethics__10_general_audience"
        );
    }

    #[test]
    fn test_key_ignores_style_and_additional_info() {
        let plain = request("Rust", 5, "Engineers");
        let styled = request("Rust", 5, "Engineers")
            .with_style("dark")
            .with_additional_info("Mention the borrow checker");

        assert_eq!(cache_key(&plain), cache_key(&styled));
    }

    #[test]
    fn test_key_distinguishes_count_and_audience() {
        let base = cache_key(&request("Rust", 5, "Engineers"));
        assert_ne!(base, cache_key(&request("Rust", 6, "Engineers")));
        assert_ne!(base, cache_key(&request("Rust", 5, "Managers")));
    }

    #[test]
    fn test_non_ascii_themes_collapse() {
        // Only ASCII alphanumerics survive, so equal-length Cyrillic themes collide
        let a = cache_key(&request("Космос", 3, "Students"));
        let b = cache_key(&request("Природ", 3, "Students"));
        assert_eq!(a, "_______3_students");
        assert_eq!(a, b);
    }
}
