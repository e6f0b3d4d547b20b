//! Cache Command
//!
//! Usage:
//!   slidesmith cache list
//!   slidesmith cache clear

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::storage::{CacheStore, FileCacheStore};
use crate::types::Result;

fn store() -> Result<FileCacheStore> {
    let config = ConfigLoader::load()?;
    Ok(FileCacheStore::new(config.paths.cache_dir))
}

pub async fn list() -> Result<()> {
    let entries = store()?.list().await?;
    Output::new().cache_entries(&entries);
    Ok(())
}

pub async fn clear() -> Result<()> {
    let store = store()?;
    let output = Output::new();

    let cleared = store.clear().await?;
    if cleared > 0 {
        output.success(&format!(
            "Cleared {} cached decks from {}",
            cleared,
            store.cache_dir().display()
        ));
    } else {
        output.info("Cache is already empty");
    }
    Ok(())
}
