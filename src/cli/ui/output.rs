use console::style;

use crate::deck::DeckArtifact;
use crate::storage::CacheEntrySummary;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Aligned `label: value` line
    pub fn field(&self, label: &str, value: impl std::fmt::Display) {
        println!("  {:<10} {}", style(format!("{}:", label)).dim(), value);
    }

    pub fn artifact(&self, artifact: &DeckArtifact) {
        self.success(&format!("Created \"{}\"", artifact.title));
        self.field("File", artifact.path.display());
        self.field("Download", &artifact.download_path);
    }

    pub fn cache_entries(&self, entries: &[CacheEntrySummary]) {
        if entries.is_empty() {
            self.info("Cache is empty");
            return;
        }

        self.section(&format!("Cached decks ({})", entries.len()));
        for entry in entries {
            println!(
                "  {}  {} {}",
                style(&entry.key).cyan(),
                entry.title,
                style(format!("({} slides)", entry.slide_count)).dim()
            );
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
