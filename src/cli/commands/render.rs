//! Render Command
//!
//! Renders stored presentation JSON without calling the LLM. Useful for
//! re-rendering a cached deck in another style or format.

use std::path::Path;

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::deck::DeckArtifact;
use crate::render::render_to_file;
use crate::types::{OutputFormat, PresentationData, Result};

pub async fn run(file: &Path, style: &str, format: OutputFormat) -> Result<()> {
    let config = ConfigLoader::load()?;
    let artifact = render_json_file(file, style, format, &config.paths.output_dir).await?;
    Output::new().artifact(&artifact);
    Ok(())
}

pub async fn render_json_file(
    file: &Path,
    style: &str,
    format: OutputFormat,
    output_dir: &Path,
) -> Result<DeckArtifact> {
    let content = tokio::fs::read_to_string(file).await?;
    let data: PresentationData = serde_json::from_str(&content)?;
    let rendered = render_to_file(&data, style, format, output_dir).await?;
    Ok(DeckArtifact::new(rendered, &data.title))
}
