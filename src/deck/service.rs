//! Presentation Service
//!
//! Wires configuration into the generation and rendering pipeline once, then
//! turns requests into artifacts on disk.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::generator::ContentGenerator;
use super::images::ImageEnricher;
use crate::ai::{RetryPolicy, create_providers};
use crate::config::Config;
use crate::constants::paths::DOWNLOAD_ROUTE;
use crate::render::{self, RenderedFile};
use crate::storage::{FileCacheStore, SharedCache};
use crate::types::{OutputFormat, PresentationData, PresentationRequest, Result};

/// A rendered presentation ready to be served
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckArtifact {
    pub filename: String,
    pub path: PathBuf,
    pub title: String,
    pub download_path: String,
}

impl DeckArtifact {
    pub fn new(file: RenderedFile, title: &str) -> Self {
        Self {
            download_path: download_path(&file.filename),
            filename: file.filename,
            path: file.path,
            title: title.to_string(),
        }
    }
}

/// Route under which the transport layer serves `filename`
pub fn download_path(filename: &str) -> String {
    format!("{}/{}", DOWNLOAD_ROUTE, filename)
}

/// MIME type for a rendered file: PDF for `.pdf`, PPTX otherwise
pub fn content_type_for(filename: &str) -> &'static str {
    let is_pdf = filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        OutputFormat::Document.content_type()
    } else {
        OutputFormat::Deck.content_type()
    }
}

pub struct PresentationService {
    generator: ContentGenerator,
    cache: SharedCache,
    output_dir: PathBuf,
}

impl PresentationService {
    pub fn new(generator: ContentGenerator, cache: SharedCache, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            generator,
            cache,
            output_dir: output_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let (provider, image_provider) = create_providers(&config.llm, &config.image)?;
        let cache: SharedCache = Arc::new(FileCacheStore::new(&config.paths.cache_dir));

        let mut generator = ContentGenerator::new(provider, cache.clone())
            .with_retry(RetryPolicy::from_config(&config.retry))
            .with_sampling(config.llm.temperature, config.llm.max_tokens);

        if config.image.enabled {
            let enricher = ImageEnricher::from_config(image_provider, &config.image, &config.paths)?;
            generator = generator.with_enricher(Arc::new(enricher));
        } else {
            info!("Image generation disabled");
        }

        Ok(Self::new(generator, cache, &config.paths.output_dir))
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub async fn generate_content(&self, request: &PresentationRequest) -> Result<PresentationData> {
        self.generator.generate(request).await
    }

    /// Render already generated content
    pub async fn render(
        &self,
        data: &PresentationData,
        style: &str,
        format: OutputFormat,
    ) -> Result<DeckArtifact> {
        let file = render::render_to_file(data, style, format, &self.output_dir).await?;
        Ok(DeckArtifact::new(file, &data.title))
    }

    /// Generate content for `request` and render it in the requested style and format
    pub async fn create(&self, request: &PresentationRequest) -> Result<DeckArtifact> {
        let data = self.generate_content(request).await?;
        self.render(&data, request.style(), request.format()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::testing::ScriptedProvider;
    use crate::storage::MemoryCacheStore;
    use regex::Regex;
    use tempfile::TempDir;

    const TWO_SLIDES: &str = r#"{
      "title": "Climate Change",
      "slides": [
        {"type": "title", "title": "Climate Change", "subtitle": "For Students"},
        {"type": "content", "title": "Key Facts", "bulletPoints": ["Seas are rising", "Ice is melting"]}
      ]
    }"#;

    fn service(dir: &TempDir, responses: &[&str]) -> PresentationService {
        let cache: SharedCache = Arc::new(MemoryCacheStore::new());
        let generator = ContentGenerator::new(ScriptedProvider::new(responses), cache.clone());
        PresentationService::new(generator, cache, dir.path())
    }

    #[tokio::test]
    async fn test_create_deck() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp, &[TWO_SLIDES]);
        let request = PresentationRequest::new("Climate Change")
            .unwrap()
            .with_slide_count(3)
            .unwrap()
            .with_audience("Students")
            .with_style("default")
            .with_format(OutputFormat::Deck);

        let artifact = service.create(&request).await.unwrap();

        assert!(Regex::new(r"^presentation_\d{13}\.pptx$").unwrap().is_match(&artifact.filename));
        assert_eq!(artifact.title, "Climate Change");
        assert_eq!(
            artifact.download_path,
            format!("/api/presentation/download/{}", artifact.filename)
        );
        assert!(artifact.path.exists());
        assert_eq!(service.cache().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_second_request_served_from_cache() {
        let temp = TempDir::new().unwrap();
        // Only one scripted response: a second LLM call would fail
        let service = service(&temp, &[TWO_SLIDES]);
        let request = PresentationRequest::new("Climate Change").unwrap();

        service.create(&request).await.unwrap();
        let pdf = service
            .create(&request.clone().with_format(OutputFormat::Document))
            .await
            .unwrap();
        assert!(pdf.filename.ends_with(".pdf"));
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("presentation_1.pdf"), "application/pdf");
        assert_eq!(content_type_for("presentation_1.PDF"), "application/pdf");
        assert_eq!(
            content_type_for("presentation_1.pptx"),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        );
        assert_eq!(
            content_type_for("no-extension"),
            OutputFormat::Deck.content_type()
        );
    }
}
