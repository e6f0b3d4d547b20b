//! Image Enrichment
//!
//! Turns a visual element description into a locally stored image asset.
//! Every failure is soft: it is logged and the element keeps no path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ai::{GeneratedImage, SharedImageProvider};
use crate::config::{ImageConfig, PathsConfig};
use crate::constants::network;
use crate::types::{DeckError, Result};

pub struct ImageEnricher {
    provider: SharedImageProvider,
    client: reqwest::Client,
    images_dir: PathBuf,
    url_prefix: String,
}

impl ImageEnricher {
    pub fn new(
        provider: SharedImageProvider,
        images_dir: impl Into<PathBuf>,
        url_prefix: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(network::IMAGE_DOWNLOAD_TIMEOUT_SECS))
            .build()
            .map_err(|e| DeckError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            provider,
            client,
            images_dir: images_dir.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(
        provider: SharedImageProvider,
        image: &ImageConfig,
        paths: &PathsConfig,
    ) -> Result<Self> {
        Self::new(provider, &paths.images_dir, &image.url_prefix)
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Generate and store an image, returning its public path
    pub async fn enrich(&self, description: &str) -> Option<String> {
        match self.try_enrich(description).await {
            Ok(path) => {
                info!(path = %path, "Stored generated image");
                Some(path)
            }
            Err(e) => {
                warn!(error = %e, description, "Image enrichment failed, continuing without image");
                None
            }
        }
    }

    async fn try_enrich(&self, description: &str) -> Result<String> {
        if description.trim().is_empty() {
            return Err(DeckError::Image("empty description".to_string()));
        }

        let bytes = match self.provider.generate_image(description).await? {
            GeneratedImage::Bytes(bytes) => bytes,
            GeneratedImage::Url(url) => self.download(&url).await?,
        };

        if bytes.is_empty() {
            return Err(DeckError::Image("image payload is empty".to_string()));
        }

        let filename = asset_filename();
        tokio::fs::create_dir_all(&self.images_dir)
            .await
            .map_err(|e| DeckError::Image(format!("create {}: {}", self.images_dir.display(), e)))?;
        let path = self.images_dir.join(&filename);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| DeckError::Image(format!("write {}: {}", path.display(), e)))?;

        debug!(bytes = bytes.len(), file = %path.display(), "Image written");
        Ok(format!("{}/{}", self.url_prefix, filename))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| DeckError::Image(format!("download failed: {}", e)))?;

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| DeckError::Image(format!("download failed: {}", e)))
    }
}

/// `image_<millis>_<8 hex>.png`
fn asset_filename() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!(
        "image_{}_{}.png",
        chrono::Utc::now().timestamp_millis(),
        &id[..8]
    )
}
