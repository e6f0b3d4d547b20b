//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/slidesmith/) and project (.slidesmith/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{generation, image, network, paths, retry};
use crate::types::{DeckError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// LLM completion settings
    pub llm: LlmConfig,

    /// Image generation settings
    pub image: ImageConfig,

    /// Retry policy for completion calls
    pub retry: RetryConfig,

    /// Cache, asset and output directories
    pub paths: PathsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            image: ImageConfig::default(),
            retry: RetryConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `DeckError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(DeckError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(DeckError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(DeckError::Config(
                "LLM max_tokens must be greater than 0".to_string(),
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(DeckError::Config("LLM model must not be empty".to_string()));
        }

        if self.image.enabled && self.image.model.trim().is_empty() {
            return Err(DeckError::Config(
                "Image model must not be empty when image generation is enabled".to_string(),
            ));
        }

        if self.retry.max_attempts == 0 {
            return Err(DeckError::Config(
                "Retry max_attempts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name
    pub provider: String,

    /// Chat model name
    pub model: String,

    /// API base URL (for OpenAI-compatible endpoints)
    pub api_base: Option<String>,

    /// API key; falls back to OPENAI_API_KEY. Never serialized.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum output tokens
    pub max_tokens: usize,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: generation::DEFAULT_MODEL.to_string(),
            api_base: None,
            api_key: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: generation::TEMPERATURE,
            max_tokens: generation::MAX_TOKENS,
        }
    }
}

// =============================================================================
// Image Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Generate images for `image` visual elements
    pub enabled: bool,

    /// Image model name
    pub model: String,

    /// Requested image size, e.g. "1024x1024"
    pub size: String,

    /// URL prefix prepended to stored asset filenames
    pub url_prefix: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: image::DEFAULT_MODEL.to_string(),
            size: image::DEFAULT_SIZE.to_string(),
            url_prefix: image::URL_PREFIX.to_string(),
        }
    }
}

// =============================================================================
// Retry Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per generation, first try included
    pub max_attempts: u32,

    /// Base delay for exponential backoff (milliseconds)
    pub base_delay_ms: u64,
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: retry::MAX_ATTEMPTS,
            base_delay_ms: retry::BASE_DELAY_MS,
        }
    }
}

// =============================================================================
// Paths Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Content cache directory (one JSON file per key)
    pub cache_dir: PathBuf,

    /// Generated image assets
    pub images_dir: PathBuf,

    /// Rendered presentations
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(paths::CACHE_DIR),
            images_dir: PathBuf::from(paths::IMAGES_DIR),
            output_dir: PathBuf::from(paths::OUTPUT_DIR),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.llm.max_tokens, 2500);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.base_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_invalid_temperature() {
        let mut config = Config::default();
        config.llm.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = Config::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_redacted_and_not_serialized() {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-secret".to_string());

        let debug = format!("{:?}", config.llm);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-secret"));

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
    }
}
