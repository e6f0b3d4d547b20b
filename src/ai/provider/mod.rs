//! Model Provider Abstraction
//!
//! Defines the service seams the generation pipeline depends on:
//! `LlmProvider` for text completion and `ImageProvider` for image generation.
//! Both are consumed as opaque request/response services; `OpenAiProvider`
//! is the production implementation of each.

mod openai;
#[cfg(test)]
pub(crate) mod testing;

pub use openai::OpenAiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{ImageConfig, LlmConfig};
use crate::types::{DeckError, Result};

// =============================================================================
// Completion Types
// =============================================================================

/// One completion call: system instruction, user prompt and sampling settings
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: usize,
}

/// Free-form completion text with usage metrics
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
}

impl Completion {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: TokenUsage::default(),
        }
    }
}

/// Token usage metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    pub fn from_openai(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            input_tokens: prompt_tokens,
            output_tokens: completion_tokens,
        }
    }
}

// =============================================================================
// Image Types
// =============================================================================

/// Result of an image generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedImage {
    /// Remotely fetchable image
    Url(String),
    /// Image bytes returned inline
    Bytes(Vec<u8>),
}

// =============================================================================
// Provider Traits
// =============================================================================

#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate_image(&self, description: &str) -> Result<GeneratedImage>;

    fn name(&self) -> &str;
}

pub type SharedProvider = Arc<dyn LlmProvider>;
pub type SharedImageProvider = Arc<dyn ImageProvider>;

/// Create the completion and image providers from configuration
pub fn create_providers(
    llm: &LlmConfig,
    image: &ImageConfig,
) -> Result<(SharedProvider, SharedImageProvider)> {
    match llm.provider.as_str() {
        "openai" => {
            let provider = Arc::new(OpenAiProvider::new(llm, image)?);
            let completion: SharedProvider = provider.clone();
            let images: SharedImageProvider = provider;
            Ok((completion, images))
        }
        other => Err(DeckError::Config(format!(
            "Unknown provider: {}. Supported: openai",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage::from_openai(120, 80);
        assert_eq!(usage.total(), 200);
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let llm = LlmConfig {
            provider: "carrier-pigeon".to_string(),
            ..Default::default()
        };
        let err = match create_providers(&llm, &ImageConfig::default()) {
            Err(e) => e,
            Ok(_) => panic!("expected config error"),
        };
        assert!(err.to_string().contains("carrier-pigeon"));
    }
}
