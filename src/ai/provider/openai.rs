//! OpenAI API Provider
//!
//! Chat Completions for deck text and Images API for slide illustrations.
//! Works against any OpenAI-compatible endpoint via `api_base`.

use async_trait::async_trait;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

use super::{
    Completion, CompletionRequest, GeneratedImage, ImageProvider, LlmProvider, TokenUsage,
};
use crate::config::{ImageConfig, LlmConfig};
use crate::types::{DeckError, ErrorClassifier, Result};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const PROVIDER_NAME: &str = "openai";

/// OpenAI API Provider with secure API key handling
pub struct OpenAiProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    image_model: String,
    image_size: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("image_model", &self.image_model)
            .field("image_size", &self.image_size)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(llm: &LlmConfig, image: &ImageConfig) -> Result<Self> {
        let api_key = llm
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                DeckError::Config(
                    "OpenAI API key not found. Set OPENAI_API_KEY env var or provide in config"
                        .to_string(),
                )
            })?;

        let api_base = llm
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        url::Url::parse(&api_base)
            .map_err(|e| DeckError::Config(format!("Invalid api_base '{}': {}", api_base, e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(llm.timeout_secs))
            .build()
            .map_err(|e| DeckError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            api_base: api_base.trim_end_matches('/').to_string(),
            model: llm.model.clone(),
            image_model: image.model.clone(),
            image_size: image.size.clone(),
            client,
        })
    }

    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let url = format!("{}/{}", self.api_base, path);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, PROVIDER_NAME))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("OpenAI API error ({}): {}", status, body),
                PROVIDER_NAME,
            )
            .into());
        }

        response
            .json::<R>()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, PROVIDER_NAME).into())
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        info!(
            "Requesting completion (temperature: {}, max_tokens: {})",
            request.temperature, request.max_tokens
        );

        let start = Instant::now();
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response: ChatCompletionResponse = self.post_json("chat/completions", &body).await?;

        let usage = response
            .usage
            .map(|u| TokenUsage::from_openai(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DeckError::parse("No content in OpenAI response", ""))?;

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            tokens = usage.total(),
            "Completion received"
        );

        Ok(Completion { text, usage })
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ImageProvider for OpenAiProvider {
    #[instrument(skip(self, description), fields(model = %self.image_model))]
    async fn generate_image(&self, description: &str) -> Result<GeneratedImage> {
        let body = ImageGenerationRequest {
            model: &self.image_model,
            prompt: description,
            n: 1,
            size: &self.image_size,
        };

        let response: ImageGenerationResponse = self.post_json("images/generations", &body).await?;

        let first = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| DeckError::Image("Empty response from image API".to_string()))?;

        match (first.url, first.b64_json) {
            (Some(url), _) => Ok(GeneratedImage::Url(url)),
            (None, Some(b64)) => base64::engine::general_purpose::STANDARD
                .decode(b64.as_bytes())
                .map(GeneratedImage::Bytes)
                .map_err(|e| DeckError::Image(format!("Invalid base64 image payload: {}", e))),
            (None, None) => Err(DeckError::Image(
                "Image API returned neither url nor b64_json".to_string(),
            )),
        }
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    url: Option<String>,
    b64_json: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm_config(key: &str) -> LlmConfig {
        LlmConfig {
            api_key: Some(key.to_string()),
            api_base: Some("http://localhost:9999/v1/".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_debug_redacts_key() {
        let provider = OpenAiProvider::new(&llm_config("sk-hidden"), &ImageConfig::default())
            .unwrap();
        let debug = format!("{:?}", provider);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-hidden"));
        assert_eq!(provider.api_base, "http://localhost:9999/v1");
    }

    #[test]
    fn test_invalid_api_base_rejected() {
        let mut config = llm_config("sk-x");
        config.api_base = Some("not a url".to_string());
        assert!(OpenAiProvider::new(&config, &ImageConfig::default()).is_err());
    }

    #[test]
    fn test_chat_request_shape() {
        let body = ChatCompletionRequest {
            model: "gpt-3.5-turbo",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            temperature: 0.7,
            max_tokens: 2500,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 2500);
    }

    #[test]
    fn test_image_response_parsing() {
        let parsed: ImageGenerationResponse =
            serde_json::from_str(r#"{"created": 1, "data": [{"url": "https://img/1.png"}]}"#)
                .unwrap();
        assert_eq!(parsed.data[0].url.as_deref(), Some("https://img/1.png"));

        let empty: ImageGenerationResponse = serde_json::from_str(r#"{"created": 1}"#).unwrap();
        assert!(empty.data.is_empty());
    }
}
