//! Content Generation
//!
//! Request → cached or freshly generated `PresentationData`.
//!
//! ## Pipeline
//!
//! 1. Cache lookup by derived key; a hit is returned as stored
//! 2. Deck prompt built from the request
//! 3. Retried attempt: completion → JSON extraction → deck decoding →
//!    normalization → validation. A malformed response fails the attempt
//!    and the model is queried again.
//! 4. Image elements enriched concurrently; failures leave `path` unset
//! 5. Result written to the cache (best effort)

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::images::ImageEnricher;
use super::normalize::normalize_deck;
use crate::ai::{
    CompletionRequest, PromptTemplates, ResponseParser, RetryPolicy, SYSTEM_INSTRUCTION,
    SharedProvider,
};
use crate::constants::generation;
use crate::storage::{SharedCache, cache_key};
use crate::types::{
    DeckError, PresentationData, PresentationRequest, Result, ValidationError,
    ValidationErrorKind,
};

pub struct ContentGenerator {
    provider: SharedProvider,
    cache: SharedCache,
    enricher: Option<Arc<ImageEnricher>>,
    retry: RetryPolicy,
    parser: ResponseParser,
    temperature: f32,
    max_tokens: usize,
}

impl ContentGenerator {
    pub fn new(provider: SharedProvider, cache: SharedCache) -> Self {
        Self {
            provider,
            cache,
            enricher: None,
            retry: RetryPolicy::default(),
            parser: ResponseParser::new(),
            temperature: generation::TEMPERATURE,
            max_tokens: generation::MAX_TOKENS,
        }
    }

    pub fn with_enricher(mut self, enricher: Arc<ImageEnricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: usize) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub async fn generate(&self, request: &PresentationRequest) -> Result<PresentationData> {
        let key = cache_key(request);

        match self.cache.get(&key).await {
            Ok(Some(data)) => {
                info!(key = %key, "Cache hit");
                return Ok(data);
            }
            Ok(None) => info!(key = %key, "Cache miss, generating deck"),
            Err(e) => warn!(key = %key, error = %e, "Cache read failed, generating deck"),
        }

        let completion_request = CompletionRequest {
            system: SYSTEM_INSTRUCTION.to_string(),
            prompt: PromptTemplates::deck(request),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let generator = self;
        let completion_request = &completion_request;
        let mut data = self
            .retry
            .run("deck generation", move |attempt| {
                generator.attempt(completion_request, attempt)
            })
            .await?;

        self.enrich_images(&mut data).await;

        if let Err(e) = self.cache.put(&key, &data).await {
            warn!(key = %key, error = %e, "Failed to write cache entry");
        }

        info!(
            title = %data.title,
            slides = data.slide_count(),
            "Deck generated"
        );
        Ok(data)
    }

    async fn attempt(&self, request: &CompletionRequest, attempt: u32) -> Result<PresentationData> {
        debug!(
            attempt,
            provider = self.provider.name(),
            model = self.provider.model(),
            "Requesting deck content"
        );

        let completion = self.provider.complete(request).await?;
        let value = self.parser.extract(&completion.text)?;

        let mut data: PresentationData = serde_json::from_value(value).map_err(|e| {
            DeckError::parse(format!("response is not a deck: {}", e), &completion.text)
        })?;

        normalize_deck(&mut data);
        validate_deck(&data)?;
        Ok(data)
    }

    async fn enrich_images(&self, data: &mut PresentationData) {
        let Some(enricher) = &self.enricher else {
            return;
        };

        let jobs: Vec<(usize, usize, String)> = data
            .image_slots()
            .into_iter()
            .filter_map(|(si, ei)| {
                let element = data.slides[si].visual_elements.as_ref()?.get(ei)?;
                Some((si, ei, element.description.clone()))
            })
            .collect();

        if jobs.is_empty() {
            return;
        }

        info!(images = jobs.len(), "Enriching image elements");
        let results = join_all(jobs.iter().map(|(_, _, desc)| enricher.enrich(desc))).await;

        for ((si, ei, _), path) in jobs.iter().zip(results) {
            if let Some(element) = data.slides[*si]
                .visual_elements
                .as_mut()
                .and_then(|elements| elements.get_mut(*ei))
            {
                element.path = path;
            }
        }
    }
}

/// Deck title, at least one slide, and a title on every slide
fn validate_deck(data: &PresentationData) -> Result<()> {
    if data.title.is_empty() {
        return Err(ValidationError::new(ValidationErrorKind::Content, "deck title is empty")
            .with_field("title")
            .into());
    }

    if data.slides.is_empty() {
        return Err(
            ValidationError::new(ValidationErrorKind::Content, "deck has no slides")
                .with_field("slides")
                .into(),
        );
    }

    if let Some(index) = data.slides.iter().position(|s| s.title.is_empty()) {
        return Err(
            ValidationError::new(ValidationErrorKind::Content, "slide title is empty")
                .with_field(format!("slides[{}].title", index))
                .into(),
        );
    }

    Ok(())
}
