//! Scripted providers for pipeline tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use super::{Completion, CompletionRequest, GeneratedImage, ImageProvider, LlmProvider};
use crate::types::{DeckError, Result};

/// Replays canned completions in order; errors once the script runs out
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<String>>,
    calls: AtomicU32,
}

impl ScriptedProvider {
    pub fn new(responses: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
            calls: AtomicU32::new(0),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(&self, _request: &CompletionRequest) -> Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Let concurrent callers interleave like a real network round trip
        tokio::task::yield_now().await;
        let next = self.responses.lock().unwrap().pop_front();
        next.map(Completion::text_only)
            .ok_or_else(|| DeckError::Config("script exhausted".to_string()))
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}

/// Returns the description bytes as the image, failing for descriptions starting with "fail"
pub struct SelectiveImages;

#[async_trait]
impl ImageProvider for SelectiveImages {
    async fn generate_image(&self, description: &str) -> Result<GeneratedImage> {
        if description.starts_with("fail") {
            Err(DeckError::Image("content policy".to_string()))
        } else {
            Ok(GeneratedImage::Bytes(description.as_bytes().to_vec()))
        }
    }

    fn name(&self) -> &str {
        "selective"
    }
}
