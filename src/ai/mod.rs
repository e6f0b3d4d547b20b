//! AI Integration Layer
//!
//! Prompt construction, model providers, retry policy and response extraction
//! for deck generation.

pub mod extract;
pub mod prompt;
pub mod provider;
pub mod retry;

pub use extract::{ExtractionStrategy, ResponseParser, extract_json_from_response};
pub use prompt::{PromptBuilder, PromptSection, PromptTemplates, SYSTEM_INSTRUCTION};
pub use provider::{
    Completion, CompletionRequest, GeneratedImage, ImageProvider, LlmProvider, OpenAiProvider,
    SharedImageProvider, SharedProvider, TokenUsage, create_providers,
};
pub use retry::{BackoffFn, RetryPolicy, exponential_backoff};
