//! Slidesmith - AI-Driven Slide Deck Generator
//!
//! Turns a theme, audience and slide count into a structured deck via an
//! LLM, optionally illustrates it with generated images, and renders it as
//! a PDF document or a PPTX deck.
//!
//! ## Quick Start
//!
//! ```ignore
//! use slidesmith::{ConfigLoader, PresentationRequest, PresentationService};
//!
//! let config = ConfigLoader::load()?;
//! let service = PresentationService::from_config(&config)?;
//! let request = PresentationRequest::new("Climate Change")?.with_audience("Students");
//! let artifact = service.create(&request).await?;
//! println!("{}", artifact.download_path);
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: Prompt building, retry policy, JSON extraction, providers
//! - [`deck`]: Content generation, normalization, image enrichment
//! - [`render`]: Themes, shared layout, PDF and PPTX backends
//! - [`storage`]: Content cache
//! - [`config`]: Layered configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod deck;
pub mod render;
pub mod storage;
pub mod types;

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{DeckError, ErrorCategory, Result, ResultExt};

// Data Model
pub use types::{
    OutputFormat, PresentationData, PresentationRequest, PresentationRequestInput, Slide,
    SlideKind, VisualElement, VisualKind,
};

// Pipeline
pub use deck::{ContentGenerator, DeckArtifact, ImageEnricher, PresentationService};
pub use render::{Renderer, StyleName, Theme, render_to_file};
pub use storage::{CacheStore, FileCacheStore, MemoryCacheStore, SharedCache};

// Providers
pub use ai::{ImageProvider, LlmProvider, OpenAiProvider};
