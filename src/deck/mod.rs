//! Deck Content Pipeline
//!
//! Generation, normalization and image enrichment of presentation content,
//! plus the service facade that ties generation to rendering.

pub mod generator;
pub mod images;
pub mod normalize;
pub mod service;

pub use generator::ContentGenerator;
pub use images::ImageEnricher;
pub use normalize::{normalize, normalize_deck};
pub use service::{DeckArtifact, PresentationService, content_type_for, download_path};
