//! Presentation Data Model
//!
//! Structured deck content as produced by the model and consumed by renderers.
//! Field names follow the camelCase JSON the model is asked to emit, so the
//! same types serve for response parsing, caching and the `render` command.

use serde::{Deserialize, Serialize};

/// A generated deck: title plus ordered slides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationData {
    pub title: String,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

impl PresentationData {
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Every image element across all slides, as (slide index, element index)
    pub fn image_slots(&self) -> Vec<(usize, usize)> {
        self.slides
            .iter()
            .enumerate()
            .flat_map(|(si, slide)| {
                slide
                    .visual_elements
                    .iter()
                    .flatten()
                    .enumerate()
                    .filter(|(_, el)| el.kind == VisualKind::Image)
                    .map(move |(ei, _)| (si, ei))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    Title,
    /// Unknown or missing types are treated as content slides
    #[default]
    #[serde(other)]
    Content,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    #[serde(rename = "type", default)]
    pub kind: SlideKind,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet_points: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_elements: Option<Vec<VisualElement>>,
}

impl Slide {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            kind: SlideKind::Title,
            title: title.into(),
            subtitle: None,
            bullet_points: None,
            visual_elements: None,
        }
    }

    pub fn content(title: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            kind: SlideKind::Content,
            title: title.into(),
            subtitle: None,
            bullet_points: Some(bullets),
            visual_elements: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_visual(mut self, element: VisualElement) -> Self {
        self.visual_elements.get_or_insert_with(Vec::new).push(element);
        self
    }

    pub fn bullets(&self) -> &[String] {
        self.bullet_points.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualKind {
    Image,
    Chart,
    Diagram,
    Table,
    Icon,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualElement {
    #[serde(rename = "type", default)]
    pub kind: VisualKind,
    #[serde(default)]
    pub description: String,
    /// Local asset reference, set after enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl VisualElement {
    pub fn new(kind: VisualKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            path: None,
        }
    }
}
