//! Presentation Requests
//!
//! `PresentationRequestInput` is the partially-filled shape that arrives from
//! callers. `PresentationRequest::from_input` merges defaults once and yields
//! an immutable, fully-populated value before any component sees it.

use serde::{Deserialize, Serialize};

use super::error::{Result, ValidationError, ValidationErrorKind};
use crate::constants::request as defaults;

/// Output format of the rendered artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Paginated document (PDF)
    Document,
    /// Editable slide deck (PPTX)
    #[default]
    Deck,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Document => "pdf",
            OutputFormat::Deck => "pptx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Document => "application/pdf",
            OutputFormat::Deck => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }

    /// Lenient parse used for caller input: anything unrecognised is a deck
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" | "document" => Ok(OutputFormat::Document),
            "pptx" | "deck" => Ok(OutputFormat::Deck),
            _ => Err(format!("Invalid format '{}'. Valid values: pdf, pptx", s)),
        }
    }
}

/// Caller-supplied request with every field optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationRequestInput {
    pub theme: Option<String>,
    pub slide_count: Option<u32>,
    pub audience: Option<String>,
    pub additional_info: Option<String>,
    pub style: Option<String>,
    pub format: Option<String>,
}

/// Fully-populated, immutable request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationRequest {
    theme: String,
    slide_count: u32,
    audience: String,
    additional_info: String,
    style: String,
    format: OutputFormat,
}

impl PresentationRequest {
    /// Request for `theme` with every other field defaulted
    pub fn new(theme: impl Into<String>) -> Result<Self> {
        Self::from_input(PresentationRequestInput {
            theme: Some(theme.into()),
            ..Default::default()
        })
    }

    /// Merge defaults into caller input
    pub fn from_input(input: PresentationRequestInput) -> Result<Self> {
        let theme = input
            .theme
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ValidationError::missing("theme"))?;

        let slide_count = checked_slide_count(input.slide_count.unwrap_or(defaults::SLIDE_COUNT))?;

        Ok(Self {
            theme,
            slide_count,
            audience: non_blank(input.audience).unwrap_or_else(|| defaults::AUDIENCE.to_string()),
            additional_info: input.additional_info.unwrap_or_default(),
            style: non_blank(input.style).unwrap_or_else(|| defaults::STYLE.to_string()),
            format: input
                .format
                .as_deref()
                .map(OutputFormat::parse_lenient)
                .unwrap_or_default(),
        })
    }

    /// Same range rule as `from_input`: zero slides is rejected
    pub fn with_slide_count(mut self, count: u32) -> Result<Self> {
        self.slide_count = checked_slide_count(count)?;
        Ok(self)
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    pub fn with_additional_info(mut self, info: impl Into<String>) -> Self {
        self.additional_info = info.into();
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn slide_count(&self) -> u32 {
        self.slide_count
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn additional_info(&self) -> &str {
        &self.additional_info
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

fn checked_slide_count(count: u32) -> Result<u32> {
    if count == 0 {
        return Err(ValidationError::new(
            ValidationErrorKind::Range,
            "slide count must be at least 1",
        )
        .with_field("slideCount")
        .into());
    }
    Ok(count)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
