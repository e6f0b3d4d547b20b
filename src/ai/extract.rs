//! Structured Response Extraction
//!
//! Pulls a JSON document out of free-form model output.
//!
//! Strategies run in order and the first success wins:
//! 1. The whole text is JSON
//! 2. The greedy outermost-brace span, first `{` through last `}`
//! 3. The body of a ``` fenced block, optionally tagged `json`
//!
//! A failing strategy is recorded and the next one tried. Only when every
//! strategy fails is a `DeckError::Parse` raised, carrying the raw text.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::generation::RAW_PREVIEW_CHARS;
use crate::types::{DeckError, Result};

static OUTER_BRACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("static regex"));

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("static regex"));

/// One way of locating JSON inside a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    WholeText,
    OuterBraces,
    FencedBlock,
}

impl ExtractionStrategy {
    pub const ORDERED: [ExtractionStrategy; 3] = [
        ExtractionStrategy::WholeText,
        ExtractionStrategy::OuterBraces,
        ExtractionStrategy::FencedBlock,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExtractionStrategy::WholeText => "whole-text",
            ExtractionStrategy::OuterBraces => "outer-braces",
            ExtractionStrategy::FencedBlock => "fenced-block",
        }
    }

    /// Candidate substring this strategy would parse
    fn candidate<'a>(&self, raw: &'a str) -> Option<&'a str> {
        match self {
            ExtractionStrategy::WholeText => Some(raw),
            ExtractionStrategy::OuterBraces => OUTER_BRACES.find(raw).map(|m| m.as_str()),
            ExtractionStrategy::FencedBlock => FENCED_BLOCK
                .captures(raw)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str()),
        }
    }

    pub fn attempt(&self, raw: &str) -> std::result::Result<Value, String> {
        let candidate = self
            .candidate(raw)
            .ok_or_else(|| format!("{}: no match", self.name()))?;
        serde_json::from_str::<Value>(candidate).map_err(|e| format!("{}: {}", self.name(), e))
    }
}

/// Ordered-strategy JSON extractor
#[derive(Debug, Clone)]
pub struct ResponseParser {
    strategies: Vec<ExtractionStrategy>,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseParser {
    pub fn new() -> Self {
        Self {
            strategies: ExtractionStrategy::ORDERED.to_vec(),
        }
    }

    pub fn extract(&self, raw: &str) -> Result<Value> {
        let mut failures = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            match strategy.attempt(raw) {
                Ok(value) => {
                    debug!(strategy = strategy.name(), "Extracted JSON from response");
                    return Ok(value);
                }
                Err(reason) => failures.push(reason),
            }
        }

        warn!(
            preview = %preview(raw),
            "No extraction strategy produced valid JSON"
        );
        Err(DeckError::parse(failures.join("; "), raw))
    }
}

/// Convenience wrapper over the default parser
pub fn extract_json_from_response(raw: &str) -> Result<Value> {
    ResponseParser::new().extract(raw)
}

fn preview(raw: &str) -> String {
    raw.chars().take(RAW_PREVIEW_CHARS).collect()
}
