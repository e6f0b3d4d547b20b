//! Unified Error Type System
//!
//! Centralized error types for the whole generation and rendering pipeline.
//!
//! ## Propagation
//!
//! - **Generation**: LLM call kept failing after every retry attempt (abort)
//! - **Parse**: no extraction strategy produced JSON (abort, raw text kept)
//! - **Image**: soft failure, logged and dropped by the enricher
//! - **Render**: artifact could not be written (abort rendering)
//!
//! Nothing here is fatal to the process; every error is scoped to one request.

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Diagnostic classification of LLM service failures.
///
/// The retry policy does not branch on the category; it is carried for logs
/// and for callers that want to report a friendlier message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited by the service
    RateLimit,
    /// Authentication failed
    Auth,
    /// Network/connectivity issues
    Network,
    /// Service unavailable or model not found
    Unavailable,
    /// Invalid request
    BadRequest,
    /// Response could not be turned into a deck
    ParseError,
    /// Temporary server issues
    Transient,
    /// Anything else
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Service error with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category for diagnostics
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an HTTP status code returned by a provider
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        match status {
            429 => LlmError::with_provider(ErrorCategory::RateLimit, message, provider),
            401 | 403 => LlmError::with_provider(ErrorCategory::Auth, message, provider),
            400 | 422 => LlmError::with_provider(ErrorCategory::BadRequest, message, provider),
            500 | 502 | 503 | 504 => {
                LlmError::with_provider(ErrorCategory::Transient, message, provider)
            }
            404 => LlmError::with_provider(ErrorCategory::Unavailable, message, provider),
            _ => LlmError::with_provider(ErrorCategory::Unknown, message, provider),
        }
    }

    /// Classify a transport-level reqwest failure
    pub fn classify_transport(err: &reqwest::Error, provider: &str) -> LlmError {
        let category = if err.is_timeout() || err.is_connect() {
            ErrorCategory::Network
        } else if err.is_decode() {
            ErrorCategory::ParseError
        } else {
            ErrorCategory::Unknown
        };
        LlmError::with_provider(category, err.to_string(), provider)
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Structured validation error with context
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub field: Option<String>,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "Validation failed for '{}': {}", field, self.message)
        } else {
            write!(f, "Validation failed: {}", self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn missing(field: &str) -> Self {
        Self::new(ValidationErrorKind::MissingField, format!("{} is required", field))
            .with_field(field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Required field missing or blank
    MissingField,
    /// Value out of range
    Range,
    /// Structure of generated content is unusable
    Content,
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum DeckError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(ValidationError),

    // -------------------------------------------------------------------------
    // Generation Errors
    // -------------------------------------------------------------------------
    #[error("LLM error: {0}")]
    Llm(LlmError),

    /// Retry budget exhausted; carries the last observed failure
    #[error("Failed to generate presentation content after {attempts} attempts: {source}")]
    Generation {
        attempts: u32,
        #[source]
        source: Box<DeckError>,
    },

    /// No extraction strategy produced JSON
    #[error("Failed to parse model response: {message}")]
    Parse { message: String, raw: String },

    // -------------------------------------------------------------------------
    // Asset / Output Errors
    // -------------------------------------------------------------------------
    /// Soft failure; the enricher logs these and omits the asset path
    #[error("Image generation failed: {0}")]
    Image(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl From<LlmError> for DeckError {
    fn from(err: LlmError) -> Self {
        DeckError::Llm(err)
    }
}

impl From<ValidationError> for DeckError {
    fn from(err: ValidationError) -> Self {
        DeckError::Validation(err)
    }
}

impl From<zip::result::ZipError> for DeckError {
    fn from(err: zip::result::ZipError) -> Self {
        DeckError::Render(format!("zip: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;

impl DeckError {
    pub fn parse(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            raw: raw.into(),
        }
    }

    /// Category of the underlying service failure, unwrapping retry exhaustion
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Llm(e) => e.category,
            Self::Generation { source, .. } => source.category(),
            Self::Parse { .. } | Self::Json(_) => ErrorCategory::ParseError,
            Self::Validation(_) => ErrorCategory::ParseError,
            _ => ErrorCategory::Unknown,
        }
    }
}

/// Context extension trait for mapping foreign errors into render failures
pub trait ResultExt<T> {
    fn render_context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn render_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| DeckError::Render(format!("{}: {}", context.into(), e)))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::ParseError.to_string(), "PARSE_ERROR");
        assert_eq!(ErrorCategory::Auth.to_string(), "AUTH");
    }

    #[test]
    fn test_classify_http_status() {
        let rate_limit = ErrorClassifier::classify_http_status(429, "Rate limited", "test");
        assert_eq!(rate_limit.category, ErrorCategory::RateLimit);

        let auth = ErrorClassifier::classify_http_status(401, "Unauthorized", "test");
        assert_eq!(auth.category, ErrorCategory::Auth);

        let server_error = ErrorClassifier::classify_http_status(503, "Overloaded", "test");
        assert_eq!(server_error.category, ErrorCategory::Transient);

        let teapot = ErrorClassifier::classify_http_status(418, "?", "test");
        assert_eq!(teapot.category, ErrorCategory::Unknown);
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::with_provider(ErrorCategory::RateLimit, "Too many requests", "openai");
        assert_eq!(err.to_string(), "[openai:RATE_LIMIT] Too many requests");

        let err_no_provider = LlmError::new(ErrorCategory::Network, "Connection failed");
        assert_eq!(err_no_provider.to_string(), "[NETWORK] Connection failed");
    }

    #[test]
    fn test_generation_error_keeps_cause() {
        let err = DeckError::Generation {
            attempts: 3,
            source: Box::new(DeckError::parse("no JSON found", "garbage")),
        };
        let msg = err.to_string();
        assert!(msg.contains("3 attempts"));
        assert!(msg.contains("no JSON found"));
        assert_eq!(err.category(), ErrorCategory::ParseError);
    }

    #[test]
    fn test_validation_missing_field() {
        let err = ValidationError::missing("theme");
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
        assert_eq!(err.to_string(), "Validation failed for 'theme': theme is required");
    }
}
