//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Request defaults applied before generation
pub mod request {
    /// Slides requested when the caller gives no count
    pub const SLIDE_COUNT: u32 = 10;

    /// Audience used when the caller gives none
    pub const AUDIENCE: &str = "General audience";

    /// Style name used when the caller gives none
    pub const STYLE: &str = "default";
}

/// Retry policy constants
pub mod retry {
    /// Attempts per generation (first try included)
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 1000;
}

/// LLM sampling constants
pub mod generation {
    /// Default chat model
    pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

    /// Sampling temperature
    pub const TEMPERATURE: f32 = 0.7;

    /// Maximum output tokens per completion
    pub const MAX_TOKENS: usize = 2500;

    /// Characters of a raw response kept in parse error previews
    pub const RAW_PREVIEW_CHARS: usize = 200;
}

/// Image generation constants
pub mod image {
    /// Default image model
    pub const DEFAULT_MODEL: &str = "dall-e-2";

    /// Requested image size
    pub const DEFAULT_SIZE: &str = "1024x1024";

    /// Public URL prefix under which stored assets are served
    pub const URL_PREFIX: &str = "/images";
}

/// Filesystem layout defaults
pub mod paths {
    pub const CACHE_DIR: &str = "cache";
    pub const IMAGES_DIR: &str = "public/images";
    pub const OUTPUT_DIR: &str = "output";

    /// Route prefix the transport layer serves artifacts from
    pub const DOWNLOAD_ROUTE: &str = "/api/presentation/download";
}

/// Layout constants shared by both renderers (points)
pub mod layout {
    /// Gap between the header baseline area and the first bullet
    pub const HEADER_GAP: f32 = 20.0;

    /// Vertical spacing added after each bullet item
    pub const BULLET_SPACING: f32 = 12.0;

    /// Horizontal offset of the marker centre from the margin
    pub const MARKER_OFFSET: f32 = 6.0;

    /// Marker radius
    pub const MARKER_RADIUS: f32 = 3.0;

    /// Horizontal offset of bullet text from the margin
    pub const BULLET_TEXT_INDENT: f32 = 16.0;

    /// Line height as a multiple of font size
    pub const LINE_HEIGHT: f32 = 1.2;

    /// Baseline offset below a text box top, as a multiple of font size (Helvetica ascender)
    pub const TEXT_ASCENT: f32 = 0.718;

    /// Width of a glyph missing from the width table, in 1/1000 em
    pub const FALLBACK_GLYPH_WIDTH: u16 = 556;

    /// A4 landscape in points
    pub const DOCUMENT_WIDTH: f32 = 841.89;
    pub const DOCUMENT_HEIGHT: f32 = 595.28;
    pub const DOCUMENT_MARGIN: f32 = 40.0;

    /// 16:9 slide in points (10in x 5.625in)
    pub const DECK_WIDTH: f32 = 720.0;
    pub const DECK_HEIGHT: f32 = 405.0;
    pub const DECK_MARGIN: f32 = 36.0;

    /// English Metric Units per point
    pub const EMU_PER_POINT: i64 = 12_700;
}

/// Metadata written into rendered artifacts
pub mod artifact {
    pub const AUTHOR: &str = "AI Presentation Generator";
    pub const FILE_PREFIX: &str = "presentation";
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Timeout for downloading a generated image (seconds)
    pub const IMAGE_DOWNLOAD_TIMEOUT_SECS: u64 = 60;
}
