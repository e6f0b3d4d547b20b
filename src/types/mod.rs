pub mod error;
pub mod presentation;
pub mod request;

pub use error::{
    DeckError, ErrorCategory, ErrorClassifier, LlmError, Result, ResultExt, ValidationError,
    ValidationErrorKind,
};
pub use presentation::{PresentationData, Slide, SlideKind, VisualElement, VisualKind};
pub use request::{OutputFormat, PresentationRequest, PresentationRequestInput};
