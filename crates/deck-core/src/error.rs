//! Errors raised by document edits.
//!
//! Every edit validates before it mutates, so an `Err` always leaves the
//! document exactly as it was.

use crate::id::PresentationId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Malformed element input or an image source exclusivity violation.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Code whose detected language is outside the supported set.
    #[error("unsupported code language: {0}")]
    UnsupportedLanguage(String),

    #[error("cannot delete the only slide of a presentation")]
    LastSlide,

    #[error("presentation {0} does not exist")]
    PresentationNotFound(PresentationId),

    #[error("slide {index} is out of range (presentation has {len} slides)")]
    SlideOutOfRange { index: usize, len: usize },

    #[error("element {index} is out of range (slide has {len} elements)")]
    ElementOutOfRange { index: usize, len: usize },

    /// A text-only edit aimed at another element kind.
    #[error("element {index} is a {found} element, not text")]
    NotText { index: usize, found: String },

    /// A code-only edit aimed at another element kind.
    #[error("element {index} is a {found} element, not code")]
    NotCode { index: usize, found: String },

    #[error("preview is read-only")]
    ReadOnly,

    #[error("invalid location: {0}")]
    InvalidLocation(String),
}

impl EditError {
    pub fn validation(msg: impl Into<String>) -> Self {
        EditError::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, EditError>;
