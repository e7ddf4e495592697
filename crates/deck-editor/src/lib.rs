//! Editing on top of `deck-core` and `deck-store`.
//!
//! `DeckSession` owns the loaded collection and turns each user action into
//! one load, apply, validate, save cycle. The pure pieces it drives
//! (`lifecycle`, `elements`, `navigator`) also work on a bare `Collection`.

pub mod elements;
pub mod lifecycle;
pub mod location;
pub mod navigator;
pub mod preview;
pub mod session;

pub use elements::{
    CodeDraft, ElementDraft, ElementEdit, GeometryUpdate, ImageDraft, ResizeGesture, TextDraft,
    VideoDraft, apply_geometry,
};
pub use location::{EditLocation, Location, PreviewLocation};
pub use navigator::{NavKey, SlideNavigator};
pub use preview::PreviewSession;
pub use session::{DeckSession, SessionConfig, SessionError};
