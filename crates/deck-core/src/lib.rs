pub mod error;
pub mod id;
pub mod image;
pub mod language;
pub mod layout;
pub mod model;
pub mod validate;

pub use error::EditError;
pub use id::PresentationId;
pub use image::{ImageFile, to_data_url};
pub use language::{CodeLanguage, HeuristicDetector, LanguageDetector};
pub use layout::{PlacedElement, SlideLayout, Viewport, layout_slide};
pub use model::*;
pub use validate::{Violation, validate};
