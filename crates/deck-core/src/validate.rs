//! Structural checks for a collection.
//!
//! Reports violations without modifying the collection. Run before every
//! save so a malformed document never reaches the remote store.

use crate::id::PresentationId;
use crate::model::{Collection, Element, ElementKind};
use std::fmt;

/// A single structural violation.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The presentation this violation refers to.
    pub presentation: PresentationId,
    /// Slide index, when the violation is inside a slide.
    pub slide: Option<usize>,
    /// Element index, when the violation is inside an element.
    pub element: Option<usize>,
    /// Short rule identifier (e.g. "empty-slides", "geometry").
    pub rule: &'static str,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "presentation {}", self.presentation)?;
        if let Some(s) = self.slide {
            write!(f, ", slide {}", s + 1)?;
        }
        if let Some(e) = self.element {
            write!(f, ", element {e}")?;
        }
        write!(f, ": {} [{}]", self.message, self.rule)
    }
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run every rule over the collection.
pub fn validate(collection: &Collection) -> Result<(), Vec<Violation>> {
    let mut found = Vec::new();
    check_contiguous_ids(collection, &mut found);
    check_slides(collection, &mut found);
    if found.is_empty() { Ok(()) } else { Err(found) }
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Ids must be exactly `1..=len`.
fn check_contiguous_ids(collection: &Collection, found: &mut Vec<Violation>) {
    for (pos, id) in collection.ids().enumerate() {
        let expected = PresentationId::from_position(pos);
        if id != expected {
            found.push(Violation {
                presentation: id,
                slide: None,
                element: None,
                rule: "non-contiguous-id",
                message: format!("expected id {expected}, found {id}"),
            });
        }
    }
}

fn check_slides(collection: &Collection, found: &mut Vec<Violation>) {
    for (id, pres) in collection.iter() {
        if pres.slides.is_empty() {
            found.push(Violation {
                presentation: id,
                slide: None,
                element: None,
                rule: "empty-slides",
                message: "presentation has no slides".into(),
            });
        }
        for (s, slide) in pres.slides.iter().enumerate() {
            for (e, element) in slide.elements.iter().enumerate() {
                for (rule, message) in element_problems(element) {
                    found.push(Violation {
                        presentation: id,
                        slide: Some(s),
                        element: Some(e),
                        rule,
                        message,
                    });
                }
            }
        }
    }
}

/// Geometry must be finite with a non-negative size. Sizes above 100% and
/// positions outside the slide are allowed: drags are not clamped.
fn element_problems(element: &Element) -> Vec<(&'static str, String)> {
    let mut problems = Vec::new();
    let g = &element.geometry;
    if ![g.x_pos, g.y_pos, g.width, g.height].iter().all(|v| v.is_finite()) {
        problems.push(("geometry", "geometry must be finite".to_string()));
    } else if g.width < 0.0 || g.height < 0.0 {
        problems.push((
            "geometry",
            format!("negative size {}x{}", g.width, g.height),
        ));
    }

    let blank = |s: &str| s.trim().is_empty();
    match &element.kind {
        ElementKind::Text { color, size, .. } => {
            if blank(color) {
                problems.push(("malformed-element", "text element without a colour".into()));
            }
            if !(size.is_finite() && *size > 0.0) {
                problems.push(("malformed-element", format!("invalid font size {size}")));
            }
        }
        ElementKind::Image { image, .. } => {
            if blank(image) {
                problems.push(("malformed-element", "image element without a source".into()));
            }
        }
        ElementKind::Video { link, .. } => {
            if blank(link) {
                problems.push(("malformed-element", "video element without a link".into()));
            }
        }
        ElementKind::Code { size, .. } => {
            if !(size.is_finite() && *size > 0.0) {
                problems.push(("malformed-element", format!("invalid font size {size}")));
            }
        }
    }
    problems
}
