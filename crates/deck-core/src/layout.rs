//! Percentage ↔ pixel conversion for slide elements.
//!
//! Element sizes are stored as percentages of the slide so a slide renders
//! the same at any viewport size. This module turns a slide into pixel
//! rectangles for a concrete viewport and back again for resize gestures.

use crate::error::EditError;
use crate::model::{Background, ElementTag, Geometry, Slide};

/// Colour painted behind slides still on the default background.
pub const DEFAULT_FILL: &str = "white";

/// The rendered slide area in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A viewport can only be divided by if both sides are positive.
    pub fn check(self) -> Result<Self, EditError> {
        if self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0 {
            Ok(self)
        } else {
            Err(EditError::validation(format!(
                "container must have a positive size, got {}x{}",
                self.width, self.height
            )))
        }
    }

    /// Convert a pixel size inside this viewport to percentages.
    pub fn to_percent(self, width_px: f64, height_px: f64) -> Result<(f64, f64), EditError> {
        let vp = self.check()?;
        Ok((width_px / vp.width * 100.0, height_px / vp.height * 100.0))
    }

    /// Convert percentages back to a pixel size inside this viewport.
    pub fn to_pixels(self, width_pct: f64, height_pct: f64) -> (f64, f64) {
        (width_pct / 100.0 * self.width, height_pct / 100.0 * self.height)
    }
}

/// An axis-aligned rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Pixel rectangle of an element. Positions are already pixel offsets.
pub fn element_rect(geometry: &Geometry, viewport: Viewport) -> PixelRect {
    let (width, height) = viewport.to_pixels(geometry.width, geometry.height);
    PixelRect {
        x: geometry.x_pos,
        y: geometry.y_pos,
        width,
        height,
    }
}

/// One element placed for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedElement {
    /// Position in the slide's element list.
    pub index: usize,
    pub tag: ElementTag,
    pub rect: PixelRect,
    /// Stacking order; element `i` draws at `i + 1`.
    pub z_index: usize,
    /// Whether drag and resize handles are live.
    pub interactive: bool,
}

/// A slide resolved for one viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideLayout {
    pub fill: String,
    pub elements: Vec<PlacedElement>,
}

/// Resolve a slide into pixel rectangles.
///
/// Editor and preview call this with the same viewport and get identical
/// rectangles; only `interactive` differs.
pub fn layout_slide(slide: &Slide, viewport: Viewport, interactive: bool) -> SlideLayout {
    let fill = match &slide.background {
        Background::Default => DEFAULT_FILL.to_string(),
        Background::Color(c) => c.clone(),
    };
    let elements = slide
        .elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            let rect = element_rect(&element.geometry, viewport);
            log::trace!(
                "LAYOUT {} #{index} at ({:.1}, {:.1}) {:.1}x{:.1}",
                element.tag(),
                rect.x,
                rect.y,
                rect.width,
                rect.height
            );
            PlacedElement {
                index,
                tag: element.tag(),
                rect,
                z_index: index + 1,
                interactive,
            }
        })
        .collect();
    SlideLayout { fill, elements }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, ElementKind};

    fn text(width: f64, height: f64) -> Element {
        Element::new(
            ElementKind::Text {
                text: "hi".into(),
                size: 1.0,
                color: "#000".into(),
                font_family: "Arial".into(),
            },
            Geometry::at_origin(width, height),
        )
    }

    #[test]
    fn percent_pixel_roundtrip() {
        let vp = Viewport::new(1280.0, 720.0);
        let (w, h) = vp.to_percent(320.0, 180.0).unwrap();
        assert!((w - 25.0).abs() < 1e-9);
        assert!((h - 25.0).abs() < 1e-9);
        let (px_w, px_h) = vp.to_pixels(w, h);
        assert!((px_w - 320.0).abs() < 1e-9);
        assert!((px_h - 180.0).abs() < 1e-9);
    }

    #[test]
    fn zero_container_is_rejected() {
        let vp = Viewport::new(0.0, 600.0);
        assert!(matches!(
            vp.to_percent(10.0, 10.0),
            Err(EditError::Validation(_))
        ));
    }

    #[test]
    fn layout_stacks_in_order() {
        let slide = Slide {
            background: Background::Default,
            elements: vec![text(50.0, 50.0), text(10.0, 20.0)],
        };
        let layout = layout_slide(&slide, Viewport::default(), true);
        assert_eq!(layout.fill, DEFAULT_FILL);
        assert_eq!(layout.elements.len(), 2);
        assert_eq!(layout.elements[0].z_index, 1);
        assert_eq!(layout.elements[1].z_index, 2);
        assert_eq!(
            layout.elements[1].rect,
            PixelRect {
                x: 0.0,
                y: 0.0,
                width: 80.0,
                height: 120.0
            }
        );
    }

    #[test]
    fn preview_layout_matches_editor_layout() {
        let slide = Slide {
            background: Background::Color("#445566".into()),
            elements: vec![text(30.0, 40.0)],
        };
        let vp = Viewport::new(1024.0, 768.0);
        let edit = layout_slide(&slide, vp, true);
        let preview = layout_slide(&slide, vp, false);
        assert_eq!(edit.fill, "#445566");
        assert_eq!(edit.fill, preview.fill);
        assert_eq!(edit.elements[0].rect, preview.elements[0].rect);
        assert!(!preview.elements[0].interactive);
    }
}
