//! Read-only presentation view.
//!
//! A preview owns its snapshot. Edits made in the editor after the preview
//! opened are not visible here, and nothing here can change the snapshot.

use crate::elements::{ElementDraft, ElementEdit};
use crate::location::PreviewLocation;
use crate::navigator::{NavKey, SlideNavigator};
use deck_core::{EditError, Presentation, PresentationId, Slide, SlideLayout, Viewport, layout_slide};

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSession {
    snapshot: Presentation,
    navigator: SlideNavigator,
}

impl PreviewSession {
    pub fn open(id: PresentationId, snapshot: Presentation, start: usize) -> Result<Self, EditError> {
        let navigator = SlideNavigator::new(id, start, snapshot.slides.len())?;
        Ok(Self { snapshot, navigator })
    }

    pub fn from_location(location: PreviewLocation) -> Result<Self, EditError> {
        Self::open(location.presentation, location.snapshot, location.slide)
    }

    pub fn presentation(&self) -> &Presentation {
        &self.snapshot
    }

    pub fn navigator(&self) -> &SlideNavigator {
        &self.navigator
    }

    pub fn current_slide(&self) -> &Slide {
        // The navigator is built from this snapshot's length and never resized.
        &self.snapshot.slides[self.navigator.current()]
    }

    pub fn back(&mut self) -> bool {
        self.navigator.back()
    }

    pub fn forward(&mut self) -> bool {
        self.navigator.forward()
    }

    pub fn handle_key(&mut self, key: NavKey) -> bool {
        self.navigator.handle_key(key)
    }

    /// Layout of the current slide. Same rectangles as the editor, nothing
    /// interactive.
    pub fn layout(&self, viewport: Viewport) -> SlideLayout {
        layout_slide(self.current_slide(), viewport, false)
    }

    /// Shareable location of the current slide, snapshot included.
    pub fn location(&self) -> PreviewLocation {
        PreviewLocation {
            presentation: self.navigator.presentation(),
            slide: self.navigator.current(),
            snapshot: self.snapshot.clone(),
        }
    }

    pub fn add_element(&mut self, _draft: ElementDraft) -> Result<usize, EditError> {
        Err(EditError::ReadOnly)
    }

    pub fn edit_element(&mut self, _edit: ElementEdit) -> Result<(), EditError> {
        Err(EditError::ReadOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Element, ElementKind, Geometry};
    use pretty_assertions::assert_eq;

    fn snapshot() -> Presentation {
        let mut p = Presentation::new("Demo", "");
        p.slides.push(Slide::new());
        p.slides[1].elements.push(Element::new(
            ElementKind::Video {
                link: "https://youtube.com/embed/x".into(),
                autoplay: false,
            },
            Geometry::at_origin(50.0, 50.0),
        ));
        p
    }

    #[test]
    fn navigates_within_snapshot() {
        let mut preview = PreviewSession::open(PresentationId::FIRST, snapshot(), 0).unwrap();
        assert!(preview.current_slide().elements.is_empty());
        assert!(preview.handle_key(NavKey::Right));
        assert!(!preview.forward());

        let layout = preview.layout(Viewport::default());
        assert_eq!(layout.elements.len(), 1);
        assert!(!layout.elements[0].interactive);
    }

    #[test]
    fn edits_are_refused() {
        let mut preview = PreviewSession::open(PresentationId::FIRST, snapshot(), 1).unwrap();
        let before = preview.clone();
        assert_eq!(
            preview.edit_element(ElementEdit::Delete { index: 0 }),
            Err(EditError::ReadOnly)
        );
        assert_eq!(preview, before);
    }

    #[test]
    fn location_roundtrips() {
        let preview = PreviewSession::open(PresentationId::FIRST, snapshot(), 1).unwrap();
        let reopened = PreviewSession::from_location(preview.location().to_string().parse().unwrap()).unwrap();
        assert_eq!(reopened, preview);
    }
}
