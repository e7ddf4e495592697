//! Current-slide tracking for one open presentation.

use crate::location::EditLocation;
use deck_core::{EditError, PresentationId};

/// Arrow keys the editor and preview react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Left,
    Right,
}

/// Position within one presentation's slide list.
///
/// `current < len` always holds, and `len >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideNavigator {
    presentation: PresentationId,
    current: usize,
    len: usize,
}

impl SlideNavigator {
    /// Start at `current` in a presentation of `len` slides.
    pub fn new(presentation: PresentationId, current: usize, len: usize) -> Result<Self, EditError> {
        if current >= len {
            return Err(EditError::SlideOutOfRange { index: current, len });
        }
        Ok(Self {
            presentation,
            current,
            len,
        })
    }

    pub fn presentation(&self) -> PresentationId {
        self.presentation
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn slide_count(&self) -> usize {
        self.len
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.len
    }

    /// Step back one slide. Returns whether the position changed.
    pub fn back(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Step forward one slide. Returns whether the position changed.
    pub fn forward(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn handle_key(&mut self, key: NavKey) -> bool {
        match key {
            NavKey::Left => self.back(),
            NavKey::Right => self.forward(),
        }
    }

    pub fn jump_to(&mut self, index: usize) -> Result<(), EditError> {
        if index >= self.len {
            return Err(EditError::SlideOutOfRange {
                index,
                len: self.len,
            });
        }
        self.current = index;
        Ok(())
    }

    /// A slide was appended. The position stays put.
    pub(crate) fn slide_added(&mut self, new_len: usize) {
        self.sync_len(new_len);
    }

    /// Slide `deleted` was removed, leaving `new_len` slides.
    ///
    /// Deleting the current slide moves to the new last slide if it was the
    /// last one, stays at 0 if it was the first, and otherwise moves to the
    /// previous slide. Deleting an earlier slide keeps the same slide in view.
    pub(crate) fn slide_deleted(&mut self, deleted: usize, new_len: usize) {
        if deleted < self.current {
            self.current -= 1;
        } else if deleted == self.current {
            let was_last = self.current + 1 == self.len;
            if was_last {
                self.current = new_len.saturating_sub(1);
            } else if self.current > 0 {
                self.current -= 1;
            }
        }
        self.sync_len(new_len);
    }

    /// Adopt a slide count that changed underneath (a reload after another
    /// writer). Clamps the position back into range.
    pub(crate) fn sync_len(&mut self, new_len: usize) {
        self.len = new_len.max(1);
        self.current = self.current.min(self.len - 1);
    }

    pub fn location(&self) -> EditLocation {
        EditLocation {
            presentation: self.presentation,
            slide: self.current,
        }
    }
}
