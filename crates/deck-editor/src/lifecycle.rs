//! Presentation and slide lifecycle on a `Collection`.
//!
//! Each function checks its inputs before mutating, so an `Err` leaves the
//! collection untouched.

use deck_core::{Background, Collection, EditError, Presentation, PresentationId, Slide};

fn non_blank(value: &str, what: &str) -> Result<(), EditError> {
    if value.trim().is_empty() {
        Err(EditError::validation(format!("{what} must not be empty")))
    } else {
        Ok(())
    }
}

/// Append a new presentation with one default slide. Returns its id, one
/// past the current largest.
pub fn create_presentation(
    collection: &mut Collection,
    name: &str,
    description: &str,
) -> Result<PresentationId, EditError> {
    non_blank(name, "presentation name")?;
    let id = collection.push(Presentation::new(name, description));
    log::info!("created presentation {id} ({name:?})");
    Ok(id)
}

pub fn rename_presentation(
    collection: &mut Collection,
    id: PresentationId,
    name: &str,
) -> Result<(), EditError> {
    non_blank(name, "presentation name")?;
    collection.get_mut(id)?.name = name.to_string();
    Ok(())
}

/// Remove a presentation. Later ids shift down by one.
pub fn delete_presentation(
    collection: &mut Collection,
    id: PresentationId,
) -> Result<Presentation, EditError> {
    let removed = collection.remove(id)?;
    log::info!("deleted presentation {id} ({:?}); {} left", removed.name, collection.len());
    Ok(removed)
}

/// Replace the thumbnail. `None` (nothing usable uploaded) changes nothing.
/// Returns whether the thumbnail changed.
pub fn change_thumbnail(
    collection: &mut Collection,
    id: PresentationId,
    image: Option<String>,
) -> Result<bool, EditError> {
    let presentation = collection.get_mut(id)?;
    match image {
        Some(image) => {
            presentation.thumbnail = image;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Append an empty default slide. Returns the new slide count.
pub fn add_slide(collection: &mut Collection, id: PresentationId) -> Result<usize, EditError> {
    let slides = &mut collection.get_mut(id)?.slides;
    slides.push(Slide::new());
    Ok(slides.len())
}

/// Remove one slide. The only slide of a presentation cannot be removed.
/// Returns the new slide count.
pub fn delete_slide(
    collection: &mut Collection,
    id: PresentationId,
    index: usize,
) -> Result<usize, EditError> {
    let presentation = collection.get_mut(id)?;
    presentation.slide(index)?;
    if presentation.slides.len() == 1 {
        return Err(EditError::LastSlide);
    }
    presentation.slides.remove(index);
    log::debug!("deleted slide {index} of presentation {id}");
    Ok(presentation.slides.len())
}

/// Set one slide's background.
///
/// Slides still on the default background first get `default_color`; then
/// slide `index` gets `slide_color`. Slides that already carry a colour keep
/// it. Afterwards no slide is left on the default.
pub fn set_background(
    collection: &mut Collection,
    id: PresentationId,
    index: usize,
    default_color: &str,
    slide_color: &str,
) -> Result<(), EditError> {
    non_blank(default_color, "default colour")?;
    non_blank(slide_color, "slide colour")?;
    let presentation = collection.get_mut(id)?;
    presentation.slide(index)?;

    let mut backfilled = 0;
    for slide in presentation.slides.iter_mut().filter(|s| s.background.is_default()) {
        slide.background = Background::Color(default_color.to_string());
        backfilled += 1;
    }
    presentation.slide_mut(index)?.background = Background::Color(slide_color.to_string());
    log::debug!("background of slide {index} set to {slide_color}; {backfilled} defaults backfilled");
    Ok(())
}
