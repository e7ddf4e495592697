//! Element editor: add, move, resize, delete, and attribute edits on one
//! slide's element list.
//!
//! New elements start as an `ElementDraft`, one variant per element kind,
//! each with its own validator. Every check runs before the slide is
//! touched, so a rejected draft or edit leaves the slide unchanged.
//!
//! Geometry updates arrive once per completed gesture (drag end, resize
//! end), never per intermediate frame. `apply_geometry` is the pure core of
//! both; the caller persists once afterwards.

use deck_core::language::resolve_language;
use deck_core::model::*;
use deck_core::{EditError, LanguageDetector, Viewport};

// ─── Drafts ──────────────────────────────────────────────────────────────

/// Input for a new text element.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraft {
    pub text: String,
    /// Font size in em.
    pub size: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
}

/// Input for a new image element. Exactly one of `upload` and `url` must be
/// given.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDraft {
    /// `None` when no file was chosen. Otherwise the file's data URL, or
    /// `Some(None)` when the file is not a JPEG or PNG. An unusable file still
    /// counts as given, so it cannot be combined with `url`.
    pub upload: Option<Option<String>>,
    /// External image URL. Blank counts as not given.
    pub url: String,
    pub description: String,
    pub width: f64,
    pub height: f64,
}

/// Input for a new video element.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDraft {
    pub link: String,
    pub width: f64,
    pub height: f64,
    pub autoplay: bool,
}

/// Input for a new code element. The language is detected, not chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeDraft {
    pub code: String,
    /// Font size in em.
    pub size: f64,
    pub width: f64,
    pub height: f64,
}

/// A new element before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementDraft {
    Text(TextDraft),
    Image(ImageDraft),
    Video(VideoDraft),
    Code(CodeDraft),
}

impl ElementDraft {
    pub fn tag(&self) -> ElementTag {
        match self {
            ElementDraft::Text(_) => ElementTag::Text,
            ElementDraft::Image(_) => ElementTag::Image,
            ElementDraft::Video(_) => ElementTag::Video,
            ElementDraft::Code(_) => ElementTag::Code,
        }
    }

    /// Build a draft from named form fields.
    ///
    /// Field names follow the add-element forms: `text`, `size`, `width`,
    /// `height`, `colour` (or `color`), `url`, `description`, `link`,
    /// `autoplay`, `code`. `upload` is the chosen image file, if any, as
    /// `to_data_url` encoded it.
    /// A required field that is absent or blank is a `Validation` error.
    pub fn from_fields<'a>(
        tag: ElementTag,
        field: impl Fn(&str) -> Option<&'a str>,
        upload: Option<Option<String>>,
    ) -> Result<Self, EditError> {
        let text = |name: &str| -> Result<String, EditError> {
            field(name)
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
                .ok_or_else(|| EditError::validation(format!("{tag} element needs `{name}`")))
        };
        let number = |name: &str| -> Result<f64, EditError> {
            let raw = text(name)?;
            raw.trim()
                .parse()
                .map_err(|_| EditError::validation(format!("`{name}` must be a number, got `{raw}`")))
        };
        let optional = |name: &str| field(name).unwrap_or_default().to_string();

        Ok(match tag {
            ElementTag::Text => ElementDraft::Text(TextDraft {
                text: text("text")?,
                size: number("size")?,
                width: number("width")?,
                height: number("height")?,
                color: text("colour").or_else(|_| text("color"))?,
            }),
            ElementTag::Image => ElementDraft::Image(ImageDraft {
                upload,
                url: optional("url"),
                description: optional("description"),
                width: number("width")?,
                height: number("height")?,
            }),
            ElementTag::Video => ElementDraft::Video(VideoDraft {
                link: text("link")?,
                width: number("width")?,
                height: number("height")?,
                autoplay: field("autoplay").is_some_and(|v| !matches!(v, "" | "false" | "off")),
            }),
            ElementTag::Code => ElementDraft::Code(CodeDraft {
                code: text("code")?,
                size: number("size")?,
                width: number("width")?,
                height: number("height")?,
            }),
        })
    }

    /// Validate and turn the draft into an element placed at the origin.
    pub fn build(self, detector: &impl LanguageDetector) -> Result<Element, EditError> {
        match self {
            ElementDraft::Text(d) => {
                let geometry = placed(d.width, d.height, 0.0)?;
                require(&d.text, "text")?;
                require(&d.color, "colour")?;
                positive(d.size, "size")?;
                Ok(Element::new(
                    ElementKind::Text {
                        text: d.text,
                        size: d.size,
                        color: d.color,
                        font_family: DEFAULT_FONT.to_string(),
                    },
                    geometry,
                ))
            }
            ElementDraft::Image(d) => {
                let geometry = placed(d.width, d.height, 1.0)?;
                let url = d.url.trim();
                let image = match (d.upload, url.is_empty()) {
                    (Some(Some(data)), true) => data,
                    (None, false) => url.to_string(),
                    (Some(None), true) => {
                        return Err(EditError::validation(
                            "uploaded image must be a JPEG or PNG",
                        ));
                    }
                    _ => {
                        return Err(EditError::validation(
                            "give either an uploaded image or an image url, not both",
                        ));
                    }
                };
                Ok(Element::new(
                    ElementKind::Image {
                        image,
                        description: d.description,
                    },
                    geometry,
                ))
            }
            ElementDraft::Video(d) => {
                let geometry = placed(d.width, d.height, 1.0)?;
                require(&d.link, "link")?;
                Ok(Element::new(
                    ElementKind::Video {
                        link: d.link,
                        autoplay: d.autoplay,
                    },
                    geometry,
                ))
            }
            ElementDraft::Code(d) => {
                let geometry = placed(d.width, d.height, 0.0)?;
                require(&d.code, "code")?;
                positive(d.size, "size")?;
                let language = resolve_language(detector, &d.code)?;
                Ok(Element::new(
                    ElementKind::Code {
                        code: d.code,
                        language,
                        size: d.size,
                    },
                    geometry,
                ))
            }
        }
    }
}

fn require(value: &str, name: &str) -> Result<(), EditError> {
    if value.trim().is_empty() {
        Err(EditError::validation(format!("`{name}` is required")))
    } else {
        Ok(())
    }
}

fn positive(value: f64, name: &str) -> Result<(), EditError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EditError::validation(format!("`{name}` must be positive, got {value}")))
    }
}

/// Origin geometry with both percentages inside `[min, 100]`.
fn placed(width: f64, height: f64, min: f64) -> Result<Geometry, EditError> {
    for (name, v) in [("width", width), ("height", height)] {
        if !(v.is_finite() && (min..=100.0).contains(&v)) {
            return Err(EditError::validation(format!(
                "`{name}` must be a percentage between {min} and 100, got {v}"
            )));
        }
    }
    Ok(Geometry::at_origin(width, height))
}

// ─── Geometry gestures ───────────────────────────────────────────────────

/// End state of a resize gesture, in container pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeGesture {
    pub width_px: f64,
    pub height_px: f64,
    /// Position after the resize; dragging a left or top handle moves it.
    pub x: f64,
    pub y: f64,
}

/// A completed gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryUpdate {
    Move { x: f64, y: f64 },
    Resize(ResizeGesture),
}

/// Apply a gesture to a geometry. Positions are not clamped to the slide.
pub fn apply_geometry(
    geometry: Geometry,
    update: GeometryUpdate,
    container: Viewport,
) -> Result<Geometry, EditError> {
    match update {
        GeometryUpdate::Move { x, y } => {
            finite(&[x, y])?;
            Ok(Geometry {
                x_pos: x,
                y_pos: y,
                ..geometry
            })
        }
        GeometryUpdate::Resize(g) => {
            finite(&[g.width_px, g.height_px, g.x, g.y])?;
            if g.width_px < 0.0 || g.height_px < 0.0 {
                return Err(EditError::validation("resize to a negative size"));
            }
            let (width, height) = container.to_percent(g.width_px, g.height_px)?;
            Ok(Geometry {
                x_pos: g.x,
                y_pos: g.y,
                width,
                height,
            })
        }
    }
}

fn finite(values: &[f64]) -> Result<(), EditError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(EditError::validation("gesture coordinates must be finite"))
    }
}

// ─── Operations ──────────────────────────────────────────────────────────

/// Append a new element to a slide. Returns its index.
pub fn add_element(
    presentation: &mut Presentation,
    slide: usize,
    draft: ElementDraft,
    detector: &impl LanguageDetector,
) -> Result<usize, EditError> {
    presentation.slide(slide)?;
    let tag = draft.tag();
    let element = draft.build(detector)?;
    let elements = &mut presentation.slide_mut(slide)?.elements;
    elements.push(element);
    log::debug!("added {tag} element #{} to slide {slide}", elements.len() - 1);
    Ok(elements.len() - 1)
}

/// Reposition an element after a drag.
pub fn move_element(
    presentation: &mut Presentation,
    slide: usize,
    index: usize,
    x: f64,
    y: f64,
) -> Result<(), EditError> {
    update_geometry(
        presentation,
        slide,
        index,
        GeometryUpdate::Move { x, y },
        Viewport::default(),
    )
}

/// Resize (and possibly reposition) an element after a resize gesture.
/// Sizes are converted to percentages of `container`.
pub fn resize_element(
    presentation: &mut Presentation,
    slide: usize,
    index: usize,
    gesture: ResizeGesture,
    container: Viewport,
) -> Result<(), EditError> {
    update_geometry(
        presentation,
        slide,
        index,
        GeometryUpdate::Resize(gesture),
        container,
    )
}

fn update_geometry(
    presentation: &mut Presentation,
    slide: usize,
    index: usize,
    update: GeometryUpdate,
    container: Viewport,
) -> Result<(), EditError> {
    let element = presentation.slide_mut(slide)?.element_mut(index)?;
    element.geometry = apply_geometry(element.geometry, update, container)?;
    log::debug!("geometry of element #{index} on slide {slide}: {:?}", element.geometry);
    Ok(())
}

/// Remove an element. Later elements shift down one z-position.
pub fn delete_element(
    presentation: &mut Presentation,
    slide: usize,
    index: usize,
) -> Result<Element, EditError> {
    let s = presentation.slide_mut(slide)?;
    s.element(index)?;
    log::debug!("deleted element #{index} from slide {slide}");
    Ok(s.elements.remove(index))
}

/// Change the font of a text element.
pub fn set_font(
    presentation: &mut Presentation,
    slide: usize,
    index: usize,
    family: &str,
) -> Result<(), EditError> {
    require(family, "font")?;
    let (_, _, font_family) = text_fields(presentation, slide, index)?;
    *font_family = family.to_string();
    Ok(())
}

/// Replace the content of a text element.
pub fn set_text(
    presentation: &mut Presentation,
    slide: usize,
    index: usize,
    new_text: &str,
) -> Result<(), EditError> {
    require(new_text, "text")?;
    let (text, _, _) = text_fields(presentation, slide, index)?;
    *text = new_text.to_string();
    Ok(())
}

/// Change the colour of a text element.
pub fn set_color(
    presentation: &mut Presentation,
    slide: usize,
    index: usize,
    new_color: &str,
) -> Result<(), EditError> {
    require(new_color, "colour")?;
    let (_, color, _) = text_fields(presentation, slide, index)?;
    *color = new_color.to_string();
    Ok(())
}

/// Replace the source of a code element, re-detecting its language.
pub fn set_code(
    presentation: &mut Presentation,
    slide: usize,
    index: usize,
    new_code: &str,
    detector: &impl LanguageDetector,
) -> Result<(), EditError> {
    require(new_code, "code")?;
    let element = presentation.slide_mut(slide)?.element_mut(index)?;
    let found = element.tag();
    let ElementKind::Code { code, language, .. } = &mut element.kind else {
        return Err(EditError::NotCode {
            index,
            found: found.to_string(),
        });
    };
    let detected = resolve_language(detector, new_code)?;
    *code = new_code.to_string();
    *language = detected;
    Ok(())
}

/// Mutable `(text, color, font_family)` of a text element.
fn text_fields(
    presentation: &mut Presentation,
    slide: usize,
    index: usize,
) -> Result<(&mut String, &mut String, &mut String), EditError> {
    let element = presentation.slide_mut(slide)?.element_mut(index)?;
    let found = element.tag();
    match &mut element.kind {
        ElementKind::Text {
            text,
            color,
            font_family,
            ..
        } => Ok((text, color, font_family)),
        _ => Err(EditError::NotText {
            index,
            found: found.to_string(),
        }),
    }
}

// ─── Edit dispatch ───────────────────────────────────────────────────────

/// An edit to an existing element, as produced by one completed UI action.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementEdit {
    Move { index: usize, x: f64, y: f64 },
    Resize {
        index: usize,
        gesture: ResizeGesture,
        container: Viewport,
    },
    Delete { index: usize },
    SetFont { index: usize, family: String },
    SetText { index: usize, text: String },
    SetColor { index: usize, color: String },
    SetCode { index: usize, code: String },
}

/// Apply one edit to a slide of `presentation`.
pub fn apply_edit(
    presentation: &mut Presentation,
    slide: usize,
    edit: ElementEdit,
    detector: &impl LanguageDetector,
) -> Result<(), EditError> {
    match edit {
        ElementEdit::Move { index, x, y } => move_element(presentation, slide, index, x, y),
        ElementEdit::Resize {
            index,
            gesture,
            container,
        } => resize_element(presentation, slide, index, gesture, container),
        ElementEdit::Delete { index } => delete_element(presentation, slide, index).map(|_| ()),
        ElementEdit::SetFont { index, family } => set_font(presentation, slide, index, &family),
        ElementEdit::SetText { index, text } => set_text(presentation, slide, index, &text),
        ElementEdit::SetColor { index, color } => set_color(presentation, slide, index, &color),
        ElementEdit::SetCode { index, code } => set_code(presentation, slide, index, &code, detector),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{CodeLanguage, HeuristicDetector, ImageFile, to_data_url};
    use pretty_assertions::assert_eq;

    fn text_draft() -> ElementDraft {
        ElementDraft::Text(TextDraft {
            text: "hi".into(),
            size: 1.0,
            width: 30.0,
            height: 30.0,
            color: "#ff0000".into(),
        })
    }

    fn image_draft(upload: Option<&str>, url: &str) -> ElementDraft {
        ElementDraft::Image(ImageDraft {
            upload: upload.map(|data| Some(data.to_string())),
            url: url.into(),
            description: "a cat".into(),
            width: 20.0,
            height: 20.0,
        })
    }

    fn code_draft(code: &str) -> ElementDraft {
        ElementDraft::Code(CodeDraft {
            code: code.into(),
            size: 1.0,
            width: 50.0,
            height: 40.0,
        })
    }

    fn pres() -> Presentation {
        Presentation::new("Demo", "d")
    }

    #[test]
    fn add_text_places_at_origin() {
        let mut p = pres();
        let idx = add_element(&mut p, 0, text_draft(), &HeuristicDetector).unwrap();
        assert_eq!(idx, 0);
        let element = &p.slides[0].elements[0];
        assert_eq!(element.tag(), ElementTag::Text);
        assert_eq!(element.geometry, Geometry::at_origin(30.0, 30.0));
        assert!(matches!(
            &element.kind,
            ElementKind::Text { font_family, .. } if font_family == DEFAULT_FONT
        ));
    }

    #[test]
    fn add_never_moves_existing_elements() {
        let mut p = pres();
        add_element(&mut p, 0, text_draft(), &HeuristicDetector).unwrap();
        move_element(&mut p, 0, 0, 120.0, 45.0).unwrap();
        let before = p.slides[0].elements[0].geometry;

        add_element(&mut p, 0, image_draft(None, "https://x/y.png"), &HeuristicDetector).unwrap();
        assert_eq!(p.slides[0].elements.len(), 2);
        assert_eq!(p.slides[0].elements[0].geometry, before);
    }

    #[test]
    fn image_source_must_be_exclusive() {
        let mut p = pres();
        for draft in [
            image_draft(None, ""),
            image_draft(None, "   "),
            image_draft(Some("data:image/png;base64,AA=="), "https://x/y.png"),
        ] {
            let err = add_element(&mut p, 0, draft, &HeuristicDetector).unwrap_err();
            assert!(matches!(err, EditError::Validation(_)));
        }
        assert!(p.slides[0].elements.is_empty());

        add_element(&mut p, 0, image_draft(Some("data:image/png;base64,AA=="), ""), &HeuristicDetector)
            .unwrap();
        assert!(matches!(
            &p.slides[0].elements[0].kind,
            ElementKind::Image { image, .. } if image.starts_with("data:")
        ));
    }

    #[test]
    fn unsupported_upload_still_excludes_url() {
        let gif = to_data_url(&ImageFile::new("image/gif", b"GIF89a".to_vec()));
        assert_eq!(gif, None);
        let fields = [("url", "https://x/y.png"), ("width", "20"), ("height", "20")];
        let lookup = |name: &str| fields.iter().find(|(k, _)| *k == name).map(|(_, v)| *v);

        let mut p = pres();
        let both = ElementDraft::from_fields(ElementTag::Image, lookup, Some(gif.clone())).unwrap();
        let err = add_element(&mut p, 0, both, &HeuristicDetector).unwrap_err();
        assert_eq!(
            err,
            EditError::validation("give either an uploaded image or an image url, not both")
        );

        let no_url = |name: &str| lookup(name).filter(|_| name != "url");
        let alone = ElementDraft::from_fields(ElementTag::Image, no_url, Some(gif)).unwrap();
        let err = add_element(&mut p, 0, alone, &HeuristicDetector).unwrap_err();
        assert_eq!(err, EditError::validation("uploaded image must be a JPEG or PNG"));
        assert!(p.slides[0].elements.is_empty());

        let url_only = ElementDraft::from_fields(ElementTag::Image, lookup, None).unwrap();
        assert_eq!(add_element(&mut p, 0, url_only, &HeuristicDetector), Ok(0));
    }

    #[test]
    fn code_language_is_detected_and_whitelisted() {
        let mut p = pres();
        add_element(&mut p, 0, code_draft("def f(x):\n    return x\n"), &HeuristicDetector).unwrap();
        assert!(matches!(
            p.slides[0].elements[0].kind,
            ElementKind::Code { language: CodeLanguage::Python, .. }
        ));

        let err = add_element(
            &mut p,
            0,
            code_draft("#include <iostream>\nint main() { std::cout << 1; }"),
            &HeuristicDetector,
        )
        .unwrap_err();
        assert_eq!(err, EditError::UnsupportedLanguage("C++".into()));
        assert_eq!(p.slides[0].elements.len(), 1);
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        let mut p = pres();
        let draft = ElementDraft::Video(VideoDraft {
            link: "https://youtube.com/embed/x".into(),
            width: 0.0,
            height: 50.0,
            autoplay: true,
        });
        assert!(matches!(
            add_element(&mut p, 0, draft, &HeuristicDetector),
            Err(EditError::Validation(_))
        ));
        assert!(matches!(
            add_element(&mut p, 3, text_draft(), &HeuristicDetector),
            Err(EditError::SlideOutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn from_fields_reads_form_names() {
        let fields = [
            ("text", "hi"),
            ("size", "1"),
            ("width", "30"),
            ("height", "30"),
            ("colour", "#ff0000"),
        ];
        let lookup = |name: &str| fields.iter().find(|(k, _)| *k == name).map(|(_, v)| *v);
        let draft = ElementDraft::from_fields(ElementTag::Text, lookup, None).unwrap();
        assert_eq!(draft, text_draft());

        let missing = |name: &str| if name == "text" { None } else { lookup(name) };
        let err = ElementDraft::from_fields(ElementTag::Text, missing, None).unwrap_err();
        assert_eq!(err, EditError::Validation("text element needs `text`".into()));
    }

    #[test]
    fn resize_roundtrips_percentages() {
        let mut p = pres();
        add_element(&mut p, 0, text_draft(), &HeuristicDetector).unwrap();
        let container = Viewport::new(937.0, 533.0);
        let gesture = ResizeGesture {
            width_px: 412.3,
            height_px: 201.7,
            x: 15.0,
            y: 22.5,
        };
        resize_element(&mut p, 0, 0, gesture, container).unwrap();

        let g = p.slides[0].elements[0].geometry;
        let (w_px, h_px) = container.to_pixels(g.width, g.height);
        assert!((w_px - 412.3).abs() < 1e-9);
        assert!((h_px - 201.7).abs() < 1e-9);
        assert_eq!((g.x_pos, g.y_pos), (15.0, 22.5));
    }

    #[test]
    fn moves_are_not_clamped() {
        let g = apply_geometry(
            Geometry::at_origin(10.0, 10.0),
            GeometryUpdate::Move { x: -50.0, y: 5000.0 },
            Viewport::default(),
        )
        .unwrap();
        assert_eq!((g.x_pos, g.y_pos), (-50.0, 5000.0));
        assert_eq!((g.width, g.height), (10.0, 10.0));
    }

    #[test]
    fn resize_in_empty_container_fails_without_change() {
        let mut p = pres();
        add_element(&mut p, 0, text_draft(), &HeuristicDetector).unwrap();
        let before = p.clone();
        let gesture = ResizeGesture {
            width_px: 10.0,
            height_px: 10.0,
            x: 0.0,
            y: 0.0,
        };
        assert!(resize_element(&mut p, 0, 0, gesture, Viewport::new(0.0, 0.0)).is_err());
        assert_eq!(p, before);
    }

    #[test]
    fn text_only_edits_reject_other_kinds() {
        let mut p = pres();
        add_element(&mut p, 0, image_draft(None, "https://x/y.png"), &HeuristicDetector).unwrap();
        let err = set_font(&mut p, 0, 0, "Courier New").unwrap_err();
        assert_eq!(
            err,
            EditError::NotText {
                index: 0,
                found: "image".into()
            }
        );
    }

    #[test]
    fn apply_edit_dispatches() {
        let mut p = pres();
        add_element(&mut p, 0, text_draft(), &HeuristicDetector).unwrap();
        add_element(&mut p, 0, code_draft("console.log(1 === 1);"), &HeuristicDetector).unwrap();

        let edits = [
            ElementEdit::SetFont {
                index: 0,
                family: "Courier New".into(),
            },
            ElementEdit::SetText {
                index: 0,
                text: "bye".into(),
            },
            ElementEdit::SetColor {
                index: 0,
                color: "#00ff00".into(),
            },
            ElementEdit::SetCode {
                index: 1,
                code: "#include <stdio.h>\nint main() { printf(\"x\"); }".into(),
            },
        ];
        for edit in edits {
            apply_edit(&mut p, 0, edit, &HeuristicDetector).unwrap();
        }

        assert_eq!(
            p.slides[0].elements[0].kind,
            ElementKind::Text {
                text: "bye".into(),
                size: 1.0,
                color: "#00ff00".into(),
                font_family: "Courier New".into(),
            }
        );
        assert!(matches!(
            p.slides[0].elements[1].kind,
            ElementKind::Code { language: CodeLanguage::C, .. }
        ));

        apply_edit(&mut p, 0, ElementEdit::Delete { index: 0 }, &HeuristicDetector).unwrap();
        assert_eq!(p.slides[0].elements.len(), 1);
        assert_eq!(p.slides[0].elements[0].tag(), ElementTag::Code);
        assert!(matches!(
            apply_edit(&mut p, 0, ElementEdit::Delete { index: 4 }, &HeuristicDetector),
            Err(EditError::ElementOutOfRange { index: 4, len: 1 })
        ));
    }
}
