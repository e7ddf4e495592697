//! Core data model for slide documents.
//!
//! A `Collection` maps dense 1-based ids to `Presentation`s. Each
//! presentation owns an ordered list of `Slide`s, and each slide an ordered
//! list of `Element`s in z-order (later elements draw above earlier ones).
//! Element geometry is stored as percentages of the slide, never pixels;
//! see `layout` for the conversion.
//!
//! The serde shape matches the stored JSON document byte-for-byte in field
//! naming (`presName`, `obj`, `xPos`, ...), so collections written by older
//! clients load unchanged.

use crate::error::EditError;
use crate::id::PresentationId;
use crate::language::CodeLanguage;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Sentinel stored in `background` for "use the presentation default".
pub const DEFAULT_BACKGROUND: &str = "default";

/// Image reference given to freshly created presentations.
pub const PLACEHOLDER_THUMBNAIL: &str = "/images/empty.jpg";

/// Font family assigned to new text elements.
pub const DEFAULT_FONT: &str = "Arial";

/// Font families offered by the font picker.
pub const FONT_CHOICES: [&str; 3] = ["Arial", "Brush Script MT", "Courier New"];

// ─── Background ──────────────────────────────────────────────────────────

/// Slide background: either the `"default"` sentinel or a colour string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Background {
    #[default]
    Default,
    Color(String),
}

impl Background {
    pub fn is_default(&self) -> bool {
        matches!(self, Background::Default)
    }

    /// Parse a stored value. The literal `"default"` is the sentinel.
    pub fn from_stored(value: &str) -> Self {
        if value == DEFAULT_BACKGROUND {
            Background::Default
        } else {
            Background::Color(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Background::Default => DEFAULT_BACKGROUND,
            Background::Color(c) => c,
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Background {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Background {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Background::from_stored(&s))
    }
}

// ─── Elements ────────────────────────────────────────────────────────────

/// Position and size of an element.
///
/// `width` and `height` are percentages (0–100) of the slide. `x_pos` and
/// `y_pos` are the drag offset reported by the slide container and are not
/// clamped to the slide bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub x_pos: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub y_pos: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub width: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub height: f64,
}

impl Geometry {
    /// Geometry of a newly added element: placed at the origin.
    pub fn at_origin(width: f64, height: f64) -> Self {
        Self {
            x_pos: 0.0,
            y_pos: 0.0,
            width,
            height,
        }
    }
}

/// The content of an element, tagged by `type` in the stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text {
        text: String,
        /// Font size in em units.
        #[serde(deserialize_with = "lenient_f64")]
        size: f64,
        color: String,
        #[serde(rename = "fontFamily", default = "default_font")]
        font_family: String,
    },
    Image {
        /// Data URL or external URL.
        #[serde(default, deserialize_with = "null_as_empty")]
        image: String,
        #[serde(default)]
        description: String,
    },
    Video {
        link: String,
        #[serde(default)]
        autoplay: bool,
    },
    Code {
        code: String,
        language: CodeLanguage,
        /// Font size in em units.
        #[serde(deserialize_with = "lenient_f64")]
        size: f64,
    },
}

fn default_font() -> String {
    DEFAULT_FONT.to_string()
}

/// Discriminant of `ElementKind`, used for dispatch and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementTag {
    Text,
    Image,
    Video,
    Code,
}

impl fmt::Display for ElementTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementTag::Text => "text",
            ElementTag::Image => "image",
            ElementTag::Video => "video",
            ElementTag::Code => "code",
        })
    }
}

/// One positioned content unit on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(flatten)]
    pub kind: ElementKind,
    #[serde(flatten)]
    pub geometry: Geometry,
}

impl Element {
    pub fn new(kind: ElementKind, geometry: Geometry) -> Self {
        Self { kind, geometry }
    }

    pub fn tag(&self) -> ElementTag {
        match self.kind {
            ElementKind::Text { .. } => ElementTag::Text,
            ElementKind::Image { .. } => ElementTag::Image,
            ElementKind::Video { .. } => ElementTag::Video,
            ElementKind::Code { .. } => ElementTag::Code,
        }
    }
}

/// Source URL for a video element. Autoplaying videos start muted, since
/// browsers refuse unmuted autoplay.
pub fn video_source(link: &str, autoplay: bool) -> String {
    if autoplay {
        format!("{link}&autoplay=1&mute=1")
    } else {
        link.to_string()
    }
}

// ─── Slides & Presentations ──────────────────────────────────────────────

/// A single slide.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default)]
    pub background: Background,
    /// Elements in z-order.
    #[serde(rename = "obj", default)]
    pub elements: Vec<Element>,
}

impl Slide {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, index: usize) -> Result<&Element, EditError> {
        let len = self.elements.len();
        self.elements
            .get(index)
            .ok_or(EditError::ElementOutOfRange { index, len })
    }

    pub fn element_mut(&mut self, index: usize) -> Result<&mut Element, EditError> {
        let len = self.elements.len();
        self.elements
            .get_mut(index)
            .ok_or(EditError::ElementOutOfRange { index, len })
    }
}

/// A presentation: metadata plus a never-empty list of slides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    #[serde(rename = "presName")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub slides: Vec<Slide>,
}

impl Presentation {
    /// A new presentation with one empty slide on the default background.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            thumbnail: PLACEHOLDER_THUMBNAIL.to_string(),
            description: description.into(),
            slides: vec![Slide::new()],
        }
    }

    pub fn slide(&self, index: usize) -> Result<&Slide, EditError> {
        let len = self.slides.len();
        self.slides
            .get(index)
            .ok_or(EditError::SlideOutOfRange { index, len })
    }

    pub fn slide_mut(&mut self, index: usize) -> Result<&mut Slide, EditError> {
        let len = self.slides.len();
        self.slides
            .get_mut(index)
            .ok_or(EditError::SlideOutOfRange { index, len })
    }
}

// ─── Collection ──────────────────────────────────────────────────────────

/// Every presentation of one user, keyed by dense 1-based id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    presentations: BTreeMap<PresentationId, Presentation>,
}

/// Dashboard card data for one presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationSummary {
    pub id: PresentationId,
    pub name: String,
    pub thumbnail: String,
    pub description: String,
    pub slide_count: usize,
}

impl Collection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.presentations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presentations.is_empty()
    }

    pub fn get(&self, id: PresentationId) -> Result<&Presentation, EditError> {
        self.presentations
            .get(&id)
            .ok_or(EditError::PresentationNotFound(id))
    }

    pub fn get_mut(&mut self, id: PresentationId) -> Result<&mut Presentation, EditError> {
        self.presentations
            .get_mut(&id)
            .ok_or(EditError::PresentationNotFound(id))
    }

    pub fn contains(&self, id: PresentationId) -> bool {
        self.presentations.contains_key(&id)
    }

    /// Presentations in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PresentationId, &Presentation)> {
        self.presentations.iter().map(|(id, p)| (*id, p))
    }

    pub fn ids(&self) -> impl Iterator<Item = PresentationId> + '_ {
        self.presentations.keys().copied()
    }

    /// The id the next inserted presentation will receive.
    pub fn next_id(&self) -> PresentationId {
        self.presentations
            .keys()
            .next_back()
            .map_or(PresentationId::FIRST, |last| last.next())
    }

    /// Append a presentation under `next_id()` and return its id.
    pub fn push(&mut self, presentation: Presentation) -> PresentationId {
        let id = self.next_id();
        self.presentations.insert(id, presentation);
        id
    }

    /// Remove a presentation and compact the remaining ids back into
    /// `1..=len`. Every presentation after `id` moves down by one.
    pub fn remove(&mut self, id: PresentationId) -> Result<Presentation, EditError> {
        let removed = self
            .presentations
            .remove(&id)
            .ok_or(EditError::PresentationNotFound(id))?;
        self.compact();
        Ok(removed)
    }

    /// Renumber presentations so ids are exactly `1..=len`, keeping order.
    pub fn compact(&mut self) {
        let old = std::mem::take(&mut self.presentations);
        self.presentations = old
            .into_values()
            .enumerate()
            .map(|(pos, p)| (PresentationId::from_position(pos), p))
            .collect();
    }

    /// Dashboard listing in id order.
    pub fn summaries(&self) -> Vec<PresentationSummary> {
        self.iter()
            .map(|(id, p)| PresentationSummary {
                id,
                name: p.name.clone(),
                thumbnail: p.thumbnail.clone(),
                description: p.description.clone(),
                slide_count: p.slides.len(),
            })
            .collect()
    }
}

impl FromIterator<(PresentationId, Presentation)> for Collection {
    fn from_iter<I: IntoIterator<Item = (PresentationId, Presentation)>>(iter: I) -> Self {
        Self {
            presentations: iter.into_iter().collect(),
        }
    }
}

// ─── Lenient field readers ───────────────────────────────────────────────

/// Accept a JSON number or a numeric string. Form inputs were historically
/// stored as strings (`"width": "30"`).
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrText {
        Num(f64),
        Text(String),
    }

    match NumOrText::deserialize(deserializer)? {
        NumOrText::Num(n) => Ok(n),
        NumOrText::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("expected a number, found `{s}`"))),
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
