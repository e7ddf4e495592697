//! Addressable locations.
//!
//! Slide numbers in paths are 1-based; indices everywhere else are 0-based.
//!
//! ```text
//! /presentation/{id}/{n}
//! /presentation/{id}/preview/{n}?pres=<snapshot>&presId={id}
//! ```
//!
//! A preview location carries the whole presentation as base64url JSON, so
//! it renders without touching the store.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use deck_core::{EditError, Presentation, PresentationId};
use std::fmt;
use std::str::FromStr;

const PREFIX: &str = "/presentation/";

/// Where the editor is: one slide of one presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditLocation {
    pub presentation: PresentationId,
    /// 0-based.
    pub slide: usize,
}

/// Where a preview is, plus the snapshot it shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewLocation {
    pub presentation: PresentationId,
    /// 0-based.
    pub slide: usize,
    pub snapshot: Presentation,
}

/// Either kind of location.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Edit(EditLocation),
    Preview(PreviewLocation),
}

impl fmt::Display for EditLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}/{}", self.presentation, self.slide + 1)
    }
}

impl fmt::Display for PreviewLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_vec(&self.snapshot).map_err(|_| fmt::Error)?;
        write!(
            f,
            "{PREFIX}{id}/preview/{n}?pres={pres}&presId={id}",
            id = self.presentation,
            n = self.slide + 1,
            pres = URL_SAFE_NO_PAD.encode(json),
        )
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Edit(l) => fmt::Display::fmt(l, f),
            Location::Preview(l) => fmt::Display::fmt(l, f),
        }
    }
}

fn invalid(input: &str, why: &str) -> EditError {
    EditError::InvalidLocation(format!("{input}: {why}"))
}

fn parse_id(input: &str, raw: &str) -> Result<PresentationId, EditError> {
    raw.parse().map_err(|_| invalid(input, "bad presentation id"))
}

fn parse_slide(input: &str, raw: &str) -> Result<usize, EditError> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(invalid(input, "slide numbers start at 1")),
    }
}

impl FromStr for Location {
    type Err = EditError;

    fn from_str(input: &str) -> Result<Self, EditError> {
        let rest = input
            .strip_prefix(PREFIX)
            .ok_or_else(|| invalid(input, "not a presentation path"))?;
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };
        let segments: Vec<&str> = path.trim_end_matches('/').split('/').collect();

        match (segments.as_slice(), query) {
            ([id, n], None) => Ok(Location::Edit(EditLocation {
                presentation: parse_id(input, id)?,
                slide: parse_slide(input, n)?,
            })),
            ([id, "preview", n], Some(query)) => {
                let presentation = parse_id(input, id)?;
                let slide = parse_slide(input, n)?;

                let mut pres = None;
                let mut pres_id = None;
                for pair in query.split('&') {
                    match pair.split_once('=') {
                        Some(("pres", v)) => pres = Some(v),
                        Some(("presId", v)) => pres_id = Some(v),
                        _ => {}
                    }
                }
                if pres_id.map(|v| parse_id(input, v)).transpose()? != Some(presentation) {
                    return Err(invalid(input, "presId does not match the path"));
                }
                let encoded = pres.ok_or_else(|| invalid(input, "missing pres"))?;
                let json = URL_SAFE_NO_PAD
                    .decode(encoded)
                    .map_err(|e| invalid(input, &e.to_string()))?;
                let snapshot = serde_json::from_slice(&json).map_err(|e| invalid(input, &e.to_string()))?;

                Ok(Location::Preview(PreviewLocation {
                    presentation,
                    slide,
                    snapshot,
                }))
            }
            ([_, "preview", _], None) => Err(invalid(input, "preview needs a snapshot")),
            _ => Err(invalid(input, "unrecognized path")),
        }
    }
}

impl FromStr for EditLocation {
    type Err = EditError;

    fn from_str(input: &str) -> Result<Self, EditError> {
        match input.parse()? {
            Location::Edit(l) => Ok(l),
            Location::Preview(_) => Err(invalid(input, "expected an edit location")),
        }
    }
}

impl FromStr for PreviewLocation {
    type Err = EditError;

    fn from_str(input: &str) -> Result<Self, EditError> {
        match input.parse()? {
            Location::Preview(l) => Ok(l),
            Location::Edit(_) => Err(invalid(input, "expected a preview location")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::Background;
    use pretty_assertions::assert_eq;

    fn id(n: u32) -> PresentationId {
        PresentationId::new(n).unwrap()
    }

    #[test]
    fn edit_paths_are_one_based() {
        let loc = EditLocation {
            presentation: id(3),
            slide: 0,
        };
        assert_eq!(loc.to_string(), "/presentation/3/1");
        assert_eq!("/presentation/3/1".parse::<EditLocation>().unwrap(), loc);
        assert!("/presentation/3/0".parse::<EditLocation>().is_err());
        assert!("/presentation/0/1".parse::<EditLocation>().is_err());
    }

    #[test]
    fn preview_carries_snapshot() {
        let mut snapshot = Presentation::new("Demo", "with ? & = in it");
        snapshot.slides[0].background = Background::Color("#123456".into());
        let loc = PreviewLocation {
            presentation: id(2),
            slide: 0,
            snapshot,
        };
        let url = loc.to_string();
        assert!(url.starts_with("/presentation/2/preview/1?pres="));
        assert!(url.ends_with("&presId=2"));
        assert_eq!(url.parse::<PreviewLocation>().unwrap(), loc);
    }

    #[test]
    fn rejects_mismatched_or_broken_previews() {
        let loc = PreviewLocation {
            presentation: id(2),
            slide: 0,
            snapshot: Presentation::new("Demo", ""),
        };
        let url = loc.to_string().replace("presId=2", "presId=5");
        assert!(matches!(
            url.parse::<Location>(),
            Err(EditError::InvalidLocation(_))
        ));
        assert!("/presentation/2/preview/1?pres=@@@&presId=2".parse::<Location>().is_err());
        assert!("/presentation/2/preview/1".parse::<Location>().is_err());
        assert!("/dashboard".parse::<Location>().is_err());
    }
}
