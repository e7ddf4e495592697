//! Image ingestion: uploaded files become inline data URLs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Raster types accepted for upload.
pub const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

/// An uploaded file: declared MIME type plus raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(mime: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }
}

/// Encode an uploaded image as a `data:` URL.
///
/// Returns `None` for anything that is not an accepted raster type. Callers
/// treat `None` as "no image supplied", not as an error.
pub fn to_data_url(file: &ImageFile) -> Option<String> {
    if !ACCEPTED_IMAGE_TYPES.contains(&file.mime.as_str()) {
        log::debug!("ignoring upload of type {}", file.mime);
        return None;
    }
    Some(format!(
        "data:{};base64,{}",
        file.mime,
        STANDARD.encode(&file.bytes)
    ))
}
