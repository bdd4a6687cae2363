//! Image payloads for clinical image analysis.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use medtutor_core::types::Part;

/// MIME type attached to every image sent for analysis
pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// A JPEG image held as base64 text, without a `data:` URL prefix
#[derive(Clone, PartialEq, Eq)]
pub struct ImageInput {
    data: String,
}

impl std::fmt::Debug for ImageInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageInput")
            .field("mime_type", &JPEG_MIME_TYPE)
            .field("base64_len", &self.data.len())
            .finish()
    }
}

impl ImageInput {
    /// Wrap base64 text as-is
    ///
    /// The text is not validated; the service rejects bad payloads.
    pub fn from_base64(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    /// Encode raw JPEG bytes
    pub fn from_jpeg_bytes(bytes: &[u8]) -> Self {
        Self {
            data: STANDARD.encode(bytes),
        }
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn mime_type(&self) -> &'static str {
        JPEG_MIME_TYPE
    }

    /// Inline-data part for a request
    pub fn to_part(&self) -> Part {
        Part::inline_data(JPEG_MIME_TYPE, self.data.clone())
    }
}

impl From<String> for ImageInput {
    fn from(data: String) -> Self {
        Self::from_base64(data)
    }
}

impl From<&str> for ImageInput {
    fn from(data: &str) -> Self {
        Self::from_base64(data)
    }
}
