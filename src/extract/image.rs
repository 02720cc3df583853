//! Image uploads.
//!
//! Images are not text-extracted; the raw bytes are base64-encoded and carried
//! to the model as inline data with the declared MIME type. The session keeps
//! at most one image at a time.

use base64::Engine;
use serde::{Deserialize, Serialize};

use super::FileFormat;

/// Inline image payload for the model request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub mime_type: String,
    /// Standard base64 of the raw file bytes.
    pub data: String,
}

pub(crate) fn encode_image(bytes: &[u8], format: FileFormat) -> ImagePayload {
    let ext = if format == FileFormat::Png { "png" } else { "jpg" };
    let mime_type = mime_guess::from_ext(ext)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    ImagePayload {
        mime_type,
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
    }
}
