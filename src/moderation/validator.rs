//! Content sniffing for uploaded payloads.
//!
//! The declared filename and content type of an upload are never consulted;
//! only the leading magic bytes decide whether the payload is an image.

const UNKNOWN_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInspection {
    pub is_image: bool,
    pub mime_type: String,
}

pub fn inspect(bytes: &[u8]) -> ImageInspection {
    let mime_type = infer::get(bytes)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| UNKNOWN_MIME.to_string());

    ImageInspection {
        is_image: mime_type.starts_with("image/"),
        mime_type,
    }
}
