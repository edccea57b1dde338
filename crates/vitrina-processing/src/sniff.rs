//! Content-signature detection for uploaded files.
//!
//! Uploads are identified by magic bytes only; declared extensions and
//! content types are never trusted.

/// Raster formats accepted as upload sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
}

impl SourceFormat {
    /// Extension used for the stored source file.
    pub fn ext(self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "jpg",
            SourceFormat::Png => "png",
            SourceFormat::Gif => "gif",
            SourceFormat::WebP => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "image/jpeg",
            SourceFormat::Png => "image/png",
            SourceFormat::Gif => "image/gif",
            SourceFormat::WebP => "image/webp",
        }
    }
}

/// Detect the source format from the file's leading bytes.
///
/// Returns `None` for anything shorter than 12 bytes or without a
/// recognized signature.
pub fn detect_format(buffer: &[u8]) -> Option<SourceFormat> {
    if buffer.len() < 12 {
        return None;
    }
    if buffer[0] == 0xFF && buffer[1] == 0xD8 && buffer[2] == 0xFF {
        return Some(SourceFormat::Jpeg);
    }
    if buffer.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Some(SourceFormat::Png);
    }
    if buffer.starts_with(b"GIF") {
        return Some(SourceFormat::Gif);
    }
    if buffer.starts_with(b"RIFF") && &buffer[8..12] == b"WEBP" {
        return Some(SourceFormat::WebP);
    }
    None
}
