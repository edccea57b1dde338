//! Shared constants for the photo pipeline.

/// File extension of every encoded size output.
pub const ENCODED_EXT: &str = "webp";

/// Fixed lossy quality for encoded outputs.
pub const ENCODE_QUALITY: f32 = 85.0;

/// File extension of the per-image sidecar record.
pub const SPEC_EXT: &str = "json";

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 60;

/// Slug used when a display name has no usable characters.
pub const FALLBACK_SLUG: &str = "image";

/// Default catalog cache TTL in seconds.
pub const DEFAULT_CATALOG_TTL_SECS: u64 = 60;

/// Fallback upload cap in megabytes when the catalog does not set one.
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 10;
