//! Error types module
//!
//! This module provides the unified error type for the photo pipeline.
//! Every operation surfaces failures through `AppError`; the request layer
//! (an external collaborator) maps them to HTTP responses via
//! `ErrorMetadata`.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like quota limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "MAX_IMAGES_REACHED")
    fn error_code(&self) -> &'static str;

    /// Whether the caller can correct the request and retry
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Image type catalog unavailable: {0}")]
    ConfigUnavailable(String),

    #[error("Unknown image type: {0}")]
    UnknownImageType(String),

    #[error("Invalid image data: {0}")]
    InvalidImageData(String),

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Maximum number of {image_type} images reached ({max})")]
    MaxImagesReached { image_type: String, max: u32 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Image encoding failed: {0}")]
    EncodeFailure(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::ConfigUnavailable(_) => 500,
            AppError::UnknownImageType(_) => 400,
            AppError::InvalidImageData(_) => 400,
            AppError::PayloadTooLarge { .. } => 413,
            AppError::MaxImagesReached { .. } => 400,
            AppError::NotFound(_) => 404,
            AppError::EncodeFailure(_) => 500,
            AppError::Storage(_) => 500,
            AppError::Internal(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::ConfigUnavailable(_) => "CONFIG_UNAVAILABLE",
            AppError::UnknownImageType(_) => "INVALID_IMAGE_TYPE",
            AppError::InvalidImageData(_) => "INVALID_FILE_TYPE",
            AppError::PayloadTooLarge { .. } => "FILE_TOO_LARGE",
            AppError::MaxImagesReached { .. } => "MAX_IMAGES_REACHED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::EncodeFailure(_) => "ENCODE_FAILURE",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::UnknownImageType(_)
                | AppError::InvalidImageData(_)
                | AppError::PayloadTooLarge { .. }
                | AppError::MaxImagesReached { .. }
        )
    }

    fn client_message(&self) -> String {
        match self {
            // Internal details stay out of client responses
            AppError::ConfigUnavailable(_) => "Image configuration is unavailable".to_string(),
            AppError::EncodeFailure(_) => "Image processing failed".to_string(),
            AppError::Storage(_) | AppError::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::UnknownImageType(_)
            | AppError::InvalidImageData(_)
            | AppError::PayloadTooLarge { .. }
            | AppError::NotFound(_) => LogLevel::Debug,
            AppError::MaxImagesReached { .. } => LogLevel::Warn,
            AppError::ConfigUnavailable(_)
            | AppError::EncodeFailure(_)
            | AppError::Storage(_)
            | AppError::Internal(_) => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            AppError::ConfigUnavailable("missing".into()).error_code(),
            "CONFIG_UNAVAILABLE"
        );
        assert_eq!(
            AppError::MaxImagesReached {
                image_type: "gallery".into(),
                max: 10
            }
            .error_code(),
            "MAX_IMAGES_REACHED"
        );
        assert_eq!(
            AppError::NotFound("my-shop".into()).error_code(),
            "NOT_FOUND"
        );
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            AppError::InvalidImageData("bad magic".into()).http_status_code(),
            400
        );
        assert_eq!(
            AppError::PayloadTooLarge {
                size: 100,
                max: 50
            }
            .http_status_code(),
            413
        );
        assert_eq!(AppError::NotFound("x".into()).http_status_code(), 404);
        assert_eq!(
            AppError::EncodeFailure("oom".into()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_user_correctable_errors_are_recoverable() {
        assert!(AppError::MaxImagesReached {
            image_type: "logo".into(),
            max: 1
        }
        .is_recoverable());
        assert!(AppError::InvalidImageData("not an image".into()).is_recoverable());
        assert!(!AppError::ConfigUnavailable("gone".into()).is_recoverable());
        assert!(!AppError::EncodeFailure("boom".into()).is_recoverable());
    }

    #[test]
    fn test_client_message_hides_internal_details() {
        let err = AppError::Storage("/var/media/secret-path: permission denied".into());
        assert_eq!(err.client_message(), "Internal error");

        let err = AppError::MaxImagesReached {
            image_type: "gallery".into(),
            max: 10,
        };
        assert!(err.client_message().contains("gallery"));
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(
            AppError::NotFound("x".into()).log_level(),
            LogLevel::Debug
        );
        assert_eq!(
            AppError::MaxImagesReached {
                image_type: "logo".into(),
                max: 1
            }
            .log_level(),
            LogLevel::Warn
        );
        assert_eq!(
            AppError::Storage("io".into()).log_level(),
            LogLevel::Error
        );
    }
}
