//! Upload validation.
//!
//! Validates raw upload buffers before any processing: non-empty, within
//! the configured size cap, and carrying a recognized raster signature.

use crate::sniff::{detect_format, SourceFormat};

/// Validation errors for uploaded files
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Empty file")]
    EmptyFile,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("File does not appear to be a valid image")]
    UnrecognizedFormat,
}

/// Upload file validator
///
/// Holds the effective size cap for one request; the cap comes from the
/// image-type catalog with an env-configured fallback.
pub struct UploadValidator {
    max_file_size: usize,
}

impl UploadValidator {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    /// Validate the buffer and return the detected source format.
    pub fn validate(&self, data: &[u8]) -> Result<SourceFormat, ValidationError> {
        if data.is_empty() {
            return Err(ValidationError::EmptyFile);
        }
        if data.len() > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size: data.len(),
                max: self.max_file_size,
            });
        }
        detect_format(data).ok_or(ValidationError::UnrecognizedFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_header() -> Vec<u8> {
        let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        data.extend_from_slice(&[0u8; 32]);
        data
    }

    #[test]
    fn test_validate_ok() {
        let validator = UploadValidator::new(1024);
        assert_eq!(
            validator.validate(&png_header()).unwrap(),
            SourceFormat::Png
        );
    }

    #[test]
    fn test_validate_empty() {
        let validator = UploadValidator::new(1024);
        assert!(matches!(
            validator.validate(&[]),
            Err(ValidationError::EmptyFile)
        ));
    }

    #[test]
    fn test_validate_too_large() {
        let validator = UploadValidator::new(8);
        let err = validator.validate(&png_header()).unwrap_err();
        match err {
            ValidationError::FileTooLarge { size, max } => {
                assert_eq!(size, 40);
                assert_eq!(max, 8);
            }
            _ => panic!("Expected FileTooLarge"),
        }
    }

    #[test]
    fn test_validate_unrecognized() {
        let validator = UploadValidator::new(1024);
        assert!(matches!(
            validator.validate(&[0u8; 64]),
            Err(ValidationError::UnrecognizedFormat)
        ));
    }

    #[test]
    fn test_size_check_runs_before_sniffing() {
        // An oversized buffer with a valid signature still reports size first
        let validator = UploadValidator::new(4);
        assert!(matches!(
            validator.validate(&png_header()),
            Err(ValidationError::FileTooLarge { .. })
        ));
    }
}
