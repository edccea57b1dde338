//! Vitrina Processing Library
//!
//! This crate provides the transform engine, content-signature sniffing,
//! and upload validation for the photo pipeline. The engine is stateless
//! and safe to run fully in parallel across outputs and requests.

pub mod engine;
pub mod sniff;
pub mod validator;

// Re-export commonly used types
pub use engine::{render, RenderError, TargetSize};
pub use sniff::{detect_format, SourceFormat};
pub use validator::{UploadValidator, ValidationError};
