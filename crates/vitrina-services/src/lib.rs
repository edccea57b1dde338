//! Vitrina Services Library
//!
//! This crate wires the catalog, stores, and transform engine into the
//! photo service consumed by the request-handling layer.

pub mod photos;

// Re-export commonly used types
pub use photos::{PhotoService, UpdateOutcome, UploadOutcome, UploadRequest};
