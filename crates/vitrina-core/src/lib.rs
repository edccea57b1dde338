//! Vitrina Core Library
//!
//! This crate provides the domain models, image-type catalog, slug
//! derivation, error types, and configuration shared across the photo
//! pipeline crates.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod slug;

// Re-export commonly used types
pub use catalog::{
    CachedCatalog, CatalogProvider, Clock, ImageTypeConfig, MediaCatalog, SizeConfig, SystemClock,
};
pub use config::MediaConfig;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{BusinessRef, ImageSpec, ImageSummary, TransformParameters};
pub use slug::{resolve_conflict, slugify};
