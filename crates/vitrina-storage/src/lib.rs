//! Vitrina Storage Library
//!
//! This crate provides the storage seams of the photo pipeline and their
//! local-filesystem implementation.
//!
//! # On-disk layout
//!
//! Each business owns one folder under the media root, named
//! `{tag}_{businessId}`. Source files live in the folder root under their
//! original extension; each image type gets a subfolder holding the
//! sidecar records (`{slug}.json`) and the encoded outputs
//! (`{slug}_{sizeTag}.webp`). Layout and URL generation are centralized in
//! the `layout` module so every backend stays consistent.

pub mod catalog_file;
pub mod layout;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use catalog_file::FileCatalogProvider;
pub use local::LocalMediaStore;
pub use traits::{AssetStore, SpecStore, StorageError, StorageResult};
