//! Storage abstraction traits
//!
//! The transform engine never touches storage directly; the photo service
//! talks to these two seams so deployments can choose the backing
//! technology (local disk, object storage, embedded DB).

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;
use vitrina_core::{BusinessRef, ImageSpec};

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Spec not found: {0}")]
    SpecNotFound(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Invalid path component: {0}")]
    InvalidComponent(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Sidecar record store: one [`ImageSpec`] per uploaded image, identified
/// by `(business, image_type, slug)`.
///
/// Writes are full overwrites, atomic at the file level only; there is no
/// transaction across multiple images.
#[async_trait]
pub trait SpecStore: Send + Sync {
    /// Persist the spec, creating the type subfolder if absent.
    async fn write_spec(
        &self,
        business: &BusinessRef,
        image_type: &str,
        slug: &str,
        spec: &ImageSpec,
    ) -> StorageResult<()>;

    /// Read one spec. Fails with `SpecNotFound` when absent; callers use
    /// this to confirm image existence before edit/delete.
    async fn read_spec(
        &self,
        business: &BusinessRef,
        image_type: &str,
        slug: &str,
    ) -> StorageResult<ImageSpec>;

    /// All `(slug, spec)` pairs for one type. Unreadable entries are
    /// silently skipped — listing is best-effort, not strict.
    async fn list_specs(
        &self,
        business: &BusinessRef,
        image_type: &str,
    ) -> StorageResult<Vec<(String, ImageSpec)>>;

    /// Slugs already taken within `(business, image_type)`.
    async fn existing_slugs(
        &self,
        business: &BusinessRef,
        image_type: &str,
    ) -> StorageResult<HashSet<String>>;

    /// Number of spec records for a type; used to enforce the quota.
    async fn count_images(
        &self,
        business: &BusinessRef,
        image_type: &str,
    ) -> StorageResult<usize>;

    /// Best-effort removal; a missing record is not an error.
    async fn delete_spec(&self, business: &BusinessRef, image_type: &str, slug: &str);
}

/// Binary artifact store: original source files and encoded size outputs.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store the original upload bytes in the business folder root.
    async fn write_source(
        &self,
        business: &BusinessRef,
        filename: &str,
        data: &[u8],
    ) -> StorageResult<()>;

    /// Read back a stored source file (used to re-render on edit).
    async fn read_source(&self, business: &BusinessRef, filename: &str)
        -> StorageResult<Vec<u8>>;

    /// Write one encoded output for `(slug, size_tag)`.
    async fn write_output(
        &self,
        business: &BusinessRef,
        image_type: &str,
        slug: &str,
        size_tag: &str,
        data: &[u8],
    ) -> StorageResult<()>;

    /// Remove every encoded output matching `{slug}_*` under the type
    /// folder. Each removal is independently best-effort.
    async fn delete_outputs(&self, business: &BusinessRef, image_type: &str, slug: &str);

    /// Best-effort removal of a stored source file.
    async fn delete_source(&self, business: &BusinessRef, filename: &str);
}
