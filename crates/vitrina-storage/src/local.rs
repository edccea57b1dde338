//! Local filesystem backend for the spec and asset stores.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use vitrina_core::constants::{ENCODED_EXT, SPEC_EXT};
use vitrina_core::{BusinessRef, ImageSpec};

use crate::layout;
use crate::traits::{AssetStore, SpecStore, StorageError, StorageResult};

/// Local filesystem implementation of both storage seams.
#[derive(Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
}

impl LocalMediaStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to create media root {}: {}",
                root.display(),
                e
            ))
        })?;
        Ok(Self { root })
    }

    fn business_dir(&self, business: &BusinessRef) -> PathBuf {
        self.root.join(layout::business_folder(business))
    }

    fn type_dir(&self, business: &BusinessRef, image_type: &str) -> StorageResult<PathBuf> {
        layout::validate_component(image_type)?;
        Ok(self.business_dir(business).join(image_type))
    }

    fn spec_path(
        &self,
        business: &BusinessRef,
        image_type: &str,
        slug: &str,
    ) -> StorageResult<PathBuf> {
        layout::validate_component(slug)?;
        Ok(self
            .type_dir(business, image_type)?
            .join(layout::spec_filename(slug)))
    }

    async fn write_file(path: &Path, data: &[u8]) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), size_bytes = data.len(), "File written");
        Ok(())
    }

    /// Remove one file, swallowing every error. Deletion is best-effort by
    /// design: a file that is already gone is not a failure.
    async fn remove_quietly(path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            tracing::debug!(path = %path.display(), error = %e, "Skipped file removal");
        }
    }

    /// Slugs of every sidecar record in a type folder. A missing folder
    /// means no images yet.
    async fn spec_slugs(
        &self,
        business: &BusinessRef,
        image_type: &str,
    ) -> StorageResult<Vec<String>> {
        let dir = self.type_dir(business, image_type)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(_) => return Ok(Vec::new()),
        };

        let suffix = format!(".{}", SPEC_EXT);
        let mut slugs = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let name = entry.file_name();
            if let Some(name) = name.to_str() {
                if let Some(slug) = name.strip_suffix(&suffix) {
                    slugs.push(slug.to_string());
                }
            }
        }
        slugs.sort();
        Ok(slugs)
    }
}

#[async_trait]
impl SpecStore for LocalMediaStore {
    async fn write_spec(
        &self,
        business: &BusinessRef,
        image_type: &str,
        slug: &str,
        spec: &ImageSpec,
    ) -> StorageResult<()> {
        let path = self.spec_path(business, image_type, slug)?;
        let data = serde_json::to_vec_pretty(spec)
            .map_err(|e| StorageError::WriteFailed(format!("Failed to serialize spec: {}", e)))?;
        Self::write_file(&path, &data).await
    }

    async fn read_spec(
        &self,
        business: &BusinessRef,
        image_type: &str,
        slug: &str,
    ) -> StorageResult<ImageSpec> {
        let path = self.spec_path(business, image_type, slug)?;
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::SpecNotFound(slug.to_string()));
            }
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };
        serde_json::from_slice(&raw).map_err(|e| {
            StorageError::ReadFailed(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    async fn list_specs(
        &self,
        business: &BusinessRef,
        image_type: &str,
    ) -> StorageResult<Vec<(String, ImageSpec)>> {
        let mut specs = Vec::new();
        for slug in self.spec_slugs(business, image_type).await? {
            match self.read_spec(business, image_type, &slug).await {
                Ok(spec) => specs.push((slug, spec)),
                Err(e) => {
                    tracing::debug!(slug = %slug, error = %e, "Skipped unreadable spec");
                }
            }
        }
        Ok(specs)
    }

    async fn existing_slugs(
        &self,
        business: &BusinessRef,
        image_type: &str,
    ) -> StorageResult<HashSet<String>> {
        Ok(self
            .spec_slugs(business, image_type)
            .await?
            .into_iter()
            .collect())
    }

    async fn count_images(
        &self,
        business: &BusinessRef,
        image_type: &str,
    ) -> StorageResult<usize> {
        Ok(self.spec_slugs(business, image_type).await?.len())
    }

    async fn delete_spec(&self, business: &BusinessRef, image_type: &str, slug: &str) {
        if let Ok(path) = self.spec_path(business, image_type, slug) {
            Self::remove_quietly(&path).await;
        }
    }
}

#[async_trait]
impl AssetStore for LocalMediaStore {
    async fn write_source(
        &self,
        business: &BusinessRef,
        filename: &str,
        data: &[u8],
    ) -> StorageResult<()> {
        layout::validate_component(filename)?;
        let path = self.business_dir(business).join(filename);
        Self::write_file(&path, data).await
    }

    async fn read_source(
        &self,
        business: &BusinessRef,
        filename: &str,
    ) -> StorageResult<Vec<u8>> {
        layout::validate_component(filename)?;
        let path = self.business_dir(business).join(filename);
        fs::read(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read {}: {}", path.display(), e))
        })
    }

    async fn write_output(
        &self,
        business: &BusinessRef,
        image_type: &str,
        slug: &str,
        size_tag: &str,
        data: &[u8],
    ) -> StorageResult<()> {
        layout::validate_component(slug)?;
        layout::validate_component(size_tag)?;
        let path = self
            .type_dir(business, image_type)?
            .join(layout::output_filename(slug, size_tag));
        Self::write_file(&path, data).await
    }

    async fn delete_outputs(&self, business: &BusinessRef, image_type: &str, slug: &str) {
        let dir = match self.type_dir(business, image_type) {
            Ok(dir) => dir,
            Err(_) => return,
        };
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(_) => return,
        };

        let prefix = layout::output_prefix(slug);
        let suffix = format!(".{}", ENCODED_EXT);
        while let Ok(Some(entry)) = entries.next_entry().await {
            let name = entry.file_name();
            if let Some(name) = name.to_str() {
                if name.starts_with(&prefix) && name.ends_with(&suffix) {
                    Self::remove_quietly(&entry.path()).await;
                }
            }
        }
    }

    async fn delete_source(&self, business: &BusinessRef, filename: &str) {
        if layout::validate_component(filename).is_err() {
            return;
        }
        let path = self.business_dir(business).join(filename);
        Self::remove_quietly(&path).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;
    use uuid::Uuid;
    use vitrina_core::TransformParameters;

    fn business() -> BusinessRef {
        BusinessRef {
            id: Uuid::new_v4(),
            tag: "test-biz".to_string(),
        }
    }

    fn spec(name: &str) -> ImageSpec {
        ImageSpec {
            name: name.to_string(),
            source: "my-shop.jpg".to_string(),
            image_type: "gallery".to_string(),
            uploaded_by: Uuid::new_v4(),
            uploaded_at: Utc::now(),
            transform: TransformParameters::default(),
        }
    }

    #[tokio::test]
    async fn test_spec_write_read_round_trip() {
        let dir = tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path()).await.unwrap();
        let business = business();

        let original = spec("My Shop");
        store
            .write_spec(&business, "gallery", "my-shop", &original)
            .await
            .unwrap();

        let read = store
            .read_spec(&business, "gallery", "my-shop")
            .await
            .unwrap();
        assert_eq!(read, original);
    }

    #[tokio::test]
    async fn test_read_missing_spec_is_not_found() {
        let dir = tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path()).await.unwrap();

        let result = store.read_spec(&business(), "gallery", "absent").await;
        assert!(matches!(result, Err(StorageError::SpecNotFound(_))));
    }

    #[tokio::test]
    async fn test_count_and_existing_slugs() {
        let dir = tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path()).await.unwrap();
        let business = business();

        assert_eq!(store.count_images(&business, "gallery").await.unwrap(), 0);

        store
            .write_spec(&business, "gallery", "one", &spec("One"))
            .await
            .unwrap();
        store
            .write_spec(&business, "gallery", "two", &spec("Two"))
            .await
            .unwrap();

        assert_eq!(store.count_images(&business, "gallery").await.unwrap(), 2);
        let slugs = store.existing_slugs(&business, "gallery").await.unwrap();
        assert!(slugs.contains("one"));
        assert!(slugs.contains("two"));

        // Other types are independent
        assert_eq!(store.count_images(&business, "logo").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_skips_unreadable_specs() {
        let dir = tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path()).await.unwrap();
        let business = business();

        store
            .write_spec(&business, "gallery", "good", &spec("Good"))
            .await
            .unwrap();

        // Corrupt sidecar next to it
        let type_dir = dir
            .path()
            .join(layout::business_folder(&business))
            .join("gallery");
        std::fs::write(type_dir.join("broken.json"), b"{not json").unwrap();

        let listed = store.list_specs(&business, "gallery").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0, "good");
    }

    #[tokio::test]
    async fn test_delete_outputs_matches_prefix_only() {
        let dir = tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path()).await.unwrap();
        let business = business();

        store
            .write_output(&business, "gallery", "my-shop", "thumb", b"a")
            .await
            .unwrap();
        store
            .write_output(&business, "gallery", "my-shop", "large", b"b")
            .await
            .unwrap();
        store
            .write_output(&business, "gallery", "my-shop-2", "thumb", b"c")
            .await
            .unwrap();

        store.delete_outputs(&business, "gallery", "my-shop").await;

        let type_dir = dir
            .path()
            .join(layout::business_folder(&business))
            .join("gallery");
        assert!(!type_dir.join("my-shop_thumb.webp").exists());
        assert!(!type_dir.join("my-shop_large.webp").exists());
        assert!(type_dir.join("my-shop-2_thumb.webp").exists());
    }

    #[tokio::test]
    async fn test_best_effort_deletes_tolerate_missing_files() {
        let dir = tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path()).await.unwrap();
        let business = business();

        // None of these exist; none of these panic or error
        store.delete_spec(&business, "gallery", "ghost").await;
        store.delete_outputs(&business, "gallery", "ghost").await;
        store.delete_source(&business, "ghost.jpg").await;
    }

    #[tokio::test]
    async fn test_source_write_read() {
        let dir = tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path()).await.unwrap();
        let business = business();

        store
            .write_source(&business, "my-shop.jpg", b"jpeg bytes")
            .await
            .unwrap();
        let data = store.read_source(&business, "my-shop.jpg").await.unwrap();
        assert_eq!(data, b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path()).await.unwrap();
        let business = business();

        let result = store
            .read_spec(&business, "../../../etc", "passwd")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidComponent(_))));

        let result = store.read_source(&business, "../secret.txt").await;
        assert!(matches!(result, Err(StorageError::InvalidComponent(_))));

        let result = store
            .write_output(&business, "gallery", "..", "thumb", b"x")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidComponent(_))));
    }
}
