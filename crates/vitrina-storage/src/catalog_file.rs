//! File-backed catalog provider.
//!
//! Reads the declarative image-type catalog from a JSON file under the
//! media root. A missing or malformed file is a hard failure
//! (`ConfigUnavailable`) — no photo operation can proceed without the
//! catalog.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use vitrina_core::{AppError, CatalogProvider, MediaCatalog};

pub struct FileCatalogProvider {
    path: PathBuf,
}

impl FileCatalogProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogProvider for FileCatalogProvider {
    async fn catalog(&self) -> Result<Arc<MediaCatalog>, AppError> {
        let raw = fs::read(&self.path).await.map_err(|e| {
            AppError::ConfigUnavailable(format!("{}: {}", self.path.display(), e))
        })?;

        let catalog: MediaCatalog = serde_json::from_slice(&raw).map_err(|e| {
            AppError::ConfigUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        catalog.validate()?;

        Ok(Arc::new(catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CATALOG_JSON: &str = r#"{
        "max_upload_size_mb": 8,
        "image_types": {
            "logo": {
                "label": "Logo",
                "max_images": 1,
                "sizes": {
                    "thumb": { "width": 150, "height": 150 },
                    "full": { "width": 600, "height": 600 }
                }
            },
            "gallery": {
                "label": "Gallery",
                "max_images": 10,
                "sizes": {
                    "card": { "width": 400, "height": 300 }
                }
            }
        }
    }"#;

    #[tokio::test]
    async fn test_loads_valid_catalog() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app-config.json");
        std::fs::write(&path, CATALOG_JSON).unwrap();

        let provider = FileCatalogProvider::new(&path);
        let catalog = provider.catalog().await.unwrap();

        assert_eq!(catalog.max_upload_size_mb, 8);
        assert_eq!(catalog.image_types.len(), 2);
        let logo = catalog.image_type("logo").unwrap();
        assert_eq!(logo.max_images, 1);
        assert_eq!(logo.sizes.len(), 2);
        assert_eq!(logo.sizes["thumb"].width, 150);
    }

    #[tokio::test]
    async fn test_missing_file_is_config_unavailable() {
        let dir = tempdir().unwrap();
        let provider = FileCatalogProvider::new(dir.path().join("absent.json"));
        assert!(matches!(
            provider.catalog().await,
            Err(AppError::ConfigUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_file_is_config_unavailable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app-config.json");
        std::fs::write(&path, "{not json at all").unwrap();

        let provider = FileCatalogProvider::new(&path);
        assert!(matches!(
            provider.catalog().await,
            Err(AppError::ConfigUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_catalog_is_config_unavailable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app-config.json");
        std::fs::write(
            &path,
            r#"{"image_types": {"logo": {"label": "Logo", "max_images": 0, "sizes": {"thumb": {"width": 150, "height": 150}}}}}"#,
        )
        .unwrap();

        let provider = FileCatalogProvider::new(&path);
        assert!(matches!(
            provider.catalog().await,
            Err(AppError::ConfigUnavailable(_))
        ));
    }
}
