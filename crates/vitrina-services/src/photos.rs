//! Photo service
//!
//! Orchestrates the four operations exposed to the request-handling layer:
//! upload, list, update-transform, and delete. Each request is handled
//! independently — there is no cross-request locking. Two uploads racing
//! on the same display name may resolve to the same slug (last writer
//! wins), and an edit racing a delete may resurrect a spec; both are
//! accepted limitations of the single-admin-per-business model.

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use vitrina_core::catalog::ImageTypeConfig;
use vitrina_core::{
    resolve_conflict, slugify, AppError, BusinessRef, CatalogProvider, ImageSpec, ImageSummary,
    MediaCatalog, TransformParameters,
};
use vitrina_processing::engine::{self, RenderError, TargetSize};
use vitrina_processing::{UploadValidator, ValidationError};
use vitrina_storage::{layout, AssetStore, SpecStore, StorageError};

/// Inputs for one photo upload.
pub struct UploadRequest {
    pub business: BusinessRef,
    pub image_type: String,
    pub image_name: String,
    pub data: Bytes,
    pub uploaded_by: Uuid,
    pub transform: Option<TransformParameters>,
}

/// Result of a successful upload. `warning` is present iff the resolved
/// slug differs from the naive slugification of the display name.
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub slug: String,
    pub image_type: String,
    pub name: String,
    pub sizes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Result of a successful transform update.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateOutcome {
    pub slug: String,
    pub image_type: String,
    pub name: String,
    pub sizes: BTreeMap<String, String>,
}

/// The photo pipeline service.
pub struct PhotoService {
    catalog: Arc<dyn CatalogProvider>,
    specs: Arc<dyn SpecStore>,
    assets: Arc<dyn AssetStore>,
}

impl PhotoService {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        specs: Arc<dyn SpecStore>,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        Self {
            catalog,
            specs,
            assets,
        }
    }

    /// Current image-type catalog, exposed for the request layer's config
    /// endpoint.
    pub async fn catalog(&self) -> Result<Arc<MediaCatalog>, AppError> {
        self.catalog.catalog().await
    }

    /// Upload a new photo: validate, resolve identity, store the source
    /// and spec, then render one encoded output per configured size.
    pub async fn upload(&self, request: UploadRequest) -> Result<UploadOutcome, AppError> {
        let catalog = self.catalog.catalog().await?;
        let type_config = catalog
            .image_type(&request.image_type)
            .ok_or_else(|| AppError::UnknownImageType(request.image_type.clone()))?;

        let validator = UploadValidator::new(catalog.max_upload_bytes());
        let format = validator
            .validate(&request.data)
            .map_err(map_validation)?;

        let count = self
            .specs
            .count_images(&request.business, &request.image_type)
            .await
            .map_err(map_storage)?;
        if count >= type_config.max_images as usize {
            return Err(AppError::MaxImagesReached {
                image_type: request.image_type.clone(),
                max: type_config.max_images,
            });
        }

        let base_slug = slugify(&request.image_name);
        let existing = self
            .specs
            .existing_slugs(&request.business, &request.image_type)
            .await
            .map_err(map_storage)?;
        let slug = resolve_conflict(&base_slug, &existing);
        let warning = (slug != base_slug).then(|| {
            format!(
                "Image name was adjusted to \"{}\" to avoid a filename conflict.",
                slug
            )
        });

        let transform = request.transform.unwrap_or_default().normalized();

        let source_filename = layout::source_filename(&slug, format.ext());
        self.assets
            .write_source(&request.business, &source_filename, &request.data)
            .await
            .map_err(map_storage)?;

        let spec = ImageSpec {
            name: request.image_name.clone(),
            source: source_filename,
            image_type: request.image_type.clone(),
            uploaded_by: request.uploaded_by,
            uploaded_at: Utc::now(),
            transform,
        };
        self.specs
            .write_spec(&request.business, &request.image_type, &slug, &spec)
            .await
            .map_err(map_storage)?;

        let sizes = self
            .render_outputs(
                &request.business,
                &request.image_type,
                &slug,
                type_config,
                request.data.clone(),
                transform,
            )
            .await?;

        tracing::info!(
            business_id = %request.business.id,
            image_type = %request.image_type,
            slug = %slug,
            "Photo uploaded"
        );

        Ok(UploadOutcome {
            slug,
            image_type: request.image_type,
            name: request.image_name,
            sizes,
            warning,
        })
    }

    /// List photos, grouped by type, or for one type only. Unreadable
    /// specs are skipped; artifacts for sizes no longer in the catalog
    /// are simply not listed.
    pub async fn list(
        &self,
        business: &BusinessRef,
        image_type: Option<&str>,
    ) -> Result<BTreeMap<String, Vec<ImageSummary>>, AppError> {
        let catalog = self.catalog.catalog().await?;

        let type_names: Vec<String> = match image_type {
            Some(name) => {
                if catalog.image_type(name).is_none() {
                    return Err(AppError::UnknownImageType(name.to_string()));
                }
                vec![name.to_string()]
            }
            None => catalog.image_types.keys().cloned().collect(),
        };

        let mut result = BTreeMap::new();
        for type_name in type_names {
            let type_config = catalog
                .image_type(&type_name)
                .ok_or_else(|| AppError::UnknownImageType(type_name.clone()))?;

            let mut summaries = Vec::new();
            for (slug, spec) in self
                .specs
                .list_specs(business, &type_name)
                .await
                .map_err(map_storage)?
            {
                let sizes = type_config
                    .sizes
                    .keys()
                    .map(|tag| {
                        (
                            tag.clone(),
                            layout::output_url(business, &type_name, &slug, tag),
                        )
                    })
                    .collect();
                summaries.push(ImageSummary {
                    slug,
                    name: spec.name,
                    source: spec.source,
                    uploaded_at: spec.uploaded_at,
                    sizes,
                });
            }
            result.insert(type_name, summaries);
        }
        Ok(result)
    }

    /// Replace the transform of an existing image and regenerate every
    /// size output from the stored source. The slug never changes.
    pub async fn update_transform(
        &self,
        business: &BusinessRef,
        image_type: &str,
        slug: &str,
        transform: TransformParameters,
    ) -> Result<UpdateOutcome, AppError> {
        let catalog = self.catalog.catalog().await?;
        let type_config = catalog
            .image_type(image_type)
            .ok_or_else(|| AppError::UnknownImageType(image_type.to_string()))?;

        let existing = self
            .specs
            .read_spec(business, image_type, slug)
            .await
            .map_err(map_storage)?;

        // Stale outputs go before regeneration so a failed render cannot
        // leave a mixed set behind.
        self.assets.delete_outputs(business, image_type, slug).await;

        let transform = transform.normalized();
        let updated = ImageSpec {
            transform,
            ..existing
        };
        self.specs
            .write_spec(business, image_type, slug, &updated)
            .await
            .map_err(map_storage)?;

        let source = self
            .assets
            .read_source(business, &updated.source)
            .await
            .map_err(map_storage)?;
        let sizes = self
            .render_outputs(
                business,
                image_type,
                slug,
                type_config,
                Bytes::from(source),
                transform,
            )
            .await?;

        tracing::info!(
            business_id = %business.id,
            image_type = %image_type,
            slug = %slug,
            "Photo transform updated"
        );

        Ok(UpdateOutcome {
            slug: slug.to_string(),
            image_type: image_type.to_string(),
            name: updated.name,
            sizes,
        })
    }

    /// Delete one image and all of its artifacts. Fails with `NotFound`
    /// when the spec is absent; past that point every removal is
    /// best-effort and the operation always succeeds. Cleaning up
    /// references in business content documents is the caller's job.
    pub async fn delete(
        &self,
        business: &BusinessRef,
        image_type: &str,
        slug: &str,
    ) -> Result<(), AppError> {
        let spec = self
            .specs
            .read_spec(business, image_type, slug)
            .await
            .map_err(map_storage)?;

        self.specs.delete_spec(business, image_type, slug).await;
        self.assets.delete_outputs(business, image_type, slug).await;
        self.assets.delete_source(business, &spec.source).await;

        tracing::info!(
            business_id = %business.id,
            image_type = %image_type,
            slug = %slug,
            "Photo deleted"
        );

        Ok(())
    }

    /// Render and store one encoded output per configured size, returning
    /// the size tag to URL mapping. Rendering runs on the blocking pool;
    /// each size is an independent engine call.
    async fn render_outputs(
        &self,
        business: &BusinessRef,
        image_type: &str,
        slug: &str,
        type_config: &ImageTypeConfig,
        source: Bytes,
        transform: TransformParameters,
    ) -> Result<BTreeMap<String, String>, AppError> {
        let mut sizes = BTreeMap::new();
        for (size_tag, size) in &type_config.sizes {
            let target = TargetSize {
                width: size.width,
                height: size.height,
            };
            let source = source.clone();
            let encoded =
                tokio::task::spawn_blocking(move || engine::render(&source, &transform, target))
                    .await
                    .map_err(|e| AppError::Internal(format!("Render task failed: {}", e)))?
                    .map_err(map_render)?;

            self.assets
                .write_output(business, image_type, slug, size_tag, &encoded)
                .await
                .map_err(map_storage)?;
            sizes.insert(
                size_tag.clone(),
                layout::output_url(business, image_type, slug, size_tag),
            );
        }
        Ok(sizes)
    }
}

fn map_storage(err: StorageError) -> AppError {
    match err {
        StorageError::SpecNotFound(slug) => AppError::NotFound(format!("Image not found: {}", slug)),
        other => AppError::Storage(other.to_string()),
    }
}

fn map_validation(err: ValidationError) -> AppError {
    match err {
        ValidationError::FileTooLarge { size, max } => AppError::PayloadTooLarge { size, max },
        ValidationError::EmptyFile | ValidationError::UnrecognizedFormat => {
            AppError::InvalidImageData(err.to_string())
        }
    }
}

fn map_render(err: RenderError) -> AppError {
    match err {
        RenderError::Decode(e) => AppError::InvalidImageData(e.to_string()),
        RenderError::Encode(msg) => AppError::EncodeFailure(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_not_found_maps_to_not_found() {
        let err = map_storage(StorageError::SpecNotFound("my-shop".into()));
        assert!(matches!(err, AppError::NotFound(_)));

        let err = map_storage(StorageError::WriteFailed("disk full".into()));
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[test]
    fn test_validation_mapping() {
        let err = map_validation(ValidationError::FileTooLarge { size: 10, max: 5 });
        assert!(matches!(
            err,
            AppError::PayloadTooLarge { size: 10, max: 5 }
        ));

        let err = map_validation(ValidationError::UnrecognizedFormat);
        assert!(matches!(err, AppError::InvalidImageData(_)));
    }

    #[test]
    fn test_render_mapping() {
        let err = map_render(RenderError::Encode("boom".into()));
        assert!(matches!(err, AppError::EncodeFailure(_)));
    }
}
