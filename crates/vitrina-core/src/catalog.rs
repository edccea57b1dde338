//! Image-type catalog
//!
//! The catalog is the declarative description of every image "type" a
//! business can upload (logo, banner, gallery, ...) with its display label,
//! image quota, and named output sizes. It is loaded through the
//! [`CatalogProvider`] seam so deployments can choose the backing store;
//! [`CachedCatalog`] adds the bounded-staleness cache in front of any
//! provider.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_UPLOAD_MB;
use crate::error::AppError;

/// One named output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeConfig {
    pub width: u32,
    pub height: u32,
}

/// Catalog entry for one image type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageTypeConfig {
    pub label: String,
    pub max_images: u32,
    /// Size tag to output resolution. Ordered so generated artifact sets
    /// and listings are deterministic.
    pub sizes: BTreeMap<String, SizeConfig>,
}

/// The full image-type catalog plus the upload size cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaCatalog {
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_size_mb: u64,
    pub image_types: BTreeMap<String, ImageTypeConfig>,
}

fn default_max_upload_mb() -> u64 {
    DEFAULT_MAX_UPLOAD_MB
}

impl MediaCatalog {
    pub fn image_type(&self, name: &str) -> Option<&ImageTypeConfig> {
        self.image_types.get(name)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_size_mb as usize * 1024 * 1024
    }

    /// Reject catalogs that could never produce valid artifacts. A catalog
    /// that fails here is treated the same as a missing one.
    pub fn validate(&self) -> Result<(), AppError> {
        for (type_name, type_config) in &self.image_types {
            if type_config.max_images == 0 {
                return Err(AppError::ConfigUnavailable(format!(
                    "image type '{}' has max_images = 0",
                    type_name
                )));
            }
            if type_config.sizes.is_empty() {
                return Err(AppError::ConfigUnavailable(format!(
                    "image type '{}' defines no output sizes",
                    type_name
                )));
            }
            for (size_tag, size) in &type_config.sizes {
                if size.width == 0 || size.height == 0 {
                    return Err(AppError::ConfigUnavailable(format!(
                        "size '{}' of image type '{}' has a zero dimension",
                        size_tag, type_name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Source of the image-type catalog.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Load the current catalog. Fails with `ConfigUnavailable` when the
    /// backing store is missing or malformed; no photo operation can
    /// proceed without it.
    async fn catalog(&self) -> Result<Arc<MediaCatalog>, AppError>;

    /// Drop any cached state so the next load hits the backing store.
    fn invalidate(&self) {}
}

/// Clock seam so cache expiry is testable without sleeping real time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry {
    loaded_at: Instant,
    catalog: Arc<MediaCatalog>,
}

/// TTL cache in front of any [`CatalogProvider`].
///
/// Concurrent callers during a cache miss may race to reload; the reload is
/// idempotent and cheap, so the race is accepted rather than serialized.
pub struct CachedCatalog<P> {
    inner: P,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    cached: Mutex<Option<CacheEntry>>,
}

impl<P: CatalogProvider> CachedCatalog<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self::with_clock(inner, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(inner: P, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            ttl,
            clock,
            cached: Mutex::new(None),
        }
    }

    fn fresh_entry(&self, now: Instant) -> Option<Arc<MediaCatalog>> {
        let guard = self.cached.lock().expect("catalog cache lock poisoned");
        guard.as_ref().and_then(|entry| {
            if now.duration_since(entry.loaded_at) < self.ttl {
                Some(entry.catalog.clone())
            } else {
                None
            }
        })
    }
}

#[async_trait]
impl<P: CatalogProvider> CatalogProvider for CachedCatalog<P> {
    async fn catalog(&self) -> Result<Arc<MediaCatalog>, AppError> {
        let now = self.clock.now();
        if let Some(catalog) = self.fresh_entry(now) {
            return Ok(catalog);
        }

        let fresh = self.inner.catalog().await?;
        tracing::debug!(
            image_types = fresh.image_types.len(),
            "Image type catalog reloaded"
        );

        let mut guard = self.cached.lock().expect("catalog cache lock poisoned");
        *guard = Some(CacheEntry {
            loaded_at: now,
            catalog: fresh.clone(),
        });
        Ok(fresh)
    }

    fn invalidate(&self) {
        self.cached
            .lock()
            .expect("catalog cache lock poisoned")
            .take();
        self.inner.invalidate();
    }
}
