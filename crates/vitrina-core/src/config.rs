//! Configuration module
//!
//! Environment-driven configuration for the photo pipeline service. The
//! binary loads `.env` (if present) before calling [`MediaConfig::from_env`].

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_CATALOG_TTL_SECS, DEFAULT_MAX_UPLOAD_MB};

/// Photo pipeline configuration.
#[derive(Clone, Debug)]
pub struct MediaConfig {
    /// Root directory of all business media folders.
    pub media_root: PathBuf,
    /// Path of the image-type catalog file.
    pub catalog_path: PathBuf,
    /// Catalog cache TTL.
    pub catalog_ttl: Duration,
    /// Fallback upload cap in megabytes, used when the catalog omits one.
    pub max_upload_mb: u64,
}

impl MediaConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let media_root = PathBuf::from(
            env::var("MEDIA_ROOT")
                .map_err(|_| anyhow::anyhow!("MEDIA_ROOT environment variable must be set"))?,
        );

        let catalog_path = env::var("MEDIA_CATALOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| media_root.join("app-config.json"));

        let catalog_ttl_secs = match env::var("MEDIA_CATALOG_TTL_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("MEDIA_CATALOG_TTL_SECS must be an integer"))?,
            Err(_) => DEFAULT_CATALOG_TTL_SECS,
        };

        let max_upload_mb = match env::var("MEDIA_MAX_UPLOAD_MB") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("MEDIA_MAX_UPLOAD_MB must be an integer"))?,
            Err(_) => DEFAULT_MAX_UPLOAD_MB,
        };

        let config = Self {
            media_root,
            catalog_path,
            catalog_ttl: Duration::from_secs(catalog_ttl_secs),
            max_upload_mb,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.media_root.as_os_str().is_empty() {
            anyhow::bail!("MEDIA_ROOT must not be empty");
        }
        if self.max_upload_mb == 0 {
            anyhow::bail!("MEDIA_MAX_UPLOAD_MB must be greater than zero");
        }
        Ok(())
    }
}
