//! Vitrina photo CLI — operator tool for the photo pipeline.
//!
//! Set MEDIA_ROOT (and optionally MEDIA_CATALOG_PATH, MEDIA_CATALOG_TTL_SECS,
//! MEDIA_MAX_UPLOAD_MB). Operates directly on the local media root.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use clap::{Parser, Subcommand};
use serde::Serialize;
use uuid::Uuid;

use vitrina_cli::init_tracing;
use vitrina_core::{BusinessRef, CachedCatalog, MediaConfig, TransformParameters};
use vitrina_services::{PhotoService, UploadRequest};
use vitrina_storage::{FileCatalogProvider, LocalMediaStore};

#[derive(Parser)]
#[command(name = "vitrina-photos", about = "Vitrina photo pipeline CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the image-type catalog
    Config,
    /// Upload a photo for a business
    Upload {
        /// Business UUID
        #[arg(long)]
        business: Uuid,
        /// Business tag (folder/URL prefix)
        #[arg(long)]
        tag: String,
        /// Image type from the catalog (e.g. logo, gallery)
        #[arg(long)]
        r#type: String,
        /// Display name of the image
        #[arg(long)]
        name: String,
        /// Path to the image file
        file: PathBuf,
        /// Transform parameters as a JSON object
        #[arg(long)]
        transform: Option<String>,
        /// Uploading user UUID
        #[arg(long)]
        uploaded_by: Option<Uuid>,
    },
    /// List photos, optionally for one type
    List {
        #[arg(long)]
        business: Uuid,
        #[arg(long)]
        tag: String,
        #[arg(long)]
        r#type: Option<String>,
    },
    /// Replace the transform of an existing photo and re-render it
    SetTransform {
        #[arg(long)]
        business: Uuid,
        #[arg(long)]
        tag: String,
        #[arg(long)]
        r#type: String,
        /// Photo slug
        slug: String,
        /// Transform parameters as a JSON object
        #[arg(long)]
        transform: String,
    },
    /// Delete a photo and all of its artifacts
    Delete {
        #[arg(long)]
        business: Uuid,
        #[arg(long)]
        tag: String,
        #[arg(long)]
        r#type: String,
        /// Photo slug
        slug: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn parse_transform(raw: &str) -> anyhow::Result<TransformParameters> {
    serde_json::from_str(raw).context("transform must be a valid JSON object")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = MediaConfig::from_env()?;

    let store = Arc::new(LocalMediaStore::new(&config.media_root).await?);
    let catalog = Arc::new(CachedCatalog::new(
        FileCatalogProvider::new(&config.catalog_path),
        config.catalog_ttl,
    ));
    let service = PhotoService::new(catalog, store.clone(), store);

    match cli.command {
        Commands::Config => {
            let catalog = service.catalog().await?;
            print_json(&*catalog)?;
        }
        Commands::Upload {
            business,
            tag,
            r#type,
            name,
            file,
            transform,
            uploaded_by,
        } => {
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Read {}", file.display()))?;
            let transform = transform.as_deref().map(parse_transform).transpose()?;

            let outcome = service
                .upload(UploadRequest {
                    business: BusinessRef { id: business, tag },
                    image_type: r#type,
                    image_name: name,
                    data: Bytes::from(data),
                    uploaded_by: uploaded_by.unwrap_or_else(Uuid::nil),
                    transform,
                })
                .await?;
            print_json(&outcome)?;
        }
        Commands::List {
            business,
            tag,
            r#type,
        } => {
            let business = BusinessRef { id: business, tag };
            let listed = service.list(&business, r#type.as_deref()).await?;
            print_json(&listed)?;
        }
        Commands::SetTransform {
            business,
            tag,
            r#type,
            slug,
            transform,
        } => {
            let business = BusinessRef { id: business, tag };
            let transform = parse_transform(&transform)?;
            let outcome = service
                .update_transform(&business, &r#type, &slug, transform)
                .await?;
            print_json(&outcome)?;
        }
        Commands::Delete {
            business,
            tag,
            r#type,
            slug,
        } => {
            let business = BusinessRef { id: business, tag };
            service.delete(&business, &r#type, &slug).await?;
            eprintln!("Deleted {}", slug);
        }
    }

    Ok(())
}
