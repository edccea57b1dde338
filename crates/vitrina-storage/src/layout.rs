//! Shared on-disk layout and URL scheme.
//!
//! Layout: `{root}/{tag}_{businessId}/` holds source files
//! (`{slug}.{ext}`); each image type gets a subfolder with the sidecar
//! records (`{slug}.json`) and encoded outputs (`{slug}_{sizeTag}.webp`).
//! All backends must use this layout for consistency.

use vitrina_core::constants::{ENCODED_EXT, SPEC_EXT};
use vitrina_core::BusinessRef;

use crate::traits::{StorageError, StorageResult};

/// Folder name of one business under the media root.
pub fn business_folder(business: &BusinessRef) -> String {
    format!("{}_{}", business.tag, business.id)
}

pub fn spec_filename(slug: &str) -> String {
    format!("{}.{}", slug, SPEC_EXT)
}

pub fn source_filename(slug: &str, ext: &str) -> String {
    format!("{}.{}", slug, ext)
}

pub fn output_filename(slug: &str, size_tag: &str) -> String {
    format!("{}_{}.{}", slug, size_tag, ENCODED_EXT)
}

/// Filename prefix shared by every encoded output of one slug.
pub fn output_prefix(slug: &str) -> String {
    format!("{}_", slug)
}

/// Public URL of one encoded output.
pub fn output_url(
    business: &BusinessRef,
    image_type: &str,
    slug: &str,
    size_tag: &str,
) -> String {
    format!(
        "/media/{}/{}/{}",
        business_folder(business),
        image_type,
        output_filename(slug, size_tag)
    )
}

/// Reject path components that could resolve outside the media root.
pub fn validate_component(component: &str) -> StorageResult<()> {
    if component.is_empty()
        || component.contains('/')
        || component.contains('\\')
        || component.contains("..")
        || component.starts_with('.')
    {
        return Err(StorageError::InvalidComponent(component.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn business() -> BusinessRef {
        BusinessRef {
            id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            tag: "daniels-salon".to_string(),
        }
    }

    #[test]
    fn test_business_folder_name() {
        assert_eq!(
            business_folder(&business()),
            "daniels-salon_550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn test_filenames() {
        assert_eq!(spec_filename("my-shop"), "my-shop.json");
        assert_eq!(source_filename("my-shop", "jpg"), "my-shop.jpg");
        assert_eq!(output_filename("my-shop", "thumb"), "my-shop_thumb.webp");
        assert_eq!(output_prefix("my-shop"), "my-shop_");
    }

    #[test]
    fn test_output_url_scheme() {
        assert_eq!(
            output_url(&business(), "gallery", "my-shop", "thumb"),
            "/media/daniels-salon_550e8400-e29b-41d4-a716-446655440000/gallery/my-shop_thumb.webp"
        );
    }

    #[test]
    fn test_suffixed_slug_prefix_does_not_shadow_base() {
        // Outputs of "my-shop-2" must never match the prefix of "my-shop"
        assert!(!output_filename("my-shop-2", "thumb").starts_with(&output_prefix("my-shop")));
    }

    #[test]
    fn test_validate_component() {
        assert!(validate_component("gallery").is_ok());
        assert!(validate_component("my-shop-2").is_ok());
        assert!(validate_component("").is_err());
        assert!(validate_component("a/b").is_err());
        assert!(validate_component("a\\b").is_err());
        assert!(validate_component("..").is_err());
        assert!(validate_component("..evil").is_err());
        assert!(validate_component(".hidden").is_err());
    }
}
