//! Domain models for the photo pipeline.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The nine-field geometric/color adjustment applied identically by the
/// server render and the client preview.
///
/// Partially supplied input is completed with defaults during
/// deserialization. Only `zoom` carries a bound (floor of 1.0, applied by
/// [`TransformParameters::normalized`]); every other field is preserved
/// as given — large offsets saturate at the crop-extraction step instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformParameters {
    pub zoom: f64,
    pub offset_x: i32,
    pub offset_y: i32,
    pub rotation: f64,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
}

impl Default for TransformParameters {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset_x: 0,
            offset_y: 0,
            rotation: 0.0,
            flip_horizontal: false,
            flip_vertical: false,
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
        }
    }
}

impl TransformParameters {
    /// Apply the zoom floor. `f64::max` also maps a NaN zoom back to 1.0.
    pub fn normalized(mut self) -> Self {
        self.zoom = self.zoom.max(1.0);
        self
    }
}

/// Persisted record of one uploaded image: provenance metadata plus the
/// transform to re-render it without re-upload. Stored as the per-image
/// sidecar, owned exclusively by the asset repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSpec {
    /// Display name as entered by the user.
    pub name: String,
    /// Source filename (original bytes, original extension) in the
    /// business folder root.
    pub source: String,
    #[serde(rename = "type")]
    pub image_type: String,
    pub uploaded_by: Uuid,
    pub uploaded_at: DateTime<Utc>,
    pub transform: TransformParameters,
}

/// One entry in a photo listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSummary {
    pub slug: String,
    pub name: String,
    pub source: String,
    pub uploaded_at: DateTime<Utc>,
    /// Size tag to public URL.
    pub sizes: BTreeMap<String, String>,
}

/// Resolved business identity, supplied by the directory service.
///
/// `tag` is the human-readable prefix used in folder names and URLs
/// (e.g. `daniels-salon`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessRef {
    pub id: Uuid,
    pub tag: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_defaults() {
        let t = TransformParameters::default();
        assert_eq!(t.zoom, 1.0);
        assert_eq!(t.offset_x, 0);
        assert_eq!(t.offset_y, 0);
        assert_eq!(t.rotation, 0.0);
        assert!(!t.flip_horizontal);
        assert!(!t.flip_vertical);
        assert_eq!(t.brightness, 0.0);
        assert_eq!(t.contrast, 0.0);
        assert_eq!(t.saturation, 0.0);
    }

    #[test]
    fn test_transform_partial_json_completed_with_defaults() {
        let t: TransformParameters =
            serde_json::from_str(r#"{"zoom": 1.5, "flip_horizontal": true}"#).unwrap();
        assert_eq!(t.zoom, 1.5);
        assert!(t.flip_horizontal);
        assert_eq!(t.offset_x, 0);
        assert_eq!(t.brightness, 0.0);
    }

    #[test]
    fn test_normalized_applies_zoom_floor() {
        let t = TransformParameters {
            zoom: 0.25,
            ..Default::default()
        }
        .normalized();
        assert_eq!(t.zoom, 1.0);

        let t = TransformParameters {
            zoom: 2.5,
            ..Default::default()
        }
        .normalized();
        assert_eq!(t.zoom, 2.5);
    }

    #[test]
    fn test_normalized_leaves_other_fields_unbounded() {
        let t = TransformParameters {
            rotation: 9000.0,
            offset_x: 100_000,
            brightness: -40.0,
            ..Default::default()
        }
        .normalized();
        assert_eq!(t.rotation, 9000.0);
        assert_eq!(t.offset_x, 100_000);
        assert_eq!(t.brightness, -40.0);
    }

    #[test]
    fn test_image_spec_round_trips_with_type_field_name() {
        let spec = ImageSpec {
            name: "My Shop".to_string(),
            source: "my-shop.jpg".to_string(),
            image_type: "gallery".to_string(),
            uploaded_by: Uuid::new_v4(),
            uploaded_at: Utc::now(),
            transform: TransformParameters::default(),
        };

        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json.get("type").and_then(|v| v.as_str()), Some("gallery"));
        assert!(json.get("image_type").is_none());

        let back: ImageSpec = serde_json::from_value(json).unwrap();
        assert_eq!(back, spec);
    }
}
