//! Client-side mirror of the transform parameters.
//!
//! The preview is a deliberate parallel implementation of the server
//! pipeline: it carries its own copy of the nine-field record so the wasm
//! module stays free of the server dependency tree. Field names, defaults,
//! and the zoom floor must match the server exactly.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewTransform {
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

impl Default for PreviewTransform {
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

impl PreviewTransform {
    /// Apply the zoom floor, matching the server's normalization.
    pub fn normalized(mut self) -> Self {
        self.zoom = self.zoom.max(1.0);
        self
    }
}

/// Scale that makes a `natural_w × natural_h` image cover a `w × h`
/// surface, with the zoom applied on top. Mirrors step 5 of the server
/// pipeline in canvas space.
pub(crate) fn cover_scale(natural_w: f64, natural_h: f64, w: f64, h: f64, zoom: f64) -> f64 {
    (w / natural_w).max(h / natural_h) * zoom.max(1.0)
}
