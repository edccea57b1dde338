//! Transform engine
//!
//! Applies the canonical 7-step pipeline to a source image buffer for one
//! target size and returns the encoded output. The step order is fixed —
//! the client-side preview renderer mirrors steps 1-6, and visual parity
//! depends on both sides agreeing on it:
//!
//!   1. brightness + saturation (single color modulation)
//!   2. contrast (midpoint-preserving linear map)
//!   3. rotation (clockwise, exposed pixels opaque black)
//!   4. flips (horizontal, then vertical)
//!   5. cover-fit resize to the zoomed dimensions
//!   6. crop extraction (center + offsets, clamped inside)
//!   7. WebP encode at fixed quality

use bytes::Bytes;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

use vitrina_core::constants::ENCODE_QUALITY;
use vitrina_core::TransformParameters;

/// Target output resolution for one render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("source image cannot be decoded: {0}")]
    Decode(#[from] image::ImageError),

    #[error("output encoding failed: {0}")]
    Encode(String),
}

/// Render one encoded output from source bytes.
///
/// Deterministic: the same source, transform, and target always produce
/// byte-identical output. No partial output is ever returned.
pub fn render(
    source: &[u8],
    transform: &TransformParameters,
    target: TargetSize,
) -> Result<Bytes, RenderError> {
    let transform = transform.normalized();

    let decoded = image::load_from_memory(source)?;
    let mut img = decoded.into_rgb8();

    // 1. Brightness + saturation. Our -1..+1 range maps to 0..2 multipliers,
    //    floored at zero.
    let brightness_mult = ((1.0 + transform.brightness).max(0.0)) as f32;
    let saturation_mult = ((1.0 + transform.saturation).max(0.0)) as f32;
    if brightness_mult != 1.0 || saturation_mult != 1.0 {
        modulate(&mut img, brightness_mult, saturation_mult);
    }

    // 2. Contrast: out = a*in + b with b chosen so 128 maps to 128.
    if transform.contrast != 0.0 {
        let a = (1.0 + transform.contrast) as f32;
        let b = 128.0 * (1.0 - a);
        apply_linear(&mut img, a, b);
    }

    // 3. Rotation (clockwise degrees) into an expanded bounding box.
    if transform.rotation != 0.0 {
        img = rotate_expanded(&img, transform.rotation);
    }

    // 4. Flips.
    if transform.flip_horizontal {
        img = imageops::flip_horizontal(&img);
    }
    if transform.flip_vertical {
        img = imageops::flip_vertical(&img);
    }

    // 5. Resize so the zoomed image fully covers the target dimensions.
    let zoomed_w = (target.width as f64 * transform.zoom).round() as u32;
    let zoomed_h = (target.height as f64 * transform.zoom).round() as u32;
    let zoomed = DynamicImage::ImageRgb8(img)
        .resize_to_fill(zoomed_w, zoomed_h, FilterType::Lanczos3)
        .into_rgb8();

    // 6. Extract the target region, centred on the zoomed image + offset.
    let (crop_left, crop_top) = crop_origin(
        zoomed_w,
        zoomed_h,
        target,
        transform.offset_x,
        transform.offset_y,
    );
    let cropped =
        imageops::crop_imm(&zoomed, crop_left, crop_top, target.width, target.height).to_image();

    // 7. Encode as WebP.
    let encoded = encode_webp(&cropped)?;
    tracing::debug!(
        target_w = target.width,
        target_h = target.height,
        encoded_bytes = encoded.len(),
        "Rendered output"
    );
    Ok(encoded)
}

/// Crop origin: the center of the zoomed image shifted by the offsets, then
/// clamped so the crop rectangle stays fully inside. This clamp is the only
/// bound placed on offset magnitude.
fn crop_origin(
    zoomed_w: u32,
    zoomed_h: u32,
    target: TargetSize,
    offset_x: i32,
    offset_y: i32,
) -> (u32, u32) {
    let max_left = zoomed_w.saturating_sub(target.width) as i64;
    let max_top = zoomed_h.saturating_sub(target.height) as i64;
    let left = ((zoomed_w as f64 - target.width as f64) / 2.0 + offset_x as f64).round() as i64;
    let top = ((zoomed_h as f64 - target.height as f64) / 2.0 + offset_y as f64).round() as i64;
    (
        left.clamp(0, max_left) as u32,
        top.clamp(0, max_top) as u32,
    )
}

/// Single-pass brightness/saturation modulation. Saturation interpolates
/// each channel against Rec.709 luma before the brightness multiply.
fn modulate(img: &mut RgbImage, brightness: f32, saturation: f32) {
    for pixel in img.pixels_mut() {
        let [r, g, b] = pixel.0;
        let (r, g, b) = (r as f32, g as f32, b as f32);
        let luma = 0.2126 * r + 0.7152 * g + 0.0722 * b;
        pixel.0 = [
            to_channel((luma + (r - luma) * saturation) * brightness),
            to_channel((luma + (g - luma) * saturation) * brightness),
            to_channel((luma + (b - luma) * saturation) * brightness),
        ];
    }
}

fn apply_linear(img: &mut RgbImage, a: f32, b: f32) {
    for pixel in img.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = to_channel(a * (*channel as f32) + b);
        }
    }
}

fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Rotate clockwise by `degrees` into a canvas sized to the rotated
/// bounding box; pixels outside the original frame are opaque black.
fn rotate_expanded(img: &RgbImage, degrees: f64) -> RgbImage {
    let theta = degrees.to_radians() as f32;
    let (w, h) = img.dimensions();
    let (abs_sin, abs_cos) = (theta.sin().abs(), theta.cos().abs());
    let out_w = (w as f32 * abs_cos + h as f32 * abs_sin).round().max(1.0) as u32;
    let out_h = (w as f32 * abs_sin + h as f32 * abs_cos).round().max(1.0) as u32;

    let projection = Projection::translate(out_w as f32 / 2.0, out_h as f32 / 2.0)
        * Projection::rotate(theta)
        * Projection::translate(-(w as f32) / 2.0, -(h as f32) / 2.0);

    let black = Rgb([0u8, 0, 0]);
    let mut out = RgbImage::from_pixel(out_w, out_h, black);
    warp_into(img, &projection, Interpolation::Bilinear, black, &mut out);
    out
}

fn encode_webp(img: &RgbImage) -> Result<Bytes, RenderError> {
    let (w, h) = img.dimensions();
    let encoded = webp::Encoder::from_rgb(img.as_raw(), w, h)
        .encode_simple(false, ENCODE_QUALITY)
        .map_err(|e| RenderError::Encode(format!("{:?}", e)))?;
    Ok(Bytes::copy_from_slice(&encoded))
}
