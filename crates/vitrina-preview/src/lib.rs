//! Vitrina Preview Library
//!
//! Browser-side live preview of the photo transform pipeline, compiled to
//! WebAssembly. Mirrors steps 1-6 of the server engine on a Canvas 2D
//! surface so editors see the effect of every slider change before
//! committing — synchronously, with no network round-trip.
//!
//! The preview operates on whatever down-sampled source the page supplies
//! (an object URL during upload, the smallest stored output during edit).
//! Pixel-exact parity with the server render is not required; crop framing
//! and the direction of every color adjustment must match.

mod transform;

pub use transform::PreviewTransform;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use transform::cover_scale;

/// Client-observed lifecycle of one preview image. Transform edits redraw
/// within `Ready`; only a source change re-enters `SourceLoading`.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    NoSource,
    SourceLoading,
    Ready,
}

struct Inner {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    image: Option<HtmlImageElement>,
    transform: PreviewTransform,
    target_width: f64,
    target_height: f64,
    state: PreviewState,
}

impl Inner {
    fn clear(&self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn draw(&self) -> Result<(), JsValue> {
        let image = match (&self.image, self.state) {
            (Some(image), PreviewState::Ready) => image,
            _ => {
                self.clear();
                return Ok(());
            }
        };

        let natural_w = image.natural_width() as f64;
        let natural_h = image.natural_height() as f64;
        if natural_w == 0.0 || natural_h == 0.0 {
            self.clear();
            return Ok(());
        }

        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        let t = &self.transform;

        self.clear();

        // Steps 1-2: color adjustments through the context filter.
        self.ctx.set_filter(&format!(
            "brightness({}) contrast({}) saturate({})",
            1.0 + t.brightness,
            1.0 + t.contrast,
            1.0 + t.saturation
        ));

        // Steps 3-6: centre, rotate, flip, cover-scale with zoom, offset.
        self.ctx.save();
        self.ctx.translate(w / 2.0, h / 2.0)?;
        self.ctx.rotate(t.rotation.to_radians())?;
        if t.flip_horizontal {
            self.ctx.scale(-1.0, 1.0)?;
        }
        if t.flip_vertical {
            self.ctx.scale(1.0, -1.0)?;
        }

        let scale = cover_scale(natural_w, natural_h, w, h, t.zoom);
        let draw_w = natural_w * scale;
        let draw_h = natural_h * scale;

        // Offsets are in target-image pixels; translate proportionally in
        // canvas space.
        self.ctx.translate(
            t.offset_x as f64 / self.target_width * w,
            t.offset_y as f64 / self.target_height * h,
        )?;

        self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            image,
            -draw_w / 2.0,
            -draw_h / 2.0,
            draw_w,
            draw_h,
        )?;
        self.ctx.restore();
        self.ctx.set_filter("none");
        Ok(())
    }
}

/// Live preview renderer bound to one canvas.
#[wasm_bindgen]
pub struct PreviewRenderer {
    inner: Rc<RefCell<Inner>>,
    // Kept alive so the image onload callback stays valid.
    onload: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl PreviewRenderer {
    /// Bind a renderer to a canvas. `target_width`/`target_height` are the
    /// output dimensions being edited; the canvas keeps their aspect ratio.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        target_width: f64,
        target_height: f64,
    ) -> Result<PreviewRenderer, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(PreviewRenderer {
            inner: Rc::new(RefCell::new(Inner {
                canvas,
                ctx,
                image: None,
                transform: PreviewTransform::default(),
                target_width,
                target_height,
                state: PreviewState::NoSource,
            })),
            onload: None,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PreviewState {
        self.inner.borrow().state
    }

    /// Load a new source image and redraw once it arrives. Enters
    /// `SourceLoading` until the browser finishes decoding.
    #[wasm_bindgen(js_name = loadSource)]
    pub fn load_source(&mut self, url: &str) -> Result<(), JsValue> {
        let image = HtmlImageElement::new()?;
        image.set_cross_origin(Some("anonymous"));

        {
            let mut inner = self.inner.borrow_mut();
            inner.state = PreviewState::SourceLoading;
            inner.image = Some(image.clone());
            inner.clear();
        }

        let shared = Rc::clone(&self.inner);
        let onload = Closure::wrap(Box::new(move || {
            let mut inner = shared.borrow_mut();
            inner.state = PreviewState::Ready;
            let _ = inner.draw();
        }) as Box<dyn FnMut()>);
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        self.onload = Some(onload);

        image.set_src(url);
        Ok(())
    }

    /// Drop the source and clear the surface.
    #[wasm_bindgen(js_name = clearSource)]
    pub fn clear_source(&mut self) {
        self.onload = None;
        let mut inner = self.inner.borrow_mut();
        inner.image = None;
        inner.state = PreviewState::NoSource;
        inner.clear();
    }

    /// Replace the transform and redraw synchronously. Partial objects are
    /// completed with defaults, exactly like the server's request parsing.
    #[wasm_bindgen(js_name = setTransform)]
    pub fn set_transform(&self, transform: JsValue) -> Result<(), JsValue> {
        let parsed: PreviewTransform = serde_wasm_bindgen::from_value(transform)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        {
            let mut inner = self.inner.borrow_mut();
            inner.transform = parsed.normalized();
        }
        self.inner.borrow().draw()
    }

    /// Change the target output dimensions (e.g. when the user switches
    /// which size is being edited) and redraw.
    #[wasm_bindgen(js_name = setTargetSize)]
    pub fn set_target_size(&self, width: f64, height: f64) -> Result<(), JsValue> {
        {
            let mut inner = self.inner.borrow_mut();
            inner.target_width = width;
            inner.target_height = height;
        }
        self.inner.borrow().draw()
    }

    /// Redraw with the current source and transform.
    pub fn draw(&self) -> Result<(), JsValue> {
        self.inner.borrow().draw()
    }
}
