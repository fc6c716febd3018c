use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::bitmap::GlyphBitmap;
use crate::config::LabelStyle;

use super::to_js;

/// Draws the label centered, bold and white on a transparent off-screen canvas
/// and reads the pixels back.
///
/// A missing font family silently falls back to the platform monospace face.
pub fn rasterize(document: &Document, style: &LabelStyle) -> Result<GlyphBitmap, JsValue> {
    let (width, height) = (style.bitmap_width, style.bitmap_height);
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    canvas.set_width(width);
    canvas.set_height(height);

    let ctx = canvas
        .get_context("2d")?
        .ok_or("no 2d context")?
        .dyn_into::<CanvasRenderingContext2d>()?;
    ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    ctx.set_font(&style.css_font());
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_fill_style_str("#fff");
    ctx.fill_text(&style.text, width as f64 / 2.0, height as f64 / 2.0)?;

    let data = ctx.get_image_data(0.0, 0.0, width as f64, height as f64)?;
    let bitmap = GlyphBitmap::new(width, height, data.data().to_vec()).map_err(to_js)?;
    if bitmap.touches_edge() {
        log::warn!(
            "label {:?} reaches the edge of its {}x{} bitmap and is likely clipped",
            style.text,
            width,
            height
        );
    }
    Ok(bitmap)
}
