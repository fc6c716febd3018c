//! Animated "SIG" logo with CRT styling, rendered with WebGL2.
//!
//! Everything except the `wasm` module is platform independent and runs on
//! the host, including a recording [`headless`] backend used by the tests.

pub mod backend;
pub mod bitmap;
pub mod config;
pub mod error;
pub mod geometry;
pub mod headless;
pub mod projection;
pub mod session;
pub mod shader;
pub mod stylize;

pub use backend::{Gpu, Sampling, Surface};
pub use bitmap::GlyphBitmap;
pub use config::{EffectParams, LabelStyle, LogoConfig};
pub use error::{SetupError, Stage};
pub use session::{FrameReport, LoopState, RenderSession, Tick};

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    mod raster;
    mod render;
    mod webgl;

    pub use raster::rasterize;
    pub use render::{start, LogoHandle};
    pub use webgl::{CanvasSurface, WebGl};

    const DEFAULT_CANVAS_ID: &str = "gl-canvas";

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        if document.get_element_by_id(DEFAULT_CANVAS_ID).is_none() {
            log::warn!("#{DEFAULT_CANVAS_ID} not found, nothing to render");
            return Ok(());
        }

        // Dropping the handle leaves the loop running for the lifetime of the page.
        mount(DEFAULT_CANVAS_ID)?;
        Ok(())
    }

    /// Mounts the logo on the canvas with id `canvas_id`.
    #[wasm_bindgen]
    pub fn mount(canvas_id: &str) -> Result<LogoHandle, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        start(canvas, &crate::LogoConfig::default())
    }

    pub(crate) fn to_js(err: crate::SetupError) -> JsValue {
        js_sys::Error::new(&err.to_string()).into()
    }
}
