use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{window, HtmlCanvasElement, WebGl2RenderingContext as GL};

use crate::backend::sync_backing;
use crate::config::LogoConfig;
use crate::session::{LoopState, RenderSession, Tick};

use super::raster::rasterize;
use super::to_js;
use super::webgl::{CanvasSurface, WebGl};

/// Control over a running logo.
#[wasm_bindgen]
pub struct LogoHandle {
    state: Rc<LoopState>,
}

#[wasm_bindgen]
impl LogoHandle {
    /// Stops the loop; the next animation frame releases it.
    pub fn stop(&self) {
        self.state.stop();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Frames drawn so far.
    #[wasm_bindgen(getter)]
    pub fn frames(&self) -> f64 {
        self.state.frames() as f64
    }
}

/// Bakes the label, builds the session and starts the render loop.
pub fn start(canvas: HtmlCanvasElement, config: &LogoConfig) -> Result<LogoHandle, JsValue> {
    let window = window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let gl: GL = canvas
        .get_context("webgl2")?
        .ok_or("WebGL2 not supported")?
        .dyn_into()?;

    let surface = CanvasSurface::new(canvas, window.clone());
    sync_backing(&surface);

    let bitmap = rasterize(&document, &config.label)?;
    let mut session = RenderSession::new(WebGl::new(gl), &bitmap, config).map_err(to_js)?;
    drop(bitmap);

    // Keep the backing store in step with the layout between frames too.
    let resize_closure = {
        let surface = surface.clone();
        Closure::wrap(Box::new(move || {
            sync_backing(&surface);
        }) as Box<dyn FnMut()>)
    };
    window.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();

    let state = Rc::new(LoopState::new());

    // Animation loop
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let loop_state = state.clone();
    let tick_window = window.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp_ms: f64| {
        if loop_state.tick() == Tick::Release {
            log::info!("logo loop stopped after {:.1}s", session.elapsed());
            // Breaks the cycle so the closure and the session are freed.
            let _ = f.borrow_mut().take();
            return;
        }

        session.frame(&surface, timestamp_ms);

        // schedule next
        if let Some(next) = f.borrow().as_ref() {
            if let Err(err) = tick_window.request_animation_frame(next.as_ref().unchecked_ref()) {
                log::error!("request_animation_frame failed: {err:?}");
            }
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(first) = g.borrow().as_ref() {
        window.request_animation_frame(first.as_ref().unchecked_ref())?;
    }

    Ok(LogoHandle { state })
}
