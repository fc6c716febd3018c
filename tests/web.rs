#![cfg(target_arch = "wasm32")]

use sig_logo::shader::{ShaderSources, VERTEX_SOURCE};
use sig_logo::wasm::{mount, rasterize, CanvasSurface, WebGl};
use sig_logo::{GlyphBitmap, LabelStyle, LogoConfig, RenderSession, SetupError, Stage};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{HtmlCanvasElement, HtmlElement, WebGl2RenderingContext};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn webgl() -> (HtmlCanvasElement, WebGl) {
    let canvas = document()
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    canvas.set_width(64);
    canvas.set_height(64);
    let gl = canvas
        .get_context("webgl2")
        .unwrap()
        .expect("webgl2")
        .dyn_into::<WebGl2RenderingContext>()
        .unwrap();
    (canvas, WebGl::new(gl))
}

/// Resolves on the next animation frame.
async fn next_frame() {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .request_animation_frame(&resolve)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
fn label_coverage_stays_inside_the_bitmap() {
    let style = LabelStyle::default();
    let bitmap = rasterize(&document(), &style).unwrap();
    assert_eq!((bitmap.width(), bitmap.height()), (1024, 512));

    let bounds = bitmap.coverage_bounds().expect("label drew something");
    assert!(!bitmap.touches_edge());
    // Centered within a few pixels.
    let cx = (bounds.min_x + bounds.max_x) as i64 / 2;
    assert!((cx - 512).abs() < 24, "{bounds:?}");

    // Transparent outside the glyphs, white inside.
    assert_eq!(bitmap.alpha_at(0, 0), 0);
    assert_eq!(bitmap.alpha_at(1023, 511), 0);
    for y in 0..bitmap.height() {
        for x in 0..bitmap.width() {
            let [r, g, b, a] = bitmap.rgba_at(x, y);
            if a == 255 {
                assert_eq!([r, g, b], [255, 255, 255]);
            }
        }
    }
}

#[wasm_bindgen_test]
fn invalid_fragment_source_is_fatal() {
    let (_canvas, gpu) = webgl();
    let sources = ShaderSources::new(VERTEX_SOURCE, "#version 300 es\nvoid main() { nonsense }");
    let err = RenderSession::with_sources(gpu, &GlyphBitmap::blank(4, 4), &LogoConfig::default(), &sources)
        .err()
        .expect("setup must fail");
    match err {
        SetupError::Compile { stage, log } => {
            assert_eq!(stage, Stage::Fragment);
            assert!(!log.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[wasm_bindgen_test]
fn generated_program_compiles_and_draws() {
    let (canvas, gpu) = webgl();
    let window = web_sys::window().unwrap();
    let surface = CanvasSurface::new(canvas, window);
    let config = LogoConfig::default();
    let bitmap = rasterize(&document(), &config.label).unwrap();

    let mut session = RenderSession::new(gpu, &bitmap, &config).unwrap();
    // A detached canvas has no layout; whatever the browser makes of its
    // drawing buffer, a drawn frame is always the single quad.
    if let Some(report) = session.frame(&surface, 0.0) {
        assert_eq!(report.vertices, 6);
        assert_eq!(report.time, 0.0);
    }
}

#[wasm_bindgen_test]
async fn stopped_loop_draws_no_further_frames() {
    let document = document();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    canvas.set_id("stop-test-canvas");
    canvas
        .dyn_ref::<HtmlElement>()
        .unwrap()
        .style()
        .set_property("width", "128px")
        .unwrap();
    canvas
        .dyn_ref::<HtmlElement>()
        .unwrap()
        .style()
        .set_property("height", "64px")
        .unwrap();
    document.body().unwrap().append_child(&canvas).unwrap();

    let handle = mount("stop-test-canvas").unwrap();
    next_frame().await;
    next_frame().await;
    assert!(handle.is_running());
    assert!(handle.frames() >= 1.0);

    handle.stop();
    assert!(!handle.is_running());
    let frozen = handle.frames();
    // The callback already queued sees the stop and releases the loop.
    next_frame().await;
    next_frame().await;
    next_frame().await;
    assert_eq!(handle.frames(), frozen);

    canvas.remove();
}
