use std::rc::Rc;

use glam::{Mat4, Vec3};
use sig_logo::config::Camera;
use sig_logo::headless::{Command, HeadlessCanvas, HeadlessGpu};
use sig_logo::projection::model_view_projection;
use sig_logo::{GlyphBitmap, LogoConfig, RenderSession};

fn uploaded_mvp(commands: &[Command]) -> Mat4 {
    commands
        .iter()
        .find_map(|c| match c {
            Command::UniformMat4 { name, value } if name == "u_mvp" => Some(Mat4::from_cols_array(value)),
            _ => None,
        })
        .expect("mvp uploaded")
}

#[test]
fn projection_uses_drawing_buffer_aspect() {
    let sizes = [(1920.0, 1080.0, 1.0), (1080.0, 1920.0, 1.0), (640.0, 480.0, 2.0), (333.0, 333.0, 3.0)];
    let canvas = Rc::new(HeadlessCanvas::new(1.0, 1.0, 1.0));
    let config = LogoConfig::default();
    let mut session = RenderSession::new(HeadlessGpu::new(canvas.clone()), &GlyphBitmap::blank(4, 4), &config)
        .expect("setup");

    for (i, &(w, h, dpr)) in sizes.iter().enumerate() {
        canvas.resize(w, h);
        canvas.set_device_pixel_ratio(dpr);
        session.gpu().take_commands();
        let report = session.frame(&*canvas, i as f64 * 16.0).expect("frame drawn");

        let (bw, bh) = ((w * dpr) as u32, (h * dpr) as u32);
        assert_eq!(report.viewport, (bw, bh));
        assert_eq!(report.aspect, bw as f32 / bh as f32);

        let mvp = uploaded_mvp(&session.gpu().take_commands());
        assert_eq!(mvp, model_view_projection(&Camera::default(), report.aspect));
    }
}

#[test]
fn quad_keeps_its_shape_on_screen_at_any_aspect() {
    // On-screen width over height of the quad, in pixels, must stay 2:1.
    let camera = Camera::default();
    for (w, h) in [(1920.0_f32, 1080.0_f32), (1080.0, 1920.0), (500.0, 500.0)] {
        let mvp = model_view_projection(&camera, w / h);
        let right = mvp.project_point3(Vec3::new(1.0, 0.0, 0.0));
        let top = mvp.project_point3(Vec3::new(0.0, 0.5, 0.0));
        let px_width = right.x * w;
        let px_height = top.y * h;
        assert!((px_width / px_height - 2.0).abs() < 1e-4, "{w}x{h}");
    }
}
