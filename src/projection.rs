use glam::{Mat4, Vec3};

use crate::config::Camera;

/// Width over height of the drawing buffer. `None` while either side is zero.
pub fn aspect_ratio(width: u32, height: u32) -> Option<f32> {
    if width == 0 || height == 0 {
        return None;
    }
    Some(width as f32 / height as f32)
}

/// Perspective projection times the static model-view translation that places
/// the quad `eye_distance` in front of the eye. No rotation.
pub fn model_view_projection(camera: &Camera, aspect: f32) -> Mat4 {
    let projection = Mat4::perspective_rh_gl(camera.fov_y, aspect, camera.near, camera.far);
    let model_view = Mat4::from_translation(Vec3::new(0.0, 0.0, -camera.eye_distance));
    projection * model_view
}
