//! The GPU and drawing-surface operations a render session relies on.
//!
//! The browser implements these with WebGL2 and a canvas element, the
//! [`headless`](crate::headless) backend records them for tests.

use crate::bitmap::GlyphBitmap;
use crate::error::{SetupError, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    ClampToEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Linear,
}

/// How a texture is sampled, applied to both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampling {
    pub wrap: Wrap,
    pub filter: Filter,
}

impl Sampling {
    /// Clamped, linearly filtered: the rasterized label never tiles and stays
    /// smooth at any scale.
    pub const GLYPH: Self = Self {
        wrap: Wrap::ClampToEdge,
        filter: Filter::Linear,
    };
}

pub trait Gpu {
    type Shader;
    type Program;
    type Texture;
    type Buffer;
    type VertexArray;
    type Uniform;

    fn compile_shader(&self, stage: Stage, source: &str) -> Result<Self::Shader, SetupError>;
    fn link_program(&self, vertex: &Self::Shader, fragment: &Self::Shader) -> Result<Self::Program, SetupError>;
    fn use_program(&self, program: &Self::Program);

    fn create_texture(&self, bitmap: &GlyphBitmap, sampling: Sampling) -> Result<Self::Texture, SetupError>;
    fn bind_texture(&self, unit: u32, texture: &Self::Texture);

    fn create_vertex_array(&self) -> Result<Self::VertexArray, SetupError>;
    fn bind_vertex_array(&self, vao: &Self::VertexArray);
    /// Uploads `data` into a static buffer and wires it to the named attribute
    /// of the currently bound vertex array.
    fn upload_attribute(
        &self,
        program: &Self::Program,
        name: &str,
        components: i32,
        data: &[f32],
    ) -> Result<Self::Buffer, SetupError>;

    fn uniform_location(&self, program: &Self::Program, name: &str) -> Option<Self::Uniform>;
    fn set_uniform_i32(&self, location: &Self::Uniform, value: i32);
    fn set_uniform_f32(&self, location: &Self::Uniform, value: f32);
    fn set_uniform_mat4(&self, location: &Self::Uniform, value: &[f32; 16]);

    /// Actual size of the drawing buffer in device pixels.
    fn drawing_buffer_size(&self) -> (u32, u32);
    fn viewport(&self, width: u32, height: u32);
    fn clear(&self, rgba: [f32; 4]);
    fn draw_triangles(&self, first: i32, count: i32);
}

/// The element the logo is drawn into.
pub trait Surface {
    /// Layout size in CSS pixels.
    fn logical_size(&self) -> (f64, f64);
    fn device_pixel_ratio(&self) -> f64;
    fn backing_size(&self) -> (u32, u32);
    fn set_backing_size(&self, width: u32, height: u32);
}

/// Backing resolution that keeps `surface` crisp: logical size times pixel
/// density, truncated.
pub fn target_backing_size<S: Surface + ?Sized>(surface: &S) -> (u32, u32) {
    let (w, h) = surface.logical_size();
    let dpr = surface.device_pixel_ratio();
    let dpr = if dpr > 0.0 { dpr } else { 1.0 };
    ((w * dpr) as u32, (h * dpr) as u32)
}

/// Resizes the backing store when it no longer matches the layout. Returns
/// whether it changed; calling it again without a layout change is a no-op.
pub fn sync_backing<S: Surface + ?Sized>(surface: &S) -> bool {
    let target = target_backing_size(surface);
    if surface.backing_size() == target {
        return false;
    }
    log::debug!("resizing backing store to {}x{}", target.0, target.1);
    surface.set_backing_size(target.0, target.1);
    true
}
