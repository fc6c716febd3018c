//! A backend with no GPU behind it. Every call is recorded as a [`Command`] so
//! callers can check exactly what a session asked the GPU to do.
//!
//! Handles are plain integers, uniform locations are their names. There is no
//! real shader compiler: a stage without a `main` entry point fails to
//! compile, and failures can be injected with [`HeadlessGpu::reject_stage`]
//! and [`HeadlessGpu::reject_link`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::backend::{Gpu, Sampling, Surface};
use crate::bitmap::GlyphBitmap;
use crate::error::{SetupError, Stage};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CompileShader { stage: Stage, id: u32 },
    LinkProgram { id: u32 },
    UseProgram(u32),
    CreateTexture { id: u32, width: u32, height: u32, sampling: Sampling },
    BindTexture { unit: u32, id: u32 },
    CreateVertexArray(u32),
    BindVertexArray(u32),
    UploadAttribute { name: String, components: i32, len: usize, buffer: u32 },
    UniformI32 { name: String, value: i32 },
    UniformF32 { name: String, value: f32 },
    UniformMat4 { name: String, value: [f32; 16] },
    Viewport { width: u32, height: u32 },
    Clear([f32; 4]),
    DrawTriangles { first: i32, count: i32 },
}

/// In-memory stand-in for a canvas element.
#[derive(Debug)]
pub struct HeadlessCanvas {
    logical: Cell<(f64, f64)>,
    dpr: Cell<f64>,
    backing: Cell<(u32, u32)>,
}

impl HeadlessCanvas {
    /// A canvas laid out at `width` x `height` CSS pixels whose backing store
    /// has not been sized yet.
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            logical: Cell::new((width, height)),
            dpr: Cell::new(device_pixel_ratio),
            backing: Cell::new((0, 0)),
        }
    }

    /// Simulates a layout change.
    pub fn resize(&self, width: f64, height: f64) {
        self.logical.set((width, height));
    }

    pub fn set_device_pixel_ratio(&self, dpr: f64) {
        self.dpr.set(dpr);
    }
}

impl Surface for HeadlessCanvas {
    fn logical_size(&self) -> (f64, f64) {
        self.logical.get()
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.dpr.get()
    }

    fn backing_size(&self) -> (u32, u32) {
        self.backing.get()
    }

    fn set_backing_size(&self, width: u32, height: u32) {
        self.backing.set((width, height));
    }
}

#[derive(Debug)]
pub struct HeadlessGpu {
    canvas: Rc<HeadlessCanvas>,
    commands: RefCell<Vec<Command>>,
    next_id: Cell<u32>,
    rejected_stage: Option<(Stage, String)>,
    rejected_link: Option<String>,
}

impl HeadlessGpu {
    /// The drawing buffer follows the backing store of `canvas`.
    pub fn new(canvas: Rc<HeadlessCanvas>) -> Self {
        Self {
            canvas,
            commands: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            rejected_stage: None,
            rejected_link: None,
        }
    }

    /// Makes every compilation of `stage` fail with `log`.
    pub fn reject_stage(mut self, stage: Stage, log: impl Into<String>) -> Self {
        self.rejected_stage = Some((stage, log.into()));
        self
    }

    /// Makes linking fail with `log`.
    pub fn reject_link(mut self, log: impl Into<String>) -> Self {
        self.rejected_link = Some(log.into());
        self
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.borrow().clone()
    }

    /// Returns and forgets everything recorded so far.
    pub fn take_commands(&self) -> Vec<Command> {
        self.commands.take()
    }

    fn record(&self, command: Command) {
        self.commands.borrow_mut().push(command);
    }

    fn alloc(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

impl Gpu for HeadlessGpu {
    type Shader = u32;
    type Program = u32;
    type Texture = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type Uniform = String;

    fn compile_shader(&self, stage: Stage, source: &str) -> Result<u32, SetupError> {
        if let Some((rejected, log)) = &self.rejected_stage {
            if *rejected == stage {
                return Err(SetupError::Compile { stage, log: log.clone() });
            }
        }
        if !source.contains("void main") {
            return Err(SetupError::Compile {
                stage,
                log: "ERROR: missing main entry point".to_owned(),
            });
        }
        if let Some(bracket) = unbalanced_bracket(source) {
            return Err(SetupError::Compile {
                stage,
                log: format!("ERROR: unbalanced '{bracket}'"),
            });
        }
        let id = self.alloc();
        self.record(Command::CompileShader { stage, id });
        Ok(id)
    }

    fn link_program(&self, _vertex: &u32, _fragment: &u32) -> Result<u32, SetupError> {
        if let Some(log) = &self.rejected_link {
            return Err(SetupError::Link { log: log.clone() });
        }
        let id = self.alloc();
        self.record(Command::LinkProgram { id });
        Ok(id)
    }

    fn use_program(&self, program: &u32) {
        self.record(Command::UseProgram(*program));
    }

    fn create_texture(&self, bitmap: &GlyphBitmap, sampling: Sampling) -> Result<u32, SetupError> {
        let id = self.alloc();
        self.record(Command::CreateTexture {
            id,
            width: bitmap.width(),
            height: bitmap.height(),
            sampling,
        });
        Ok(id)
    }

    fn bind_texture(&self, unit: u32, texture: &u32) {
        self.record(Command::BindTexture { unit, id: *texture });
    }

    fn create_vertex_array(&self) -> Result<u32, SetupError> {
        let id = self.alloc();
        self.record(Command::CreateVertexArray(id));
        Ok(id)
    }

    fn bind_vertex_array(&self, vao: &u32) {
        self.record(Command::BindVertexArray(*vao));
    }

    fn upload_attribute(&self, _program: &u32, name: &str, components: i32, data: &[f32]) -> Result<u32, SetupError> {
        let buffer = self.alloc();
        self.record(Command::UploadAttribute {
            name: name.to_owned(),
            components,
            len: data.len(),
            buffer,
        });
        Ok(buffer)
    }

    fn uniform_location(&self, _program: &u32, name: &str) -> Option<String> {
        Some(name.to_owned())
    }

    fn set_uniform_i32(&self, location: &String, value: i32) {
        self.record(Command::UniformI32 {
            name: location.clone(),
            value,
        });
    }

    fn set_uniform_f32(&self, location: &String, value: f32) {
        self.record(Command::UniformF32 {
            name: location.clone(),
            value,
        });
    }

    fn set_uniform_mat4(&self, location: &String, value: &[f32; 16]) {
        self.record(Command::UniformMat4 {
            name: location.clone(),
            value: *value,
        });
    }

    fn drawing_buffer_size(&self) -> (u32, u32) {
        self.canvas.backing_size()
    }

    fn viewport(&self, width: u32, height: u32) {
        self.record(Command::Viewport { width, height });
    }

    fn clear(&self, rgba: [f32; 4]) {
        self.record(Command::Clear(rgba));
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        self.record(Command::DrawTriangles { first, count });
    }
}

/// Structural check only: this backend does not parse GLSL, so a body with
/// balanced brackets and a `main` compiles whatever its statements say.
fn unbalanced_bracket(source: &str) -> Option<char> {
    let mut open = Vec::new();
    for c in source.chars() {
        match c {
            '(' | '[' | '{' => open.push(c),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if open.pop() != Some(expected) {
                    return Some(c);
                }
            }
            _ => {}
        }
    }
    open.pop()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::sync_backing;

    #[test]
    fn backing_store_follows_layout_and_density() {
        let canvas = HeadlessCanvas::new(300.0, 150.0, 2.0);
        assert!(sync_backing(&canvas));
        assert_eq!(canvas.backing_size(), (600, 300));
        assert!(!sync_backing(&canvas));

        canvas.set_device_pixel_ratio(1.5);
        canvas.resize(101.0, 40.0);
        assert!(sync_backing(&canvas));
        assert_eq!(canvas.backing_size(), (151, 60));
    }

    #[test]
    fn compiling_without_main_fails() {
        let gpu = HeadlessGpu::new(Rc::new(HeadlessCanvas::new(1.0, 1.0, 1.0)));
        let err = gpu.compile_shader(Stage::Fragment, "float x;").unwrap_err();
        assert!(matches!(err, SetupError::Compile { stage: Stage::Fragment, .. }));
        assert!(gpu.commands().is_empty());
    }

    #[test]
    fn unbalanced_body_fails_to_compile() {
        let gpu = HeadlessGpu::new(Rc::new(HeadlessCanvas::new(1.0, 1.0, 1.0)));
        let err = gpu
            .compile_shader(Stage::Fragment, "#version 300 es\nvoid main() { nonsense")
            .unwrap_err();
        assert_eq!(
            err,
            SetupError::Compile {
                stage: Stage::Fragment,
                log: "ERROR: unbalanced '{'".to_owned(),
            }
        );
        assert!(gpu.compile_shader(Stage::Vertex, "void main() { f(a[0]); }").is_ok());
        assert!(gpu.compile_shader(Stage::Vertex, "void main() { f(a]0); }").is_err());
    }

    #[test]
    fn shipped_stages_compile() {
        let gpu = HeadlessGpu::new(Rc::new(HeadlessCanvas::new(1.0, 1.0, 1.0)));
        let sources = crate::shader::ShaderSources::for_effects(&crate::config::EffectParams::CRT);
        assert!(gpu.compile_shader(Stage::Vertex, &sources.vertex).is_ok());
        assert!(gpu.compile_shader(Stage::Fragment, &sources.fragment).is_ok());
    }
}
