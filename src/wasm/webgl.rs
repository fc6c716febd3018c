use js_sys::Float32Array;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader, WebGlTexture,
    WebGlUniformLocation, WebGlVertexArrayObject, Window,
};

use crate::backend::{Filter, Gpu, Sampling, Surface, Wrap};
use crate::bitmap::GlyphBitmap;
use crate::error::{SetupError, Stage};

/// [`Gpu`] over a WebGL2 context.
pub struct WebGl {
    gl: GL,
}

impl WebGl {
    pub fn new(gl: GL) -> Self {
        Self { gl }
    }
}

fn wrap_mode(wrap: Wrap) -> i32 {
    match wrap {
        Wrap::ClampToEdge => GL::CLAMP_TO_EDGE as i32,
    }
}

fn filter_mode(filter: Filter) -> i32 {
    match filter {
        Filter::Linear => GL::LINEAR as i32,
    }
}

impl Gpu for WebGl {
    type Shader = WebGlShader;
    type Program = WebGlProgram;
    type Texture = WebGlTexture;
    type Buffer = WebGlBuffer;
    type VertexArray = WebGlVertexArrayObject;
    type Uniform = WebGlUniformLocation;

    fn compile_shader(&self, stage: Stage, source: &str) -> Result<WebGlShader, SetupError> {
        let kind = match stage {
            Stage::Vertex => GL::VERTEX_SHADER,
            Stage::Fragment => GL::FRAGMENT_SHADER,
        };
        let shader = self.gl.create_shader(kind).ok_or(SetupError::Allocation("shader"))?;
        self.gl.shader_source(&shader, source);
        self.gl.compile_shader(&shader);

        let compiled = self
            .gl
            .get_shader_parameter(&shader, GL::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false);
        if compiled {
            Ok(shader)
        } else {
            let log = self.gl.get_shader_info_log(&shader).unwrap_or_default();
            self.gl.delete_shader(Some(&shader));
            Err(SetupError::Compile { stage, log })
        }
    }

    fn link_program(&self, vertex: &WebGlShader, fragment: &WebGlShader) -> Result<WebGlProgram, SetupError> {
        let program = self.gl.create_program().ok_or(SetupError::Allocation("program"))?;
        self.gl.attach_shader(&program, vertex);
        self.gl.attach_shader(&program, fragment);
        self.gl.link_program(&program);

        let linked = self
            .gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if linked {
            Ok(program)
        } else {
            let log = self.gl.get_program_info_log(&program).unwrap_or_default();
            self.gl.delete_program(Some(&program));
            Err(SetupError::Link { log })
        }
    }

    fn use_program(&self, program: &WebGlProgram) {
        self.gl.use_program(Some(program));
    }

    fn create_texture(&self, bitmap: &GlyphBitmap, sampling: Sampling) -> Result<WebGlTexture, SetupError> {
        let texture = self.gl.create_texture().ok_or(SetupError::Allocation("texture"))?;
        self.gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        self.gl.pixel_storei(GL::UNPACK_ALIGNMENT, 1);
        self.gl
            .tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
                GL::TEXTURE_2D,
                0,
                GL::RGBA as i32,
                bitmap.width() as i32,
                bitmap.height() as i32,
                0,
                GL::RGBA,
                GL::UNSIGNED_BYTE,
                Some(bitmap.pixels()),
            )
            .map_err(|e| SetupError::Platform(format!("texture upload failed: {e:?}")))?;

        let wrap = wrap_mode(sampling.wrap);
        let filter = filter_mode(sampling.filter);
        self.gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, wrap);
        self.gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, wrap);
        self.gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, filter);
        self.gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, filter);
        Ok(texture)
    }

    fn bind_texture(&self, unit: u32, texture: &WebGlTexture) {
        self.gl.active_texture(GL::TEXTURE0 + unit);
        self.gl.bind_texture(GL::TEXTURE_2D, Some(texture));
    }

    fn create_vertex_array(&self) -> Result<WebGlVertexArrayObject, SetupError> {
        self.gl
            .create_vertex_array()
            .ok_or(SetupError::Allocation("vertex array"))
    }

    fn bind_vertex_array(&self, vao: &WebGlVertexArrayObject) {
        self.gl.bind_vertex_array(Some(vao));
    }

    fn upload_attribute(
        &self,
        program: &WebGlProgram,
        name: &str,
        components: i32,
        data: &[f32],
    ) -> Result<WebGlBuffer, SetupError> {
        let location = self.gl.get_attrib_location(program, name);
        if location < 0 {
            return Err(SetupError::MissingAttribute(name.to_owned()));
        }

        let buffer = self.gl.create_buffer().ok_or(SetupError::Allocation("vertex buffer"))?;
        self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        let array = Float32Array::from(data);
        self.gl
            .buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &array, GL::STATIC_DRAW);
        self.gl.enable_vertex_attrib_array(location as u32);
        self.gl
            .vertex_attrib_pointer_with_i32(location as u32, components, GL::FLOAT, false, 0, 0);
        Ok(buffer)
    }

    fn uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.gl.get_uniform_location(program, name)
    }

    fn set_uniform_i32(&self, location: &WebGlUniformLocation, value: i32) {
        self.gl.uniform1i(Some(location), value);
    }

    fn set_uniform_f32(&self, location: &WebGlUniformLocation, value: f32) {
        self.gl.uniform1f(Some(location), value);
    }

    fn set_uniform_mat4(&self, location: &WebGlUniformLocation, value: &[f32; 16]) {
        self.gl
            .uniform_matrix4fv_with_f32_array(Some(location), false, value);
    }

    fn drawing_buffer_size(&self) -> (u32, u32) {
        (
            self.gl.drawing_buffer_width().max(0) as u32,
            self.gl.drawing_buffer_height().max(0) as u32,
        )
    }

    fn viewport(&self, width: u32, height: u32) {
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    fn clear(&self, [r, g, b, a]: [f32; 4]) {
        self.gl.clear_color(r, g, b, a);
        self.gl.clear(GL::COLOR_BUFFER_BIT);
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        self.gl.draw_arrays(GL::TRIANGLES, first, count);
    }
}

/// [`Surface`] over a canvas element laid out by the page.
#[derive(Clone)]
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    window: Window,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, window: Window) -> Self {
        Self { canvas, window }
    }
}

impl Surface for CanvasSurface {
    fn logical_size(&self) -> (f64, f64) {
        (self.canvas.client_width() as f64, self.canvas.client_height() as f64)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn backing_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn set_backing_size(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}
