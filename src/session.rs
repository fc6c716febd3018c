//! One mounted logo: the GPU objects created at setup and the per-frame work.

use std::cell::Cell;

use crate::backend::{sync_backing, Gpu, Sampling, Surface};
use crate::bitmap::GlyphBitmap;
use crate::config::{Camera, ClearColor, LogoConfig};
use crate::error::{SetupError, Stage};
use crate::geometry::{POSITION_ATTRIBUTE, QUAD_POSITIONS, QUAD_UVS, QUAD_VERTEX_COUNT, UV_ATTRIBUTE};
use crate::projection::{aspect_ratio, model_view_projection};
use crate::shader::{ShaderSources, GLYPH_TEXTURE_UNIT, MVP_UNIFORM, TEXTURE_UNIFORM, TIME_UNIFORM};

/// Elapsed seconds since the first tick, derived from the host's millisecond
/// timestamps. Never goes backwards.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    origin_ms: Option<f64>,
    elapsed: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, timestamp_ms: f64) -> f32 {
        let origin = *self.origin_ms.get_or_insert(timestamp_ms);
        let elapsed = ((timestamp_ms - origin) * 0.001) as f32;
        if elapsed > self.elapsed {
            self.elapsed = elapsed;
        }
        self.elapsed
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// What an animation-frame callback should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Draw and schedule the next frame.
    Draw,
    /// Stop was requested: release the loop and do not reschedule.
    Release,
}

/// Run state shared between a frame loop and its handle.
#[derive(Debug, Default)]
pub struct LoopState {
    stopped: Cell<bool>,
    frames: Cell<u64>,
}

impl LoopState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.set(true);
    }

    pub fn is_running(&self) -> bool {
        !self.stopped.get()
    }

    /// Number of ticks that went on to draw.
    pub fn frames(&self) -> u64 {
        self.frames.get()
    }

    /// Called once at the top of every animation-frame callback.
    pub fn tick(&self) -> Tick {
        if self.stopped.get() {
            return Tick::Release;
        }
        self.frames.set(self.frames.get() + 1);
        Tick::Draw
    }
}

/// What a drawn frame did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Value uploaded to the time uniform.
    pub time: f32,
    /// Aspect ratio baked into the projection.
    pub aspect: f32,
    pub viewport: (u32, u32),
    pub vertices: i32,
    /// The backing store was resized during this frame.
    pub resized: bool,
}

struct QuadMesh<G: Gpu> {
    vao: G::VertexArray,
    _positions: G::Buffer,
    _uvs: G::Buffer,
}

pub struct RenderSession<G: Gpu> {
    gpu: G,
    program: G::Program,
    texture: G::Texture,
    quad: QuadMesh<G>,
    u_mvp: Option<G::Uniform>,
    u_time: Option<G::Uniform>,
    camera: Camera,
    clear_color: ClearColor,
    clock: FrameClock,
}

impl<G: Gpu> RenderSession<G> {
    /// Compiles the program generated from `config.effects`, uploads the glyph
    /// bitmap and the quad.
    pub fn new(gpu: G, bitmap: &GlyphBitmap, config: &LogoConfig) -> Result<Self, SetupError> {
        let sources = ShaderSources::for_effects(&config.effects);
        Self::with_sources(gpu, bitmap, config, &sources)
    }

    /// Setup with explicit stage sources. Any failure aborts setup; the bitmap
    /// is not needed afterwards.
    pub fn with_sources(
        gpu: G,
        bitmap: &GlyphBitmap,
        config: &LogoConfig,
        sources: &ShaderSources,
    ) -> Result<Self, SetupError> {
        let vertex = gpu.compile_shader(Stage::Vertex, &sources.vertex)?;
        let fragment = gpu.compile_shader(Stage::Fragment, &sources.fragment)?;
        let program = gpu.link_program(&vertex, &fragment)?;
        log::debug!("logo program linked");
        gpu.use_program(&program);

        let texture = gpu.create_texture(bitmap, Sampling::GLYPH)?;
        log::debug!("glyph texture uploaded ({}x{})", bitmap.width(), bitmap.height());

        let vao = gpu.create_vertex_array()?;
        gpu.bind_vertex_array(&vao);
        let positions = gpu.upload_attribute(&program, POSITION_ATTRIBUTE, 3, &QUAD_POSITIONS)?;
        let uvs = gpu.upload_attribute(&program, UV_ATTRIBUTE, 2, &QUAD_UVS)?;

        gpu.bind_texture(GLYPH_TEXTURE_UNIT, &texture);
        match gpu.uniform_location(&program, TEXTURE_UNIFORM) {
            Some(sampler) => gpu.set_uniform_i32(&sampler, GLYPH_TEXTURE_UNIT as i32),
            None => log::warn!("uniform `{TEXTURE_UNIFORM}` is not active"),
        }

        let u_mvp = gpu.uniform_location(&program, MVP_UNIFORM);
        let u_time = gpu.uniform_location(&program, TIME_UNIFORM);
        for (name, found) in [(MVP_UNIFORM, u_mvp.is_some()), (TIME_UNIFORM, u_time.is_some())] {
            if !found {
                log::warn!("uniform `{name}` is not active");
            }
        }

        log::info!("logo session ready");
        Ok(Self {
            gpu,
            program,
            texture,
            quad: QuadMesh {
                vao,
                _positions: positions,
                _uvs: uvs,
            },
            u_mvp,
            u_time,
            camera: config.camera,
            clear_color: config.clear_color,
            clock: FrameClock::new(),
        })
    }

    /// Draws one frame at the host timestamp `timestamp_ms`. Returns `None`
    /// without drawing while the drawing buffer has no area.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &S, timestamp_ms: f64) -> Option<FrameReport> {
        let resized = sync_backing(surface);
        let time = self.clock.tick(timestamp_ms);

        let (width, height) = self.gpu.drawing_buffer_size();
        let aspect = aspect_ratio(width, height)?;

        let gpu = &self.gpu;
        gpu.viewport(width, height);
        gpu.clear(self.clear_color.0);

        gpu.use_program(&self.program);
        gpu.bind_vertex_array(&self.quad.vao);
        gpu.bind_texture(GLYPH_TEXTURE_UNIT, &self.texture);

        if let Some(u_mvp) = &self.u_mvp {
            let mvp = model_view_projection(&self.camera, aspect);
            gpu.set_uniform_mat4(u_mvp, &mvp.to_cols_array());
        }
        if let Some(u_time) = &self.u_time {
            gpu.set_uniform_f32(u_time, time);
        }

        gpu.draw_triangles(0, QUAD_VERTEX_COUNT);

        Some(FrameReport {
            time,
            aspect,
            viewport: (width, height),
            vertices: QUAD_VERTEX_COUNT,
            resized,
        })
    }

    pub fn gpu(&self) -> &G {
        &self.gpu
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_zero_and_never_rewinds() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(5_000.0), 0.0);
        assert_eq!(clock.tick(5_016.0), 0.016);
        assert_eq!(clock.tick(5_010.0), 0.016);
        assert_eq!(clock.tick(6_000.0), 1.0);
        assert_eq!(clock.elapsed(), 1.0);
    }

    #[test]
    fn stopped_loop_releases_on_next_tick_and_stops_counting() {
        let state = LoopState::new();
        assert!(state.is_running());
        assert_eq!(state.tick(), Tick::Draw);
        assert_eq!(state.tick(), Tick::Draw);
        assert_eq!(state.frames(), 2);

        state.stop();
        assert!(!state.is_running());
        assert_eq!(state.tick(), Tick::Release);
        assert_eq!(state.tick(), Tick::Release);
        assert_eq!(state.frames(), 2);
    }
}
