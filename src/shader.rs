//! GLSL ES 3.00 sources for the logo program.

use std::fmt::Write;

use crate::config::EffectParams;

pub const VERTEX_SOURCE: &str = include_str!("shaders/logo.vert");

const FRAGMENT_BODY: &str = include_str!("shaders/crt.frag");

pub const MVP_UNIFORM: &str = "u_mvp";
pub const TIME_UNIFORM: &str = "u_time";
pub const TEXTURE_UNIFORM: &str = "u_tex";

/// The texture unit the glyph texture is bound to.
pub const GLYPH_TEXTURE_UNIT: u32 = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    pub fn for_effects(effects: &EffectParams) -> Self {
        Self::new(VERTEX_SOURCE, fragment_source(effects))
    }
}

/// Fragment stage with the effect table emitted as `const` declarations ahead
/// of the body.
pub fn fragment_source(effects: &EffectParams) -> String {
    let mut src = String::from("#version 300 es\nprecision highp float;\n\n");
    for (name, value) in effects.int_constants() {
        let _ = writeln!(src, "const int {name} = {value};");
    }
    for (name, value) in effects.constants() {
        let _ = writeln!(src, "const float {name} = {value:?};");
    }
    src.push('\n');
    src.push_str(FRAGMENT_BODY);
    src
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_directive_comes_first() {
        assert!(VERTEX_SOURCE.starts_with("#version 300 es"));
        assert!(fragment_source(&EffectParams::CRT).starts_with("#version 300 es\n"));
    }

    #[test]
    fn constants_are_float_literals() {
        let src = fragment_source(&EffectParams::CRT);
        assert!(src.contains("const float BARREL_K = 0.18;"));
        assert!(src.contains("const float FLICKER_FAST_RATE = 60.0;"));
        assert!(src.contains("const int BLOOM_TAPS = 8;"));
        assert!(src.contains("const float VIGNETTE_STRENGTH = 0.55;"));
    }

    #[test]
    fn every_constant_is_used_by_the_body() {
        let fx = EffectParams::CRT;
        let names = fx
            .constants()
            .into_iter()
            .map(|(n, _)| n)
            .chain(fx.int_constants().into_iter().map(|(n, _)| n));
        for name in names {
            assert!(FRAGMENT_BODY.contains(name), "{name} is never referenced");
        }
    }

    #[test]
    fn stages_agree_on_interface_names() {
        let fragment = fragment_source(&EffectParams::CRT);
        assert!(VERTEX_SOURCE.contains(MVP_UNIFORM));
        assert!(VERTEX_SOURCE.contains("out vec2 v_uv"));
        assert!(fragment.contains("in vec2 v_uv"));
        assert!(fragment.contains(TIME_UNIFORM));
        assert!(fragment.contains(TEXTURE_UNIFORM));
    }
}
