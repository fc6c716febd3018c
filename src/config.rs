//! Hard-coded configuration for the logo: the label, the camera and every
//! constant the CRT stylization uses.

use std::f32::consts::PI;

/// Label text and how it is rasterized into the glyph bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub text: String,
    pub font_family: String,
    /// Font size in bitmap pixels.
    pub font_size: f32,
    pub bitmap_width: u32,
    pub bitmap_height: u32,
}

impl LabelStyle {
    /// CSS font shorthand, always bold with a monospace fallback.
    pub fn css_font(&self) -> String {
        format!("bold {}px '{}', monospace", self.font_size, self.font_family)
    }
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            text: "SIG".to_owned(),
            font_family: "IBM Plex Mono".to_owned(),
            font_size: 320.0,
            bitmap_width: 1024,
            bitmap_height: 512,
        }
    }
}

/// Static perspective camera looking down -Z at the quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the eye to the quad plane.
    pub eye_distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_y: PI / 3.0,
            near: 0.1,
            far: 10.0,
            eye_distance: 2.5,
        }
    }
}

/// Magnitudes, rates and weights of the CRT effects.
///
/// Rates are in radians per second of elapsed time. Offsets and steps are in
/// texture space. The fragment stage is generated from this table, see
/// [`EffectParams::constants`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectParams {
    pub barrel_k: f32,

    pub aberration_base: f32,
    pub aberration_swing: f32,
    pub aberration_rate: f32,
    pub aberration_y_freq: f32,

    pub flicker_base: f32,
    pub flicker_slow_amp: f32,
    pub flicker_slow_rate: f32,
    pub flicker_fast_amp: f32,
    pub flicker_fast_rate: f32,
    pub flicker_x_freq: f32,
    pub flicker_jitter: f32,

    pub ghost_base: f32,
    pub ghost_swing: f32,
    pub ghost_rate: f32,
    pub ghost_mix: f32,

    pub blur_taps: i32,
    pub blur_step: f32,
    pub blur_min: f32,
    pub blur_range: f32,
    pub blur_rate: f32,
    pub blur_mix: f32,

    pub edge_low: f32,
    pub edge_high: f32,
    pub rainbow_rate: f32,
    pub rainbow_x_freq: f32,
    pub rainbow_y_freq: f32,
    pub rainbow_tint: [f32; 3],

    pub bloom_taps: i32,
    pub bloom_step: f32,
    pub bloom_sigma_divisor: f32,
    pub bloom_mix: f32,

    pub hue_amp_a: f32,
    pub hue_rate_a: f32,
    pub hue_amp_b: f32,
    pub hue_rate_b: f32,

    pub grain_amp: f32,
    pub grain_scale: f32,
    pub grain_drift: f32,

    pub contrast: f32,
    pub brightness: f32,

    pub vignette_inner: f32,
    pub vignette_outer: f32,
    pub vignette_strength: f32,
}

impl EffectParams {
    pub const CRT: Self = Self {
        barrel_k: 0.18,

        aberration_base: 0.006,
        aberration_swing: 0.003,
        aberration_rate: 0.7,
        aberration_y_freq: 4.0,

        flicker_base: 0.97,
        flicker_slow_amp: 0.01,
        flicker_slow_rate: 1.3,
        flicker_fast_amp: 0.03,
        flicker_fast_rate: 60.0,
        flicker_x_freq: 10.0,
        flicker_jitter: 0.01,

        ghost_base: 0.025,
        ghost_swing: 0.01,
        ghost_rate: 0.7,
        ghost_mix: 0.22,

        blur_taps: 4,
        blur_step: 0.008,
        blur_min: 0.7,
        blur_range: 0.6,
        blur_rate: 1.2,
        blur_mix: 0.22,

        edge_low: 0.01,
        edge_high: 0.08,
        rainbow_rate: 2.0,
        rainbow_x_freq: 12.0,
        rainbow_y_freq: 8.0,
        rainbow_tint: [0.5, 0.3, 0.7],

        bloom_taps: 8,
        bloom_step: 0.008,
        bloom_sigma_divisor: 18.0,
        bloom_mix: 0.55,

        hue_amp_a: 0.08,
        hue_rate_a: 0.3,
        hue_amp_b: 0.08,
        hue_rate_b: 0.13,

        grain_amp: 0.09,
        grain_scale: 120.0,
        grain_drift: 10.0,

        contrast: 1.45,
        brightness: 0.82,

        vignette_inner: 0.7,
        vignette_outer: 0.98,
        vignette_strength: 0.55,
    };

    /// Float constants as `(GLSL name, value)` pairs.
    pub fn constants(&self) -> Vec<(&'static str, f32)> {
        vec![
            ("BARREL_K", self.barrel_k),
            ("ABERRATION_BASE", self.aberration_base),
            ("ABERRATION_SWING", self.aberration_swing),
            ("ABERRATION_RATE", self.aberration_rate),
            ("ABERRATION_Y_FREQ", self.aberration_y_freq),
            ("FLICKER_BASE", self.flicker_base),
            ("FLICKER_SLOW_AMP", self.flicker_slow_amp),
            ("FLICKER_SLOW_RATE", self.flicker_slow_rate),
            ("FLICKER_FAST_AMP", self.flicker_fast_amp),
            ("FLICKER_FAST_RATE", self.flicker_fast_rate),
            ("FLICKER_X_FREQ", self.flicker_x_freq),
            ("FLICKER_JITTER", self.flicker_jitter),
            ("GHOST_BASE", self.ghost_base),
            ("GHOST_SWING", self.ghost_swing),
            ("GHOST_RATE", self.ghost_rate),
            ("GHOST_MIX", self.ghost_mix),
            ("BLUR_STEP", self.blur_step),
            ("BLUR_MIN", self.blur_min),
            ("BLUR_RANGE", self.blur_range),
            ("BLUR_RATE", self.blur_rate),
            ("BLUR_MIX", self.blur_mix),
            ("EDGE_LOW", self.edge_low),
            ("EDGE_HIGH", self.edge_high),
            ("RAINBOW_RATE", self.rainbow_rate),
            ("RAINBOW_X_FREQ", self.rainbow_x_freq),
            ("RAINBOW_Y_FREQ", self.rainbow_y_freq),
            ("RAINBOW_R", self.rainbow_tint[0]),
            ("RAINBOW_G", self.rainbow_tint[1]),
            ("RAINBOW_B", self.rainbow_tint[2]),
            ("BLOOM_STEP", self.bloom_step),
            ("BLOOM_SIGMA_DIVISOR", self.bloom_sigma_divisor),
            ("BLOOM_MIX", self.bloom_mix),
            ("HUE_AMP_A", self.hue_amp_a),
            ("HUE_RATE_A", self.hue_rate_a),
            ("HUE_AMP_B", self.hue_amp_b),
            ("HUE_RATE_B", self.hue_rate_b),
            ("GRAIN_AMP", self.grain_amp),
            ("GRAIN_SCALE", self.grain_scale),
            ("GRAIN_DRIFT", self.grain_drift),
            ("CONTRAST", self.contrast),
            ("BRIGHTNESS", self.brightness),
            ("VIGNETTE_INNER", self.vignette_inner),
            ("VIGNETTE_OUTER", self.vignette_outer),
            ("VIGNETTE_STRENGTH", self.vignette_strength),
        ]
    }

    /// Integer constants (loop bounds) as `(GLSL name, value)` pairs.
    pub fn int_constants(&self) -> [(&'static str, i32); 2] {
        [("BLUR_TAPS", self.blur_taps), ("BLOOM_TAPS", self.bloom_taps)]
    }
}

impl Default for EffectParams {
    fn default() -> Self {
        Self::CRT
    }
}

/// Everything a render session needs to know up front.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogoConfig {
    pub label: LabelStyle,
    pub camera: Camera,
    pub clear_color: ClearColor,
    pub effects: EffectParams,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor(pub [f32; 4]);

impl Default for ClearColor {
    fn default() -> Self {
        Self([0.0, 0.0, 0.0, 1.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_font_is_bold_with_monospace_fallback() {
        assert_eq!(
            LabelStyle::default().css_font(),
            "bold 320px 'IBM Plex Mono', monospace"
        );
    }

    #[test]
    fn constant_names_are_unique() {
        let fx = EffectParams::CRT;
        let mut names: Vec<_> = fx.constants().into_iter().map(|(n, _)| n).collect();
        names.extend(fx.int_constants().into_iter().map(|(n, _)| n));
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
