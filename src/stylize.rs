//! CPU evaluation of the CRT fragment stage.
//!
//! Mirrors `shaders/crt.frag` step for step so the effect chain can be
//! inspected and tested without a GPU. Every step feeds the next; the order
//! matters because several effects compound.

use glam::{Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::bitmap::GlyphBitmap;
use crate::config::EffectParams;

/// A texture that can be sampled at normalized coordinates.
pub trait Sampler {
    fn sample(&self, uv: Vec2) -> Vec4;
}

impl Sampler for GlyphBitmap {
    /// Bilinear filtering at texel centers with clamp-to-edge wrapping.
    fn sample(&self, uv: Vec2) -> Vec4 {
        let (w, h) = (self.width(), self.height());
        if w == 0 || h == 0 {
            return Vec4::ZERO;
        }
        let x = uv.x * w as f32 - 0.5;
        let y = uv.y * h as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;

        let texel = |tx: f32, ty: f32| -> Vec4 {
            let cx = (tx as i64).clamp(0, w as i64 - 1) as u32;
            let cy = (ty as i64).clamp(0, h as i64 - 1) as u32;
            let [r, g, b, a] = self.rgba_at(cx, cy);
            Vec4::new(r as f32, g as f32, b as f32, a as f32) / 255.0
        };

        let top = texel(x0, y0).lerp(texel(x0 + 1.0, y0), fx);
        let bottom = texel(x0, y0 + 1.0).lerp(texel(x0 + 1.0, y0 + 1.0), fx);
        top.lerp(bottom, fy)
    }
}

fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Hash-style pseudo-random value in [0, 1).
pub fn rand(co: Vec2) -> f32 {
    fract((co.dot(Vec2::new(12.9898, 78.233))).sin() * 43758.5453)
}

/// Barrel distortion: radial scale by `1 + k * r^2` in [-1, 1] space.
pub fn crt_curve(uv: Vec2, fx: &EffectParams) -> Vec2 {
    let p = uv * 2.0 - 1.0;
    let p = p * (1.0 + fx.barrel_k * p.length_squared());
    p * 0.5 + 0.5
}

/// Horizontal per-channel offset of the red and blue samples.
pub fn aberration_offset(fx: &EffectParams, time: f32, v: f32) -> f32 {
    fx.aberration_base + fx.aberration_swing * (time * fx.aberration_rate + v * fx.aberration_y_freq).sin()
}

/// Brightness multiplier: slow drift, fast scan flicker and jitter.
pub fn flicker(fx: &EffectParams, time: f32, uv: Vec2) -> f32 {
    fx.flicker_base
        + fx.flicker_slow_amp * (time * fx.flicker_slow_rate).sin()
        + fx.flicker_fast_amp * (time * fx.flicker_fast_rate + uv.x * fx.flicker_x_freq).sin()
        + fx.flicker_jitter * rand(Vec2::new(time, uv.y))
}

pub fn ghost_offset(fx: &EffectParams, time: f32) -> f32 {
    fx.ghost_base + fx.ghost_swing * (time * fx.ghost_rate).sin()
}

/// Gaussian radius of the focus blur.
pub fn blur_radius(fx: &EffectParams, time: f32) -> f32 {
    fx.blur_min + fx.blur_range * (0.5 + 0.5 * (time * fx.blur_rate).sin())
}

/// Hue drift in radians.
pub fn hue_angle(fx: &EffectParams, time: f32) -> f32 {
    let turns = fx.hue_amp_a * (time * fx.hue_rate_a).sin() + fx.hue_amp_b * (time * fx.hue_rate_b).cos();
    turns * std::f32::consts::TAU
}

/// Luminance-preserving hue rotation.
pub fn hue_rotate(color: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    let r = Vec3::new(
        0.299 + 0.701 * c + 0.168 * s,
        0.587 - 0.587 * c + 0.330 * s,
        0.114 - 0.114 * c - 0.497 * s,
    );
    let g = Vec3::new(
        0.299 - 0.299 * c - 0.328 * s,
        0.587 + 0.413 * c + 0.035 * s,
        0.114 - 0.114 * c + 0.292 * s,
    );
    let b = Vec3::new(
        0.299 - 0.300 * c + 1.250 * s,
        0.587 - 0.588 * c - 1.050 * s,
        0.114 + 0.886 * c - 0.203 * s,
    );
    Vec3::new(r.dot(color), g.dot(color), b.dot(color))
}

fn horizontal_gaussian<S: Sampler + ?Sized>(tex: &S, uv: Vec2, taps: i32, step: f32, denom: f32) -> Vec3 {
    let mut sum = Vec3::ZERO;
    let mut total = 0.0;
    for i in -taps..=taps {
        let w = (-((i * i) as f32) / denom).exp();
        sum += w * tex.sample(uv + Vec2::new(i as f32 * step, 0.0)).xyz();
        total += w;
    }
    sum / total
}

/// Final color of the fragment at texture coordinate `uv` and elapsed `time`.
pub fn stylize<S: Sampler + ?Sized>(tex: &S, uv: Vec2, time: f32, fx: &EffectParams) -> Vec4 {
    let uv = crt_curve(uv, fx);

    let aberration = aberration_offset(fx, time, uv.y);
    let base = tex.sample(uv);
    let mut color = Vec3::new(
        tex.sample(uv + Vec2::new(aberration, 0.0)).x,
        base.y,
        tex.sample(uv - Vec2::new(aberration, 0.0)).z,
    );
    let alpha = base.w;

    if alpha <= 0.0 {
        return Vec4::new(0.0, 0.0, 0.0, 1.0);
    }

    let flicker = flicker(fx, time, uv);

    let ghost = tex.sample(uv - Vec2::new(ghost_offset(fx, time), 0.0)).xyz();
    color = color.lerp(ghost, fx.ghost_mix);

    let radius = blur_radius(fx, time);
    let blurred = horizontal_gaussian(tex, uv, fx.blur_taps, fx.blur_step, 2.0 * radius * radius);
    color = color.lerp(blurred, fx.blur_mix);

    let edge = smoothstep(fx.edge_low, fx.edge_high, (alpha - 0.5).abs());
    let rainbow = 0.5
        + 0.5 * (time * fx.rainbow_rate + uv.x * fx.rainbow_x_freq + uv.y * fx.rainbow_y_freq).sin();
    let [tr, tg, tb] = fx.rainbow_tint;
    color += edge * Vec3::new(tr * rainbow, tg * (1.0 - rainbow), tb * (1.0 - rainbow));

    let bloom = horizontal_gaussian(tex, uv, fx.bloom_taps, fx.bloom_step, fx.bloom_sigma_divisor);
    color = color.lerp(bloom, fx.bloom_mix);

    color = hue_rotate(color, hue_angle(fx, time));

    let grain = rand(uv * time * fx.grain_scale + Vec2::splat(time * fx.grain_drift)) * 2.0 * fx.grain_amp
        - fx.grain_amp;
    color += Vec3::splat(grain);

    color *= flicker;

    color = (color - 0.5) * fx.contrast + 0.5;
    color *= fx.brightness;

    let vignette = smoothstep(fx.vignette_inner, fx.vignette_outer, uv.distance(Vec2::splat(0.5)));
    color *= 1.0 - fx.vignette_strength * vignette;

    color.clamp(Vec3::ZERO, Vec3::ONE).extend(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Solid white block in the middle of an otherwise clear bitmap.
    fn block() -> GlyphBitmap {
        let mut bitmap = GlyphBitmap::blank(64, 32);
        for y in 8..24 {
            for x in 16..48 {
                bitmap.set_rgba(x, y, [255, 255, 255, 255]);
            }
        }
        bitmap
    }

    #[test]
    fn barrel_keeps_center_and_pushes_corners_out() {
        let fx = EffectParams::CRT;
        assert_eq!(crt_curve(Vec2::splat(0.5), &fx), Vec2::splat(0.5));
        let corner = crt_curve(Vec2::new(1.0, 1.0), &fx);
        // r^2 = 2 at the corner.
        assert!((corner.x - (1.0 + 0.36) * 0.5 - 0.5).abs() < 1e-6);
    }

    #[test]
    fn sampler_clamps_and_filters() {
        let bitmap = block();
        assert_eq!(bitmap.sample(Vec2::new(-3.0, 0.5)).w, 0.0);
        assert_eq!(bitmap.sample(Vec2::splat(0.5)), Vec4::ONE);
        // Halfway between the last clear texel and the first covered one.
        let edge = bitmap.sample(Vec2::new(16.0 / 64.0, 0.5));
        assert!((edge.w - 0.5).abs() < 1e-6);
    }

    #[test]
    fn uncovered_pixels_are_opaque_black() {
        let bitmap = GlyphBitmap::blank(8, 8);
        for t in [0.0, 1.5, 40.0] {
            assert_eq!(
                stylize(&bitmap, Vec2::splat(0.5), t, &EffectParams::CRT),
                Vec4::new(0.0, 0.0, 0.0, 1.0)
            );
        }
    }

    #[test]
    fn covered_pixels_keep_coverage_as_alpha_and_stay_in_range() {
        let bitmap = block();
        let fx = EffectParams::CRT;
        for t in [0.0, 0.016, 3.7, 120.0] {
            for uv in [Vec2::splat(0.5), Vec2::new(0.3, 0.45), Vec2::new(0.7, 0.6)] {
                let out = stylize(&bitmap, uv, t, &fx);
                let mask = bitmap.sample(crt_curve(uv, &fx)).w;
                assert_eq!(out.w, mask);
                assert!(out.xyz().cmpge(Vec3::ZERO).all() && out.xyz().cmple(Vec3::ONE).all());
            }
        }
    }

    #[test]
    fn glyph_interior_is_lit() {
        let out = stylize(&block(), Vec2::splat(0.5), 0.25, &EffectParams::CRT);
        assert!(out.xyz().max_element() > 0.3, "{out:?}");
    }

    #[test]
    fn hue_rotation_preserves_grey() {
        for angle in [0.0, 0.4, -1.1, 3.0] {
            let grey = Vec3::splat(0.6);
            let rotated = hue_rotate(grey, angle);
            assert!((rotated - grey).abs().max_element() < 0.01, "{angle}: {rotated:?}");
        }
        let red = Vec3::new(1.0, 0.0, 0.0);
        // The published coefficients are rounded to three places.
        assert!((hue_rotate(red, 0.0) - red).abs().max_element() < 0.01);
    }

    #[test]
    fn rand_stays_in_unit_interval() {
        for i in 0..200 {
            let v = rand(Vec2::new(i as f32 * 0.37, i as f32 * 1.91));
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn modulators_follow_their_ranges() {
        let fx = EffectParams::CRT;
        for i in 0..500 {
            let t = i as f32 * 0.173;
            let blur = blur_radius(&fx, t);
            assert!((0.7..=1.3 + 1e-6).contains(&blur));
            let ghost = ghost_offset(&fx, t);
            assert!((0.015 - 1e-6..=0.035 + 1e-6).contains(&ghost));
            let aberration = aberration_offset(&fx, t, 0.5);
            assert!((0.003 - 1e-6..=0.009 + 1e-6).contains(&aberration));
            let f = flicker(&fx, t, Vec2::splat(0.5));
            assert!((0.93..=1.02).contains(&f));
        }
    }
}
