//! The static quad the label is drawn on.
//!
//! Positions span [-1, 1] x [-0.5, 0.5] on the z = 0 plane. Texture space has
//! its origin at the top-left of the bitmap while positions grow upwards, so
//! the v coordinate is flipped: the top edge (y = +0.5) samples bitmap row 0.

pub const QUAD_VERTEX_COUNT: i32 = 6;

#[rustfmt::skip]
pub const QUAD_POSITIONS: [f32; 18] = [
    -1.0, -0.5, 0.0,
     1.0, -0.5, 0.0,
    -1.0,  0.5, 0.0,
    -1.0,  0.5, 0.0,
     1.0, -0.5, 0.0,
     1.0,  0.5, 0.0,
];

#[rustfmt::skip]
pub const QUAD_UVS: [f32; 12] = [
    0.0, 1.0,
    1.0, 1.0,
    0.0, 0.0,
    0.0, 0.0,
    1.0, 1.0,
    1.0, 0.0,
];

pub const POSITION_ATTRIBUTE: &str = "a_position";
pub const UV_ATTRIBUTE: &str = "a_uv";

/// Vertex `index` as (position, uv).
pub fn vertex(index: usize) -> ([f32; 3], [f32; 2]) {
    let p = &QUAD_POSITIONS[index * 3..index * 3 + 3];
    let t = &QUAD_UVS[index * 2..index * 2 + 2];
    ([p[0], p[1], p[2]], [t[0], t[1]])
}
