//! The rasterized label: an RGBA8 pixel buffer, row 0 at the top.

use crate::error::SetupError;

#[derive(Debug, Clone, PartialEq)]
pub struct GlyphBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Inclusive pixel bounds of the non-transparent area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl GlyphBitmap {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, SetupError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(SetupError::BitmapSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Fully transparent bitmap.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn rgba_at(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.rgba_at(x, y)[3]
    }

    pub fn set_rgba(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    /// Tight bounds of every pixel with non-zero alpha, `None` for an empty
    /// bitmap.
    pub fn coverage_bounds(&self) -> Option<CoverageBounds> {
        let mut bounds: Option<CoverageBounds> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.alpha_at(x, y) == 0 {
                    continue;
                }
                let b = bounds.get_or_insert(CoverageBounds {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                });
                b.min_x = b.min_x.min(x);
                b.min_y = b.min_y.min(y);
                b.max_x = b.max_x.max(x);
                b.max_y = b.max_y.max(y);
            }
        }
        bounds
    }

    /// True when the coverage reaches the border, i.e. the label was likely
    /// clipped.
    pub fn touches_edge(&self) -> bool {
        match self.coverage_bounds() {
            Some(b) => {
                b.min_x == 0
                    || b.min_y == 0
                    || b.max_x + 1 >= self.width
                    || b.max_y + 1 >= self.height
            }
            None => false,
        }
    }
}
