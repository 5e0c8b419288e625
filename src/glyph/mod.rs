//! Glyph rasters and the sources that produce them.

pub mod charmap;
pub mod enumerate;
pub mod font_source;
pub mod mac_roman;

pub use charmap::CharMap;
pub use enumerate::{enumerate_codes, RenderRequest};
pub use font_source::FontGlyphSource;

use crate::core::error::SdfResult;

/// Bilevel glyph bitmap, MSB-first packed rows, plus placement metrics in
/// supersampled pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRaster {
    pub width: u32,
    pub height: u32,
    /// Bytes per packed row.
    pub stride: usize,
    pub bits: Vec<u8>,
    /// Cursor to left edge of the raster.
    pub bearing_x: i32,
    /// Baseline to top edge of the raster, positive upwards.
    pub bearing_y: i32,
    pub advance: f32,
}

impl GlyphRaster {
    pub fn empty(bearing_x: i32, bearing_y: i32, advance: f32) -> Self {
        Self {
            width: 0,
            height: 0,
            stride: 0,
            bits: Vec::new(),
            bearing_x,
            bearing_y,
            advance,
        }
    }

    /// Builds a raster from a predicate over pixel coordinates.
    pub fn from_fn(width: u32, height: u32, mut inside: impl FnMut(u32, u32) -> bool) -> Self {
        let stride = (width as usize).div_ceil(8);
        let mut bits = vec![0u8; stride * height as usize];
        for y in 0..height {
            for x in 0..width {
                if inside(x, y) {
                    bits[y as usize * stride + (x as usize >> 3)] |= 0x80 >> (x & 7);
                }
            }
        }
        Self {
            width,
            height,
            stride,
            bits,
            bearing_x: 0,
            bearing_y: height as i32,
            advance: width as f32,
        }
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        let byte = self.bits[y as usize * self.stride + (x as usize >> 3)];
        (byte >> (7 - (x & 7))) & 1 == 1
    }

    pub fn measure(&self) -> GlyphMeasure {
        GlyphMeasure {
            width: self.width,
            height: self.height,
            bearing_x: self.bearing_x,
            bearing_y: self.bearing_y,
            advance: self.advance,
        }
    }
}

/// Raster dimensions and metrics without the pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMeasure {
    pub width: u32,
    pub height: u32,
    pub bearing_x: i32,
    pub bearing_y: i32,
    pub advance: f32,
}

/// Anything that can turn a character code into a bilevel raster at a given
/// em size in pixels.
pub trait GlyphSource {
    /// Family name written into exported metadata.
    fn face_name(&self) -> &str;

    /// Returns `SdfError::GlyphUnavailable` when the code has no glyph.
    fn rasterize(&mut self, code: u32, pixel_size: u32) -> SdfResult<GlyphRaster>;

    /// Size and metrics only. Sources that can skip drawing should override this.
    fn measure(&mut self, code: u32, pixel_size: u32) -> SdfResult<GlyphMeasure> {
        self.rasterize(code, pixel_size).map(|r| r.measure())
    }
}
