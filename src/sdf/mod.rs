//! Brute-force signed distance synthesis.
//!
//! Each output pixel searches outward in square rings around its sample
//! point for the nearest pixel of opposite sign. Cost is roughly
//! `out_w * out_h * R` per glyph, fine for the sizes a font atlas deals in.

pub mod image_source;

pub use image_source::{render_image_sdf, ImageSdfOptions};

use crate::core::config::SamplingConfig;
use crate::glyph::GlyphRaster;

/// Row-major byte grid; any non-zero value is foreground.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceGrid {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl DistanceGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// `data` must hold exactly `width * height` bytes.
    pub(crate) fn from_data(width: usize, height: usize, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), width * height, "grid data size mismatch");
        Self {
            width,
            height,
            data,
        }
    }

    /// Copies `raster` into a zero grid with `border` empty pixels on every side.
    pub fn padded(raster: &GlyphRaster, border: usize) -> Self {
        let w = raster.width as usize + 2 * border;
        let h = raster.height as usize + 2 * border;
        let mut grid = Self::new(w, h);
        for y in 0..raster.height {
            let row = (y as usize + border) * w + border;
            for x in 0..raster.width {
                if raster.get(x, y) {
                    grid.data[row + x as usize] = 255;
                }
            }
        }
        grid
    }

    #[inline]
    fn inside(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] != 0
    }

    /// Squared distance from `(x, y)` to the nearest pixel of opposite sign
    /// within `max_radius`, or `None` when the neighbourhood is uniform.
    pub fn nearest_sign_change_sq(&self, x: usize, y: usize, max_radius: usize) -> Option<u64> {
        let center = self.inside(x, y);
        let (xi, yi) = (x as i64, y as i64);
        let (w, h) = (self.width as i64, self.height as i64);
        let mut best: Option<u64> = None;
        let consider = |px: i64, py: i64, best: &mut Option<u64>| {
            if self.inside(px as usize, py as usize) != center {
                let (dx, dy) = (px - xi, py - yi);
                let d2 = (dx * dx + dy * dy) as u64;
                if best.map_or(true, |b| d2 < b) {
                    *best = Some(d2);
                }
            }
        };
        for r in 1..=max_radius as i64 {
            if best.is_some_and(|b| (r * r) as u64 >= b) {
                break;
            }
            // north and south rows, corners included
            let lo = (xi - r).max(0);
            let hi = (xi + r).min(w - 1);
            for line in [yi - r, yi + r] {
                if (0..h).contains(&line) {
                    for px in lo..=hi {
                        consider(px, line, &mut best);
                    }
                }
            }
            // west and east columns, corners excluded
            let lo = (yi - r + 1).max(0);
            let hi = (yi + r - 1).min(h - 1);
            for line in [xi - r, xi + r] {
                if (0..w).contains(&line) {
                    for py in lo..=hi {
                        consider(line, py, &mut best);
                    }
                }
            }
        }
        best
    }

    /// Signed distance byte at `(x, y)`; 127.5 is the boundary.
    pub fn distance_byte(&self, x: usize, y: usize, max_radius: usize) -> u8 {
        let dist = self
            .nearest_sign_change_sq(x, y, max_radius)
            .map_or(max_radius as f32, |d2| (d2 as f32).sqrt());
        encode_distance(self.inside(x, y), dist, max_radius as f32)
    }
}

/// Maps a distance in `[0, max_radius]` to a byte, foreground above 127.5.
#[inline]
pub fn encode_distance(inside: bool, dist: f32, max_radius: f32) -> u8 {
    let signed = if inside { dist } else { -dist };
    (127.5 + signed * 127.5 / max_radius).round().clamp(0.0, 255.0) as u8
}

/// Output-resolution distance bytes for one glyph, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphField {
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl GlyphField {
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.bytes[(y * self.width + x) as usize]
    }
}

/// Pads, then samples the centre of every `supersample`-sized cell.
pub fn synthesize_glyph(raster: &GlyphRaster, sampling: &SamplingConfig) -> GlyphField {
    let f = sampling.supersample as usize;
    let grid = DistanceGrid::padded(raster, sampling.padding_px() as usize);
    let width = sampling.output_extent(raster.width);
    let height = sampling.output_extent(raster.height);
    let radius = sampling.search_radius_px() as usize;
    let mut bytes = Vec::with_capacity((width * height) as usize);
    for j in 0..height as usize {
        let sy = (j * f + f / 2).min(grid.height - 1);
        for i in 0..width as usize {
            let sx = (i * f + f / 2).min(grid.width - 1);
            bytes.push(grid.distance_byte(sx, sy, radius));
        }
    }
    GlyphField {
        width,
        height,
        bytes,
    }
}
