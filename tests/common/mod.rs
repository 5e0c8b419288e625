#![allow(dead_code)]

use std::collections::BTreeSet;

use sdfont::glyph::GlyphRaster;
use sdfont::{GlyphSource, RectanglePacker, SdfError, SdfResult};

/// Synthetic face: every glyph is a hollow box whose width depends on the code.
pub struct BoxFont {
    pub missing: BTreeSet<u32>,
}

impl BoxFont {
    pub fn new() -> Self {
        Self { missing: BTreeSet::new() }
    }

    pub fn without(codes: &[u32]) -> Self {
        Self { missing: codes.iter().copied().collect() }
    }
}

impl GlyphSource for BoxFont {
    fn face_name(&self) -> &str {
        "Box Sans"
    }

    fn rasterize(&mut self, code: u32, pixel_size: u32) -> SdfResult<GlyphRaster> {
        if self.missing.contains(&code) {
            return Err(SdfError::GlyphUnavailable { code });
        }
        let w = (pixel_size * (code % 5 + 3) / 10).max(1);
        let h = (pixel_size * 7 / 10).max(1);
        let wall = (pixel_size / 10).max(1);
        let mut r = GlyphRaster::from_fn(w, h, |x, y| {
            x < wall || y < wall || x + wall >= w || y + wall >= h
        });
        r.bearing_x = (pixel_size / 20) as i32;
        r.bearing_y = h as i32;
        r.advance = pixel_size as f32 * 0.6;
        Ok(r)
    }
}

/// Fits whenever the summed area fits the page; stacks everything at the origin.
pub struct AreaOracle;

impl RectanglePacker for AreaOracle {
    fn pack(&mut self, sizes: &[(u32, u32)], page: u32) -> Option<Vec<(u32, u32)>> {
        let area: u64 = sizes.iter().map(|&(w, h)| w as u64 * h as u64).sum();
        let fits = sizes.iter().all(|&(w, h)| w <= page && h <= page);
        (fits && area <= page as u64 * page as u64).then(|| vec![(0, 0); sizes.len()])
    }
}
