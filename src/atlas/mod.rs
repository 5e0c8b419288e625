//! Glyph layout: pixel-size search, rectangle packing and atlas composition.

pub mod compose;
pub mod packer;
pub mod size_search;

pub use compose::{Atlas, AtlasComposer};
pub use packer::{RectanglePacker, SkylinePacker};
pub use size_search::{PackAttempt, SearchOutcome, SearchPhase, SizeSearch};

use crate::core::config::SamplingConfig;
use crate::glyph::{CharMap, GlyphMeasure};

/// Placement of one glyph in the atlas, offsets and advance in output pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMetrics {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
    pub x_offset: f32,
    pub y_offset: f32,
    pub x_advance: f32,
}

impl GlyphMetrics {
    /// Converts supersampled source metrics into output pixels, compensating
    /// for the padding border. Position is filled in by the packer.
    pub fn from_measure(id: u32, m: &GlyphMeasure, sampling: &SamplingConfig) -> Self {
        let f = sampling.supersample as f32;
        let border = sampling.border_compensation();
        Self {
            id,
            width: sampling.output_extent(m.width),
            height: sampling.output_extent(m.height),
            x: 0,
            y: 0,
            x_offset: m.bearing_x as f32 / f - border,
            y_offset: m.bearing_y as f32 / f + border,
            x_advance: m.advance / f,
        }
    }

    /// Half-open rectangles overlap test.
    pub fn overlaps(&self, other: &GlyphMetrics) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Vertical extent of the exported glyph set, in output pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FontExtents {
    pub ascent: f32,
    pub descent: f32,
}

impl FontExtents {
    fn include(&mut self, g: &GlyphMetrics) {
        self.ascent = self.ascent.max(g.y_offset);
        self.descent = self.descent.min(g.y_offset - g.height as f32);
    }
}

/// Relabels ids from unicode to the map's codepage and measures the extents
/// of the relabeled glyphs. Without a map every glyph counts and ids stay.
pub fn relabel_ids(glyphs: &mut [GlyphMetrics], map: Option<&CharMap>) -> FontExtents {
    let mut ext = FontExtents::default();
    for g in glyphs.iter_mut() {
        match map.filter(|m| !m.is_empty()) {
            Some(m) => {
                if let Some(cp) = m.to_codepage(g.id) {
                    g.id = cp;
                    ext.include(g);
                }
            }
            None => ext.include(g),
        }
    }
    ext
}
