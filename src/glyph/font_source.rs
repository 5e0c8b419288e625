//! TrueType / OpenType glyph source: `ttf-parser` for the character maps and
//! family name, `ab_glyph` for outlines and coverage.

use ab_glyph::{point, Font, FontRef, GlyphId, OutlinedGlyph, PxScale};
use tracing::{debug, warn};
use ttf_parser as ttf;

use super::{mac_roman::unicode_to_mac_roman, GlyphMeasure, GlyphRaster, GlyphSource};
use crate::core::error::{SdfError, SdfResult};

/// Coverage at or above this sets the bit (bilevel rendering).
const MONO_THRESHOLD: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CodeMapping {
    Identity,
    MacRoman,
}

impl CodeMapping {
    fn for_subtable(sub: &ttf::cmap::Subtable<'_>) -> Self {
        Self::for_ids(sub.platform_id, sub.encoding_id)
    }

    /// Only the Macintosh Roman table (platform 1, encoding 0) needs converting.
    fn for_ids(platform: ttf::PlatformId, encoding: u16) -> Self {
        if platform == ttf::PlatformId::Macintosh && encoding == 0 {
            CodeMapping::MacRoman
        } else {
            CodeMapping::Identity
        }
    }

    fn apply(self, code: u32) -> Option<u32> {
        match self {
            CodeMapping::Identity => Some(code),
            CodeMapping::MacRoman => unicode_to_mac_roman(code),
        }
    }
}

/// Tries each table at most once, starting from `*current`, and leaves
/// `*current` on the table that answered. Glyph 0 (`.notdef`) is a miss.
fn rotate_lookup<T>(
    tables: &[(T, CodeMapping)],
    current: &mut usize,
    code: u32,
    mut glyph_index: impl FnMut(&T, u32) -> Option<u16>,
) -> Option<u16> {
    let n = tables.len();
    for step in 0..n {
        let idx = (*current + step) % n;
        let (table, mapping) = &tables[idx];
        let hit = mapping
            .apply(code)
            .and_then(|mapped| glyph_index(table, mapped))
            .filter(|&gid| gid != 0);
        if hit.is_some() {
            *current = idx;
            return hit;
        }
    }
    None
}

pub struct FontGlyphSource<'a> {
    font: FontRef<'a>,
    subtables: Vec<(ttf::cmap::Subtable<'a>, CodeMapping)>,
    /// Subtable the last successful lookup used; lookups start here.
    current: usize,
    face_name: String,
    units_per_em: f32,
}

impl<'a> FontGlyphSource<'a> {
    pub fn from_bytes(data: &'a [u8]) -> SdfResult<Self> {
        let font = FontRef::try_from_slice(data).map_err(|e| SdfError::FontParse(e.to_string()))?;
        let face = ttf::Face::parse(data, 0).map_err(|e| SdfError::FontParse(e.to_string()))?;
        let subtables: Vec<_> = face
            .tables()
            .cmap
            .map(|cmap| {
                cmap.subtables
                    .into_iter()
                    .map(|s| (s, CodeMapping::for_subtable(&s)))
                    .collect()
            })
            .unwrap_or_default();
        if subtables.is_empty() {
            warn!("font has no character map; every glyph lookup will fail");
        }
        let face_name = face
            .names()
            .into_iter()
            .filter(|n| n.name_id == ttf::name_id::FAMILY)
            .find_map(|n| n.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let units_per_em = font.units_per_em().unwrap_or(face.units_per_em() as f32);
        debug!(face = %face_name, subtables = subtables.len(), "font loaded");
        Ok(Self {
            font,
            subtables,
            current: 0,
            face_name,
            units_per_em,
        })
    }

    fn lookup(&mut self, code: u32) -> SdfResult<GlyphId> {
        let gid = rotate_lookup(&self.subtables, &mut self.current, code, |sub, c| {
            sub.glyph_index(c).map(|g| g.0)
        })
        .ok_or(SdfError::GlyphUnavailable { code })?;
        Ok(GlyphId(gid))
    }

    fn scale(&self, pixel_size: u32) -> PxScale {
        // ab_glyph scales by font height; convert so one em spans `pixel_size` pixels.
        PxScale::from(pixel_size as f32 * self.font.height_unscaled() / self.units_per_em)
    }

    fn advance(&self, id: GlyphId, pixel_size: u32) -> f32 {
        self.font.h_advance_unscaled(id) * pixel_size as f32 / self.units_per_em
    }

    fn outline(&self, id: GlyphId, pixel_size: u32) -> Option<OutlinedGlyph> {
        let glyph = id.with_scale_and_position(self.scale(pixel_size), point(0.0, 0.0));
        self.font.outline_glyph(glyph)
    }
}

fn measure_outline(outlined: &OutlinedGlyph, advance: f32) -> GlyphMeasure {
    let b = outlined.px_bounds();
    GlyphMeasure {
        width: (b.max.x - b.min.x).max(0.0) as u32,
        height: (b.max.y - b.min.y).max(0.0) as u32,
        bearing_x: b.min.x as i32,
        bearing_y: -(b.min.y as i32),
        advance,
    }
}

impl GlyphSource for FontGlyphSource<'_> {
    fn face_name(&self) -> &str {
        &self.face_name
    }

    fn rasterize(&mut self, code: u32, pixel_size: u32) -> SdfResult<GlyphRaster> {
        let id = self.lookup(code)?;
        let advance = self.advance(id, pixel_size);
        let Some(outlined) = self.outline(id, pixel_size) else {
            return Ok(GlyphRaster::empty(0, 0, advance));
        };
        let m = measure_outline(&outlined, advance);
        let mut coverage = vec![0.0f32; (m.width * m.height) as usize];
        outlined.draw(|x, y, c| {
            if x < m.width && y < m.height {
                coverage[(y * m.width + x) as usize] = c;
            }
        });
        let mut raster = GlyphRaster::from_fn(m.width, m.height, |x, y| {
            coverage[(y * m.width + x) as usize] >= MONO_THRESHOLD
        });
        raster.bearing_x = m.bearing_x;
        raster.bearing_y = m.bearing_y;
        raster.advance = advance;
        Ok(raster)
    }

    fn measure(&mut self, code: u32, pixel_size: u32) -> SdfResult<GlyphMeasure> {
        let id = self.lookup(code)?;
        let advance = self.advance(id, pixel_size);
        Ok(match self.outline(id, pixel_size) {
            Some(outlined) => measure_outline(&outlined, advance),
            None => GlyphMeasure {
                width: 0,
                height: 0,
                bearing_x: 0,
                bearing_y: 0,
                advance,
            },
        })
    }
}
