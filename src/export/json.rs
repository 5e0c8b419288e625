//! JSON sidecar in the same shape as the runtime shape-atlas manifest.

use serde::{Deserialize, Serialize};

use crate::atlas::GlyphMetrics;
use crate::pipeline::FontAtlas;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutUv {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RectPx {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutGlyphEntry {
    pub id: u32,
    pub px: RectPx,
    pub uv: OutUv,
    pub x_offset: f32,
    pub y_offset: f32,
    pub x_advance: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutRoot {
    pub version: u32,
    pub face: String,
    pub pixel_size: u32,
    pub distance_range: f32,
    pub atlas_width: u32,
    pub atlas_height: u32,
    pub channel_mode: String,
    pub glyphs: Vec<OutGlyphEntry>,
}

pub fn manifest(font: &FontAtlas, glyphs: &[GlyphMetrics]) -> OutRoot {
    let s = font.texture_size();
    let sf = s as f32;
    let glyphs = glyphs
        .iter()
        .map(|g| OutGlyphEntry {
            id: g.id,
            px: RectPx {
                x: g.x,
                y: g.y,
                w: g.width,
                h: g.height,
            },
            uv: OutUv {
                u0: g.x as f32 / sf,
                v0: g.y as f32 / sf,
                u1: (g.x + g.width) as f32 / sf,
                v1: (g.y + g.height) as f32 / sf,
            },
            x_offset: g.x_offset,
            y_offset: g.y_offset,
            x_advance: g.x_advance,
        })
        .collect();
    OutRoot {
        version: 1,
        face: font.face_name.clone(),
        pixel_size: font.pixel_size,
        distance_range: font.distance_range,
        atlas_width: s,
        atlas_height: s,
        channel_mode: "sdf_r8".into(),
        glyphs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::Atlas;

    #[test]
    fn uv_spans_the_slot() {
        let g = GlyphMetrics {
            id: 65,
            width: 16,
            height: 32,
            x: 16,
            y: 0,
            x_offset: 0.0,
            y_offset: 0.0,
            x_advance: 8.0,
        };
        let font = FontAtlas {
            face_name: "F".into(),
            pixel_size: 12,
            atlas: Atlas::new(64),
            glyphs: vec![g],
            unavailable: vec![],
            distance_range: 2.0,
        };
        let root = manifest(&font, &font.glyphs);
        assert_eq!(root.glyphs[0].uv, OutUv { u0: 0.25, v0: 0.0, u1: 0.5, v1: 0.5 });
        let js = serde_json::to_string_pretty(&root).unwrap();
        assert!(js.contains("\"channel_mode\": \"sdf_r8\""));
        let back: OutRoot = serde_json::from_str(&js).unwrap();
        assert_eq!(back, root);
    }
}
