//! Font → atlas: size search, per-glyph synthesis, composition.

use std::path::Path;

use tracing::{debug, info};

use crate::atlas::{Atlas, AtlasComposer, GlyphMetrics, RectanglePacker, SizeSearch};
use crate::core::config::SdfConfig;
use crate::core::error::{SdfError, SdfResult};
use crate::core::logging::{timed, Telemetry};
use crate::export::{export_font, ExportReport};
use crate::glyph::{enumerate_codes, CharMap, GlyphSource, RenderRequest};
use crate::sdf::synthesize_glyph;

/// Finished atlas plus everything the exporters need.
#[derive(Debug, Clone)]
pub struct FontAtlas {
    pub face_name: String,
    /// Em size in output pixels.
    pub pixel_size: u32,
    pub atlas: Atlas,
    /// In request order, ids still unicode until relabeled for export.
    pub glyphs: Vec<GlyphMetrics>,
    pub unavailable: Vec<u32>,
    /// Search radius in output pixels; a byte step of 127.5 spans this distance.
    pub distance_range: f32,
}

impl FontAtlas {
    pub fn texture_size(&self) -> u32 {
        self.atlas.size()
    }
}

pub fn build_font_atlas(
    source: &mut dyn GlyphSource,
    request: &RenderRequest,
    packer: &mut dyn RectanglePacker,
    cfg: &SdfConfig,
    texture_size: u32,
) -> SdfResult<FontAtlas> {
    info!(
        codes = request.len(),
        "determining ideal font pixel size for a {texture_size}^2 texture"
    );
    let outcome =
        SizeSearch::new(&cfg.sampling, &cfg.search, texture_size).run(source, request, packer)?;
    if !outcome.unavailable.is_empty() {
        info!(
            skipped = outcome.unavailable.len(),
            "characters without glyphs were left out"
        );
    }

    let render_px = outcome.pixel_size * cfg.sampling.supersample;
    let mut composer = AtlasComposer::new(texture_size);
    info!("rendering {} characters into the atlas", outcome.glyphs.len());
    for slot in &outcome.glyphs {
        let raster = source.rasterize(slot.id, render_px).map_err(|e| match e {
            SdfError::GlyphUnavailable { code } => SdfError::LayoutViolation {
                id: code,
                reason: "glyph disappeared between sizing and rendering".into(),
            },
            other => other,
        })?;
        let field = synthesize_glyph(&raster, &cfg.sampling);
        composer.place(slot, &field)?;
        debug!(
            id = slot.id,
            x = slot.x,
            y = slot.y,
            w = slot.width,
            h = slot.height,
            "glyph placed"
        );
    }

    Ok(FontAtlas {
        face_name: source.face_name().to_string(),
        pixel_size: outcome.pixel_size,
        atlas: composer.finish(),
        glyphs: outcome.glyphs,
        unavailable: outcome.unavailable,
        distance_range: cfg.sampling.search_radius_cells as f32,
    })
}

/// Font mode end to end: enumerate, build, then export under `stem`.
/// Artifacts are only written once the whole atlas has been composed.
pub fn render_font(
    source: &mut dyn GlyphSource,
    map: Option<&CharMap>,
    packer: &mut dyn RectanglePacker,
    cfg: &SdfConfig,
    texture_size: u32,
    stem: &Path,
    telemetry: &mut dyn Telemetry,
) -> SdfResult<ExportReport> {
    let request = enumerate_codes(map, cfg.max_char);
    let font = timed(telemetry, "font atlas", || {
        build_font_atlas(source, &request, packer, cfg, texture_size)
    })?;
    info!(
        face = %font.face_name,
        pixel_size = font.pixel_size,
        glyphs = font.glyphs.len(),
        skipped = font.unavailable.len(),
        "atlas built"
    );
    Ok(export_font(&font, map, stem, &cfg.export, telemetry))
}
