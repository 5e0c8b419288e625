use serde::Deserialize;
use std::{fs, path::Path};

use crate::core::error::{SdfError, SdfResult};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AtlasConfig {
    /// Edge length of the square output texture, before clamping.
    pub texture_size: u32,
    pub min_texture_size: u32,
    pub max_texture_size: u32,
}
impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            texture_size: 512,
            min_texture_size: 64,
            max_texture_size: 4096,
        }
    }
}
impl AtlasConfig {
    pub fn clamp_texture_size(&self, requested: u32) -> u32 {
        requested.clamp(self.min_texture_size, self.max_texture_size.max(self.min_texture_size))
    }
}

/// Supersampling and distance search tuning, shared by the size search and the synthesizer.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SamplingConfig {
    /// Rendered pixels per SDF pixel along each axis.
    pub supersample: u32,
    /// Zero border added on each side of a glyph raster, in SDF pixels.
    pub padding_cells: u32,
    /// Maximum ring search radius, in SDF pixels.
    pub search_radius_cells: u32,
}
impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            supersample: 16,
            padding_cells: 4,
            search_radius_cells: 2,
        }
    }
}
impl SamplingConfig {
    #[inline]
    pub fn padding_px(&self) -> u32 {
        self.padding_cells * self.supersample
    }
    #[inline]
    pub fn search_radius_px(&self) -> u32 {
        self.search_radius_cells * self.supersample
    }
    /// Output (SDF pixel) extent for a raster extent in supersampled pixels.
    #[inline]
    pub fn output_extent(&self, raster_extent: u32) -> u32 {
        (raster_extent + 2 * self.padding_px()).div_ceil(self.supersample)
    }
    /// Offset compensation for the padding border, in output pixels.
    #[inline]
    pub fn border_compensation(&self) -> f32 {
        self.padding_cells as f32
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// First doubling step attempts twice this size.
    pub seed_pixel_size: u32,
    /// Sizes above this count as failed attempts, so the chosen pixel size is
    /// never larger than the cap even when bigger glyphs would still fit.
    /// `None` caps at the texture size.
    pub max_pixel_size: Option<u32>,
}
impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            seed_pixel_size: 4,
            max_pixel_size: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub c_header: bool,
    pub json: bool,
    /// Fixed-point factor for offsets/advance in the C header.
    pub header_scale_factor: f32,
    pub png_comment: bool,
}
impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            c_header: false,
            json: false,
            header_scale_factor: 1000.0,
            png_comment: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SdfConfig {
    pub atlas: AtlasConfig,
    pub sampling: SamplingConfig,
    pub search: SearchConfig,
    pub export: ExportConfig,
    /// Highest code tried when no mapping file is given.
    pub max_char: u32,
}
impl Default for SdfConfig {
    fn default() -> Self {
        Self {
            atlas: AtlasConfig::default(),
            sampling: SamplingConfig::default(),
            search: SearchConfig::default(),
            export: ExportConfig::default(),
            max_char: 255,
        }
    }
}

/// Reads one RON layer as an untyped value so layers can be merged before
/// deserializing.
fn read_layer(path: &Path) -> SdfResult<ron::value::Value> {
    let txt = fs::read_to_string(path).map_err(|e| SdfError::io(path, e))?;
    ron::from_str(&txt).map_err(|e| SdfError::Config(format!("{}: {e}", path.display())))
}

fn merge_value(base: &mut ron::value::Value, overlay: ron::value::Value) {
    use ron::value::Value;
    match (base, overlay) {
        (Value::Map(bm), Value::Map(om)) => {
            for (k, v) in om.into_iter() {
                let mut incoming = Some(v);
                if let Some((_, ev)) = bm.iter_mut().find(|(ek, _)| **ek == k) {
                    if let Some(val) = incoming.take() {
                        merge_value(ev, val);
                    }
                }
                if let Some(val) = incoming {
                    bm.insert(k, val);
                }
            }
        }
        (b, o) => *b = o,
    }
}

impl SdfConfig {
    /// Deep-merges every readable file in order (later files win) and returns
    /// the config plus the used paths and the per-file errors.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<SdfError>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        let mut merged: Option<ron::value::Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        for p in paths {
            let path_ref = p.as_ref();
            match read_layer(path_ref) {
                Ok(val) => {
                    if let Some(cur) = &mut merged {
                        merge_value(cur, val);
                    } else {
                        merged = Some(val);
                    }
                    used.push(path_ref.display().to_string());
                }
                Err(e) => errors.push(e),
            }
        }
        match merged {
            Some(val) => match val.into_rust::<SdfConfig>() {
                Ok(cfg) => (cfg, used, errors),
                Err(e) => {
                    errors.push(SdfError::Config(format!(
                        "failed to deserialize merged config; using defaults: {e}"
                    )));
                    (SdfConfig::default(), used, errors)
                }
            },
            None => (SdfConfig::default(), used, errors),
        }
    }
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        let s = &self.sampling;
        if s.supersample == 0 {
            w.push("sampling.supersample must be > 0".into());
        } else if s.supersample > 64 {
            w.push(format!(
                "sampling.supersample {} very high; glyph rasters grow quadratically",
                s.supersample
            ));
        }
        if s.search_radius_cells == 0 {
            w.push("sampling.search_radius_cells must be > 0".into());
        }
        if s.padding_cells < s.search_radius_cells {
            w.push(format!(
                "sampling.padding_cells {} smaller than search_radius_cells {}; \
                 field will clip at glyph edges",
                s.padding_cells, s.search_radius_cells
            ));
        }
        let a = &self.atlas;
        if a.min_texture_size == 0 {
            w.push("atlas.min_texture_size must be > 0".into());
        }
        if a.min_texture_size > a.max_texture_size {
            w.push(format!(
                "atlas.min_texture_size ({}) greater than max_texture_size ({})",
                a.min_texture_size, a.max_texture_size
            ));
        }
        if !a.texture_size.is_power_of_two() {
            w.push(format!(
                "atlas.texture_size {} is not a power of two",
                a.texture_size
            ));
        }
        if self.search.seed_pixel_size == 0 {
            w.push("search.seed_pixel_size must be > 0".into());
        }
        if let Some(cap) = self.search.max_pixel_size {
            if cap <= self.search.seed_pixel_size {
                w.push(format!(
                    "search.max_pixel_size {cap} not above seed_pixel_size {}; every attempt fails",
                    self.search.seed_pixel_size
                ));
            }
        }
        if self.export.header_scale_factor <= 0.0 {
            w.push("export.header_scale_factor must be > 0".into());
        }
        if self.max_char > 0x10FFFF {
            w.push(format!("max_char 0x{:x} beyond the Unicode range", self.max_char));
        }
        w
    }
}
