pub mod atlas;
pub mod core;
pub mod export;
pub mod glyph;
pub mod pipeline;
pub mod sdf;

// Curated re-exports
pub use atlas::{Atlas, GlyphMetrics, RectanglePacker, SizeSearch, SkylinePacker};
pub use core::config::SdfConfig;
pub use core::error::{SdfError, SdfResult};
pub use glyph::{
    enumerate_codes, CharMap, FontGlyphSource, GlyphRaster, GlyphSource, RenderRequest,
};
pub use pipeline::{build_font_atlas, render_font, FontAtlas};
