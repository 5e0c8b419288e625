use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while building or exporting an SDF atlas.
#[derive(Debug, Error)]
pub enum SdfError {
    /// The glyph source has no raster for this code in any of its tables.
    #[error("no glyph available for character 0x{code:x}")]
    GlyphUnavailable { code: u32 },
    /// Candidate pixel size does not fit the page (or exceeds the size cap).
    /// Raised by a pack attempt and consumed by the size search.
    #[error("glyphs rendered at {pixel_size}px do not fit the page")]
    PackingOverflow { pixel_size: u32 },
    #[error("the glyph set does not fit a {texture_size}x{texture_size} texture at any pixel size")]
    AtlasInfeasible { texture_size: u32 },
    #[error("none of the requested characters has a glyph")]
    EmptyGlyphSet,
    #[error("glyph 0x{id:x} violates the packed layout: {reason}")]
    LayoutViolation { id: u32, reason: String },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse font: {0}")]
    FontParse(String),
    #[error("failed to decode image {}: {reason}", path.display())]
    ImageDecode { path: PathBuf, reason: String },
    #[error("image {width}x{height} is not larger than the {texture_size}px output texture")]
    ImageTooSmall {
        width: u32,
        height: u32,
        texture_size: u32,
    },
    #[error("a {texture_size}px texture is too small to sample onto")]
    TextureTooSmall { texture_size: u32 },
    #[error("png encoding failed: {0}")]
    Encode(String),
    #[error("metadata line {line}: {reason}")]
    Metadata { line: usize, reason: String },
    #[error("config: {0}")]
    Config(String),
}

impl SdfError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SdfError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type SdfResult<T> = Result<T, SdfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_code_in_hex() {
        let msg = SdfError::GlyphUnavailable { code: 0x41 }.to_string();
        assert!(msg.contains("0x41"), "{msg}");
    }
}
