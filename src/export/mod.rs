//! Artifact writers. Each artifact is attempted independently; a failed write
//! is reported and the remaining artifacts are still produced.

pub mod bmfont;
pub mod c_header;
pub mod json;
pub mod png_file;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

pub use bmfont::{format_metadata, parse_metadata, ParsedMetadata};
pub use c_header::format_c_header;

use crate::atlas::{relabel_ids, Atlas};
use crate::core::config::ExportConfig;
use crate::core::error::{SdfError, SdfResult};
use crate::core::logging::{timed, Telemetry};
use crate::glyph::CharMap;
use crate::pipeline::FontAtlas;

pub const FONT_PNG_COMMENT: &str = "Signed Distance Font: sdfont";
pub const IMAGE_PNG_COMMENT: &str = "Signed Distance Image: sdfont";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Png,
    Text,
    CHeader,
    Json,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Png => "png",
            ArtifactKind::Text => "txt",
            ArtifactKind::CHeader => "h",
            ArtifactKind::Json => "json",
        }
    }
}

#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<(ArtifactKind, PathBuf)>,
    pub failures: Vec<(ArtifactKind, SdfError)>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, kind: ArtifactKind, path: PathBuf, result: SdfResult<()>) {
        match result {
            Ok(()) => {
                info!(path = %path.display(), "wrote {}", kind.extension());
                self.written.push((kind, path));
            }
            Err(e) => {
                warn!(path = %path.display(), "failed to write {}: {e}", kind.extension());
                self.failures.push((kind, e));
            }
        }
    }
}

/// `<stem>_sdf.<ext>`, next to the stem.
pub fn artifact_path(stem: &Path, kind: ArtifactKind) -> PathBuf {
    let mut name: OsString = stem.as_os_str().to_owned();
    name.push("_sdf.");
    name.push(kind.extension());
    PathBuf::from(name)
}

fn write_text(path: &Path, text: &str) -> SdfResult<()> {
    fs::write(path, text).map_err(|e| SdfError::io(path, e))
}

fn png_comment(cfg: &ExportConfig, text: &'static str) -> Option<&'static str> {
    cfg.png_comment.then_some(text)
}

/// Writes the PNG, metadata text and, when enabled, the C header and JSON.
/// Glyph ids are relabeled through `map` on a copy; `font` is left as built.
pub fn export_font(
    font: &FontAtlas,
    map: Option<&CharMap>,
    stem: &Path,
    cfg: &ExportConfig,
    telemetry: &mut dyn Telemetry,
) -> ExportReport {
    let mut glyphs = font.glyphs.clone();
    let extents = relabel_ids(&mut glyphs, map);
    let mut report = ExportReport::default();

    let path = artifact_path(stem, ArtifactKind::Png);
    let res = timed(telemetry, "png", || {
        png_file::write_png(&path, &font.atlas, png_comment(cfg, FONT_PNG_COMMENT))
    });
    report.record(ArtifactKind::Png, path, res);

    let path = artifact_path(stem, ArtifactKind::Text);
    let res = timed(telemetry, "txt", || {
        let text = format_metadata(&font.face_name, font.pixel_size, extents, &glyphs);
        write_text(&path, &text)
    });
    report.record(ArtifactKind::Text, path, res);

    if cfg.c_header {
        let path = artifact_path(stem, ArtifactKind::CHeader);
        let res = timed(telemetry, "c header", || {
            let scale = cfg.header_scale_factor;
            let text = format_c_header(&font.face_name, &font.atlas, &glyphs, scale);
            write_text(&path, &text)
        });
        report.record(ArtifactKind::CHeader, path, res);
    }

    if cfg.json {
        let path = artifact_path(stem, ArtifactKind::Json);
        let res = timed(telemetry, "json", || {
            let root = json::manifest(font, &glyphs);
            let text = serde_json::to_string_pretty(&root)
                .map_err(|e| SdfError::Encode(e.to_string()))?;
            write_text(&path, &text)
        });
        report.record(ArtifactKind::Json, path, res);
    }
    report
}

/// Image mode writes the PNG only.
pub fn export_image(
    atlas: &Atlas,
    stem: &Path,
    cfg: &ExportConfig,
    telemetry: &mut dyn Telemetry,
) -> ExportReport {
    let mut report = ExportReport::default();
    let path = artifact_path(stem, ArtifactKind::Png);
    let res = timed(telemetry, "png", || {
        png_file::write_png(&path, atlas, png_comment(cfg, IMAGE_PNG_COMMENT))
    });
    report.record(ArtifactKind::Png, path, res);
    report
}
