//! Bitmap-font style metadata text, one `char` line per glyph.
//!
//! Column layout is fixed (left-aligned, no separators between some fields)
//! because existing loaders read it byte for byte.

use std::fmt::Write as _;

use crate::atlas::{FontExtents, GlyphMetrics};
use crate::core::error::{SdfError, SdfResult};

pub fn format_metadata(
    face_name: &str,
    pixel_size: u32,
    extents: FontExtents,
    glyphs: &[GlyphMetrics],
) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = writeln!(out, "info face=\"{face_name}\"");
    let _ = writeln!(out, "size={pixel_size}");
    let _ = writeln!(out, "ascent={:2.0}", extents.ascent);
    let _ = writeln!(out, "descent={:2.0}", extents.descent);
    let _ = writeln!(out, "chars count={}", glyphs.len());
    for g in glyphs {
        let _ = writeln!(
            out,
            "char id={:<6}x={:<6}y={:<6}width={:<6}height={:<6}xoffset={:<10.3}yoffset={:<10.3}xadvance={:<10.3}  page=0  chnl=0",
            g.id, g.x, g.y, g.width, g.height, g.x_offset, g.y_offset, g.x_advance
        );
    }
    out
}

/// Contents of a metadata file read back.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMetadata {
    pub face: String,
    pub size: u32,
    pub ascent: f32,
    pub descent: f32,
    pub count: usize,
    pub glyphs: Vec<GlyphMetrics>,
}

/// Splits `key=value` pairs. Values are quoted strings or a run of number
/// characters, so fields padded without a separator still split cleanly.
fn pairs(line: &str) -> Vec<(&str, &str)> {
    let mut out = Vec::new();
    let mut rest = line;
    while let Some(eq) = rest.find('=') {
        let key_start = rest[..eq]
            .rfind(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .map_or(0, |i| i + 1);
        let key = &rest[key_start..eq];
        let after = &rest[eq + 1..];
        let (value, tail) = if let Some(q) = after.strip_prefix('"') {
            match q.find('"') {
                Some(end) => (&q[..end], &q[end + 1..]),
                None => (q, ""),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_digit() || matches!(c, '-' | '+' | '.')))
                .unwrap_or(after.len());
            (&after[..end], &after[end..])
        };
        out.push((key, value));
        rest = tail;
    }
    out
}

fn number<T: std::str::FromStr>(line: usize, key: &str, value: &str) -> SdfResult<T> {
    value.trim().parse().map_err(|_| SdfError::Metadata {
        line,
        reason: format!("bad value {value:?} for {key}"),
    })
}

pub fn parse_metadata(text: &str) -> SdfResult<ParsedMetadata> {
    let mut meta = ParsedMetadata {
        face: String::new(),
        size: 0,
        ascent: 0.0,
        descent: 0.0,
        count: 0,
        glyphs: Vec::new(),
    };
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end();
        if line.is_empty() {
            continue;
        }
        let kv = pairs(line);
        if line.starts_with("char ") {
            let mut g = GlyphMetrics {
                id: 0,
                width: 0,
                height: 0,
                x: 0,
                y: 0,
                x_offset: 0.0,
                y_offset: 0.0,
                x_advance: 0.0,
            };
            let mut seen = 0u8;
            for (k, v) in kv {
                match k {
                    "id" => g.id = number(line_no, k, v)?,
                    "x" => g.x = number(line_no, k, v)?,
                    "y" => g.y = number(line_no, k, v)?,
                    "width" => g.width = number(line_no, k, v)?,
                    "height" => g.height = number(line_no, k, v)?,
                    "xoffset" => g.x_offset = number(line_no, k, v)?,
                    "yoffset" => g.y_offset = number(line_no, k, v)?,
                    "xadvance" => g.x_advance = number(line_no, k, v)?,
                    _ => continue,
                }
                seen += 1;
            }
            if seen < 8 {
                return Err(SdfError::Metadata {
                    line: line_no,
                    reason: "char line is missing fields".into(),
                });
            }
            meta.glyphs.push(g);
            continue;
        }
        for (k, v) in kv {
            match k {
                "face" => meta.face = v.to_string(),
                "size" => meta.size = number(line_no, k, v)?,
                "ascent" => meta.ascent = number(line_no, k, v)?,
                "descent" => meta.descent = number(line_no, k, v)?,
                "count" => meta.count = number(line_no, k, v)?,
                _ => {}
            }
        }
    }
    if meta.count != meta.glyphs.len() {
        return Err(SdfError::Metadata {
            line: 0,
            reason: format!(
                "chars count={} but {} char lines",
                meta.count,
                meta.glyphs.len()
            ),
        });
    }
    Ok(meta)
}
