mod common;

use std::fs;

use common::{AreaOracle, BoxFont};
use sdfont::atlas::FontExtents;
use sdfont::core::logging::RecordingTelemetry;
use sdfont::export::{self, artifact_path, format_metadata, parse_metadata, ArtifactKind};
use sdfont::glyph::RenderRequest;
use sdfont::{build_font_atlas, render_font, FontAtlas, SdfConfig, SdfError, SizeSearch};
use sdfont::{SdfResult, SkylinePacker};

fn request() -> RenderRequest {
    RenderRequest::from((65..75).collect::<Vec<u32>>())
}

fn build(font: &mut BoxFont, req: &RenderRequest, page: u32) -> SdfResult<FontAtlas> {
    build_font_atlas(font, req, &mut SkylinePacker, &SdfConfig::default(), page)
}

#[test]
fn repeated_runs_are_byte_identical() {
    let a = build(&mut BoxFont::new(), &request(), 128).unwrap();
    let b = build(&mut BoxFont::new(), &request(), 128).unwrap();
    assert_eq!(a.atlas, b.atlas);
    assert_eq!(a.glyphs, b.glyphs);
    let ta = format_metadata(&a.face_name, a.pixel_size, FontExtents::default(), &a.glyphs);
    let tb = format_metadata(&b.face_name, b.pixel_size, FontExtents::default(), &b.glyphs);
    assert_eq!(ta, tb);
}

#[test]
fn larger_page_never_lowers_pixel_size() {
    let cfg = SdfConfig::default();
    let mut last = 0;
    for page in [64, 96, 128, 256, 512] {
        let outcome = SizeSearch::new(&cfg.sampling, &cfg.search, page)
            .run(&mut BoxFont::new(), &request(), &mut AreaOracle)
            .unwrap();
        let got = outcome.pixel_size;
        assert!(got >= last, "page {page}: {got} < {last}");
        last = outcome.pixel_size;
    }
}

#[test]
fn packed_slots_are_disjoint_and_on_page() {
    let font = build(&mut BoxFont::new(), &request(), 128).unwrap();
    let mut area = 0u64;
    for (i, a) in font.glyphs.iter().enumerate() {
        assert!(a.x + a.width <= 128 && a.y + a.height <= 128, "{a:?}");
        area += a.width as u64 * a.height as u64;
        for b in &font.glyphs[i + 1..] {
            assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
        }
    }
    assert!(area <= 128 * 128);
}

#[test]
fn tiny_page_is_infeasible_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let stem = dir.path().join("box");
    let cfg = SdfConfig {
        max_char: 80,
        ..SdfConfig::default()
    };
    let mut telemetry = RecordingTelemetry::default();
    let err = render_font(
        &mut BoxFont::new(),
        None,
        &mut SkylinePacker,
        &cfg,
        8,
        &stem,
        &mut telemetry,
    )
    .unwrap_err();
    assert!(matches!(err, SdfError::AtlasInfeasible { texture_size: 8 }), "{err}");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    assert!(!artifact_path(&stem, ArtifactKind::Png).exists());
    assert!(telemetry.samples.iter().all(|(label, _)| label == "font atlas"));
}

#[test]
fn feasible_page_writes_through_the_same_entry_point() {
    let dir = tempfile::tempdir().unwrap();
    let stem = dir.path().join("box");
    let cfg = SdfConfig {
        max_char: 70,
        ..SdfConfig::default()
    };
    let mut telemetry = RecordingTelemetry::default();
    let report = render_font(
        &mut BoxFont::without(&(0..65).collect::<Vec<_>>()),
        None,
        &mut SkylinePacker,
        &cfg,
        128,
        &stem,
        &mut telemetry,
    )
    .unwrap();
    assert!(report.is_complete());
    assert!(artifact_path(&stem, ArtifactKind::Png).exists());
    assert!(artifact_path(&stem, ArtifactKind::Text).exists());
}

#[test]
fn unavailable_codes_are_skipped() {
    let req = request();
    let font = build(&mut BoxFont::without(&[66, 70, 9999]), &req, 128).unwrap();
    assert_eq!(font.unavailable, vec![66, 70]);
    assert_eq!(font.glyphs.len(), req.len() - 2);
    assert!(font.glyphs.iter().all(|g| g.id != 66 && g.id != 70));
}

#[test]
fn nothing_available_is_an_empty_set() {
    let req = RenderRequest::from(vec![1, 2]);
    let err = build(&mut BoxFont::without(&[1, 2]), &req, 128).unwrap_err();
    assert!(matches!(err, SdfError::EmptyGlyphSet));
}

#[test]
fn exported_metadata_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let stem = dir.path().join("box");
    let cfg = SdfConfig::default();
    let font = build(&mut BoxFont::new(), &request(), 128).unwrap();
    let mut telemetry = RecordingTelemetry::default();
    let report = export::export_font(&font, None, &stem, &cfg.export, &mut telemetry);
    assert!(report.is_complete());
    assert!(artifact_path(&stem, ArtifactKind::Png).exists());

    let text = fs::read_to_string(artifact_path(&stem, ArtifactKind::Text)).unwrap();
    let parsed = parse_metadata(&text).unwrap();
    assert_eq!(parsed.face, "Box Sans");
    assert_eq!(parsed.size, font.pixel_size);
    assert_eq!(parsed.glyphs.len(), font.glyphs.len());
    for (p, g) in parsed.glyphs.iter().zip(&font.glyphs) {
        assert_eq!(
            (p.id, p.x, p.y, p.width, p.height),
            (g.id, g.x, g.y, g.width, g.height)
        );
        assert!((p.x_offset - g.x_offset).abs() <= 1e-3);
        assert!((p.y_offset - g.y_offset).abs() <= 1e-3);
        assert!((p.x_advance - g.x_advance).abs() <= 1e-3);
    }
}
