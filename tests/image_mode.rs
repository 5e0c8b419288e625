use std::fs::File;

use image::{GrayImage, Luma, Rgb, RgbImage};
use sdfont::core::config::ExportConfig;
use sdfont::core::logging::RecordingTelemetry;
use sdfont::export::{artifact_path, export_image, ArtifactKind, IMAGE_PNG_COMMENT};
use sdfont::sdf::image_source::load_bilevel_image;
use sdfont::sdf::{render_image_sdf, ImageSdfOptions};
use sdfont::SdfError;

fn disc(size: u32) -> GrayImage {
    let c = size as f32 / 2.0;
    GrayImage::from_fn(size, size, |x, y| {
        let (dx, dy) = (x as f32 - c, y as f32 - c);
        Luma([if dx * dx + dy * dy < (c * 0.6).powi(2) { 255 } else { 0 }])
    })
}

#[test]
fn disc_image_becomes_a_centered_field() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("disc.png");
    disc(256).save(&input).unwrap();

    let img = load_bilevel_image(&input, ImageSdfOptions::default()).unwrap();
    assert_eq!(img.channels, 1);
    assert_eq!(img.threshold, None);
    let atlas = render_image_sdf(&img.grid, 64).unwrap();
    assert_eq!(atlas.value(32, 32), 255);
    assert_eq!(atlas.value(0, 0), 0);
    let row: Vec<u8> = (0..32).map(|x| atlas.value(x, 32)).collect();
    assert!(row.windows(2).all(|p| p[0] <= p[1]), "{row:?}");

    let mut telemetry = RecordingTelemetry::default();
    let report = export_image(&atlas, &input, &ExportConfig::default(), &mut telemetry);
    assert!(report.is_complete());
    let out = artifact_path(&input, ArtifactKind::Png);
    let reader = png::Decoder::new(File::open(&out).unwrap()).read_info().unwrap();
    assert_eq!(reader.info().width, 64);
    assert!(reader
        .info()
        .uncompressed_latin1_text
        .iter()
        .any(|t| t.text == IMAGE_PNG_COMMENT));
}

#[test]
fn requested_channel_is_thresholded() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ramp.png");
    // the shape lives in green as a ramp
    RgbImage::from_fn(200, 100, |x, _| Rgb([0, (x * 255 / 199) as u8, 0]))
        .save(&input)
        .unwrap();
    let opts = ImageSdfOptions {
        channel: Some(1),
        threshold: None,
    };
    let img = load_bilevel_image(&input, opts).unwrap();
    assert_eq!(img.channel, 1);
    assert_eq!(img.threshold, Some(128));
    assert!(img.grid.data.iter().all(|&v| v == 0 || v == 255));

    let opts = ImageSdfOptions {
        channel: Some(9),
        threshold: None,
    };
    let clamped = load_bilevel_image(&input, opts).unwrap();
    assert_eq!(clamped.channel, 2);
}

#[test]
fn bmp_input_decodes_like_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("shape.bmp");
    disc(96).save(&input).unwrap();
    let img = load_bilevel_image(&input, ImageSdfOptions::default()).unwrap();
    assert_eq!((img.grid.width, img.grid.height), (96, 96));
    assert!(img.grid.data.iter().any(|&v| v == 255));
    let atlas = render_image_sdf(&img.grid, 32).unwrap();
    assert_eq!(atlas.size(), 32);
}

#[test]
fn not_an_image_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("font.ttf");
    std::fs::write(&input, b"\0\x01\0\0 definitely not a picture").unwrap();
    let err = load_bilevel_image(&input, ImageSdfOptions::default()).unwrap_err();
    assert!(matches!(err, SdfError::ImageDecode { .. }), "{err}");
}
