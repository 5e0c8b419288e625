use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::atlas::Atlas;
use crate::core::error::{SdfError, SdfResult};

fn encode_err(e: png::EncodingError) -> SdfError {
    SdfError::Encode(e.to_string())
}

/// Writes the atlas as 8-bit RGBA, optionally tagged with a `Comment` text chunk.
pub fn write_png(path: &Path, atlas: &Atlas, comment: Option<&str>) -> SdfResult<()> {
    let file = File::create(path).map_err(|e| SdfError::io(path, e))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), atlas.size(), atlas.size());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    if let Some(text) = comment {
        encoder
            .add_text_chunk("Comment".to_string(), text.to_string())
            .map_err(encode_err)?;
    }
    let mut writer = encoder.write_header().map_err(encode_err)?;
    writer.write_image_data(atlas.rgba()).map_err(encode_err)?;
    writer.finish().map_err(encode_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_back_with_comment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        let mut atlas = Atlas::new(4);
        atlas.put(1, 2, 77);
        write_png(&path, &atlas, Some("Signed Distance Font: sdfont")).unwrap();

        let decoder = png::Decoder::new(File::open(&path).unwrap());
        let mut reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (4, 4));
        assert!(info
            .uncompressed_latin1_text
            .iter()
            .any(|t| t.keyword == "Comment" && t.text.starts_with("Signed Distance")));
        let mut buf = vec![0; reader.output_buffer_size()];
        reader.next_frame(&mut buf).unwrap();
        assert_eq!(buf, atlas.rgba());
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("a.png");
        let err = write_png(&path, &Atlas::new(2), None).unwrap_err();
        assert!(matches!(err, SdfError::Io { .. }));
    }
}
