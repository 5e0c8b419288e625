use std::fmt::Write as _;

use crate::atlas::{Atlas, GlyphMetrics};

/// C source header with the spacing table and the raw single-channel field.
/// Offsets and advance are stored as `(int)(value * scale_factor)`.
pub fn format_c_header(
    face_name: &str,
    atlas: &Atlas,
    glyphs: &[GlyphMetrics],
    scale_factor: f32,
) -> String {
    let mut o = String::new();
    o.push_str("/*\n    sdfont\n    Signed Distance Font Tool\n\n    C header\n");
    let _ = write!(o, "    font: \"{face_name}\"\n*/\n\n");
    o.push_str("#ifndef HEADER_SIGNED_DISTANCE_FONT_XXX\n");
    o.push_str("#define HEADER_SIGNED_DISTANCE_FONT_XXX\n\n");
    o.push_str("/* array size information */\n");
    let _ = writeln!(o, "const int sdf_tex_width = {};", atlas.size());
    let _ = writeln!(o, "const int sdf_tex_height = {};", atlas.size());
    let _ = writeln!(o, "const int sdf_num_chars = {};", glyphs.len());
    o.push_str("/* 'unsigned char sdf_data[]' is defined last */\n\n");

    o.push_str(concat!(
        "/*\n",
        "    The following array holds the spacing info for rendering.\n",
        "    Note that the final 3 values need sub-pixel accuracy, so\n",
        "    they are multiplied by a scaling factor.  Make sure to\n",
        "    divide by scale_factor before using the 'offset' and\n",
        "    'advance' values.\n",
        "\n",
        "    Here is the data order in the following array:\n",
        "    [0] Unicode character ID\n",
        "    [1] X position in this texture\n",
        "    [2] Y position in this texture\n",
        "    [3] Width of this glyph in the texture\n",
        "    [4] Height of this glyph in the texture\n",
        "    [5] X Offset * scale_factor  | Draw the glyph at X,Y offset\n",
        "    [6] Y Offset * scale_factor  | relative to the cursor, then\n",
        "    [7] X Advance * scale_factor | advance the cursor by this.\n",
        "*/\n",
    ));
    let _ = writeln!(o, "const float scale_factor = {scale_factor:.6};");
    o.push_str("const int sdf_spacing[] = {\n");
    for g in glyphs {
        let _ = writeln!(
            o,
            "  {},{},{},{},{},{},{},{},",
            g.id,
            g.x,
            g.y,
            g.width,
            g.height,
            (scale_factor * g.x_offset) as i32,
            (scale_factor * g.y_offset) as i32,
            (scale_factor * g.x_advance) as i32
        );
    }
    o.push_str("  0\n};\n\n");

    o.push_str("/* Signed Distance Field: edges are at 127.5 */\n");
    o.push_str("const unsigned char sdf_data[] = {");
    // column counter; starts high so the first value opens a line
    let mut nchars = usize::MAX;
    for v in atlas.single_channel() {
        if nchars > 70 {
            o.push_str("\n  ");
            nchars = 2;
        }
        let _ = write!(o, "{v},");
        nchars += 1 + if v > 99 { 3 } else if v > 9 { 2 } else { 1 };
    }
    o.push_str("\n  255\n};\n\n");
    o.push_str("#endif /* HEADER_SIGNED_DISTANCE_FONT_XXX */\n");
    o
}
