use super::GlyphMetrics;
use crate::core::error::{SdfError, SdfResult};
use crate::sdf::GlyphField;

/// Square RGBA8 texture holding one logical channel replicated four times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atlas {
    size: u32,
    data: Vec<u8>,
}

impl Atlas {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            data: vec![0; 4 * size as usize * size as usize],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn put(&mut self, x: u32, y: u32, value: u8) {
        let idx = 4 * (y as usize * self.size as usize + x as usize);
        self.data[idx..idx + 4].fill(value);
    }

    #[inline]
    pub fn value(&self, x: u32, y: u32) -> u8 {
        self.data[4 * (y as usize * self.size as usize + x as usize)]
    }

    pub fn rgba(&self) -> &[u8] {
        &self.data
    }

    /// The logical channel, one byte per pixel.
    pub fn single_channel(&self) -> impl Iterator<Item = u8> + '_ {
        self.data.iter().step_by(4).copied()
    }
}

/// Writes synthesized glyphs into their packed slots, refusing anything that
/// leaves the page or lands on an occupied slot.
#[derive(Debug)]
pub struct AtlasComposer {
    atlas: Atlas,
    placed: Vec<GlyphMetrics>,
}

impl AtlasComposer {
    pub fn new(size: u32) -> Self {
        Self {
            atlas: Atlas::new(size),
            placed: Vec::new(),
        }
    }

    pub fn place(&mut self, slot: &GlyphMetrics, field: &GlyphField) -> SdfResult<()> {
        let violation = |reason: String| SdfError::LayoutViolation {
            id: slot.id,
            reason,
        };
        if (field.width, field.height) != (slot.width, slot.height) {
            return Err(violation(format!(
                "field is {}x{} but slot is {}x{}",
                field.width, field.height, slot.width, slot.height
            )));
        }
        let size = self.atlas.size() as u64;
        if slot.x as u64 + slot.width as u64 > size || slot.y as u64 + slot.height as u64 > size {
            return Err(violation(format!(
                "slot {}x{} at ({}, {}) leaves the {size}px page",
                slot.width, slot.height, slot.x, slot.y
            )));
        }
        if let Some(other) = self.placed.iter().find(|p| p.overlaps(slot)) {
            return Err(violation(format!("slot overlaps glyph 0x{:x}", other.id)));
        }
        for j in 0..slot.height {
            for i in 0..slot.width {
                self.atlas.put(slot.x + i, slot.y + j, field.get(i, j));
            }
        }
        self.placed.push(slot.clone());
        Ok(())
    }

    pub fn placed(&self) -> &[GlyphMetrics] {
        &self.placed
    }

    pub fn finish(self) -> Atlas {
        self.atlas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: u32, x: u32, y: u32, w: u32, h: u32) -> GlyphMetrics {
        GlyphMetrics {
            id,
            width: w,
            height: h,
            x,
            y,
            x_offset: 0.0,
            y_offset: 0.0,
            x_advance: 0.0,
        }
    }

    fn field(w: u32, h: u32, v: u8) -> GlyphField {
        GlyphField {
            width: w,
            height: h,
            bytes: vec![v; (w * h) as usize],
        }
    }

    #[test]
    fn writes_replicated_channels() {
        let mut c = AtlasComposer::new(8);
        c.place(&slot(1, 2, 3, 2, 2), &field(2, 2, 200)).unwrap();
        let atlas = c.finish();
        assert_eq!(atlas.value(2, 3), 200);
        assert_eq!(atlas.value(3, 4), 200);
        assert_eq!(atlas.value(1, 3), 0);
        let idx = 4 * (3 * 8 + 2);
        assert_eq!(&atlas.rgba()[idx..idx + 4], &[200, 200, 200, 200]);
        assert_eq!(atlas.single_channel().count(), 64);
    }

    #[test]
    fn overlap_is_fatal() {
        let mut c = AtlasComposer::new(8);
        c.place(&slot(1, 0, 0, 4, 4), &field(4, 4, 1)).unwrap();
        let err = c.place(&slot(2, 3, 3, 4, 4), &field(4, 4, 2)).unwrap_err();
        assert!(matches!(err, SdfError::LayoutViolation { id: 2, .. }));
    }

    #[test]
    fn out_of_page_is_fatal() {
        let mut c = AtlasComposer::new(8);
        let err = c.place(&slot(1, 6, 0, 4, 4), &field(4, 4, 1)).unwrap_err();
        assert!(matches!(err, SdfError::LayoutViolation { .. }));
    }

    #[test]
    fn size_mismatch_is_fatal() {
        let mut c = AtlasComposer::new(8);
        assert!(c.place(&slot(1, 0, 0, 4, 4), &field(3, 4, 1)).is_err());
        assert!(c.placed().is_empty());
    }
}
