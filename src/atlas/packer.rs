use rect_packer::{Config, Packer};

/// Single-page packing oracle.
pub trait RectanglePacker {
    /// Positions for every `(width, height)` in input order, or `None` if
    /// they do not all fit on one `page_size` square. Rotation is never used.
    fn pack(&mut self, sizes: &[(u32, u32)], page_size: u32) -> Option<Vec<(u32, u32)>>;
}

/// Skyline packer from `rect_packer`, fed tallest-first.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkylinePacker;

impl RectanglePacker for SkylinePacker {
    fn pack(&mut self, sizes: &[(u32, u32)], page_size: u32) -> Option<Vec<(u32, u32)>> {
        let side = i32::try_from(page_size).ok()?;
        let mut packer = Packer::new(Config {
            width: side,
            height: side,
            border_padding: 0,
            rectangle_padding: 0,
        });
        let mut order: Vec<usize> = (0..sizes.len()).collect();
        order.sort_by(|&a, &b| {
            let (wa, ha) = sizes[a];
            let (wb, hb) = sizes[b];
            hb.cmp(&ha).then(wb.cmp(&wa)).then(a.cmp(&b))
        });
        let mut placed = vec![(0u32, 0u32); sizes.len()];
        for idx in order {
            let (w, h) = sizes[idx];
            if w == 0 || h == 0 {
                continue;
            }
            if w > page_size || h > page_size {
                return None;
            }
            let rect = packer.pack(w as i32, h as i32, false)?;
            placed[idx] = (rect.x as u32, rect.y as u32);
        }
        Some(placed)
    }
}
