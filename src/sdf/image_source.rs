//! Distance fields straight from a raster image (no packing, one shape per texture).

use std::path::Path;

use tracing::{debug, info};

use super::DistanceGrid;
use crate::atlas::Atlas;
use crate::core::error::{SdfError, SdfResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageSdfOptions {
    /// Channel holding the shape; clamped to the image's channel count.
    pub channel: Option<u32>,
    /// Values below become background. Midpoint of the value range when unset.
    pub threshold: Option<u8>,
}

/// Single channel of a decoded image, binarized to 0 / 255.
#[derive(Debug, Clone)]
pub struct BilevelImage {
    pub grid: DistanceGrid,
    pub channel: u32,
    pub channels: u32,
    /// Threshold applied, `None` when the channel was already two-valued.
    pub threshold: Option<u8>,
}

pub fn load_bilevel_image(path: &Path, opts: ImageSdfOptions) -> SdfResult<BilevelImage> {
    let img = image::open(path).map_err(|e| SdfError::ImageDecode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let (w, h) = (img.width() as usize, img.height() as usize);
    let channels = img.color().channel_count().clamp(1, 4) as usize;
    let raw = match channels {
        1 => img.to_luma8().into_raw(),
        2 => img.to_luma_alpha8().into_raw(),
        3 => img.to_rgb8().into_raw(),
        _ => img.to_rgba8().into_raw(),
    };
    let channel = opts.channel.unwrap_or(0).min(channels as u32 - 1);
    info!(
        "loaded {}, {w} x {h}, {channels} channel(s), using channel {channel}",
        path.display()
    );
    let data: Vec<u8> = raw
        .iter()
        .skip(channel as usize)
        .step_by(channels)
        .copied()
        .collect();
    let (data, threshold) = binarize(data, opts.threshold);
    Ok(BilevelImage {
        grid: DistanceGrid::from_data(w, h, data),
        channel,
        channels: channels as u32,
        threshold,
    })
}

/// Thresholds the channel when it holds more than two distinct values.
pub fn binarize(mut data: Vec<u8>, requested: Option<u8>) -> (Vec<u8>, Option<u8>) {
    let mut seen = [false; 256];
    for &v in &data {
        seen[v as usize] = true;
    }
    if seen.iter().filter(|&&s| s).count() <= 2 {
        return (data, None);
    }
    let vmin = data.iter().copied().min().unwrap_or(0);
    let vmax = data.iter().copied().max().unwrap_or(255);
    let midpoint = ((vmin as u16 + vmax as u16 + 1) / 2) as u8;
    let thresh = requested.unwrap_or(midpoint).clamp(vmin.saturating_add(1), vmax);
    debug!(vmin, vmax, thresh, "thresholding image channel");
    for v in &mut data {
        *v = if *v < thresh { 0 } else { 255 };
    }
    (data, Some(thresh))
}

/// Samples the whole image onto a `texture_size` square. The source must be
/// larger than the texture along at least one axis.
pub fn render_image_sdf(grid: &DistanceGrid, texture_size: u32) -> SdfResult<Atlas> {
    if texture_size < 2 {
        return Err(SdfError::TextureTooSmall { texture_size });
    }
    let (w, h) = (grid.width, grid.height);
    let s = texture_size as usize;
    if w <= s && h <= s {
        return Err(SdfError::ImageTooSmall {
            width: w as u32,
            height: h as u32,
            texture_size,
        });
    }
    let radius = 2 * w.max(h) / s;
    debug!(radius, "image search radius");
    let mut atlas = Atlas::new(texture_size);
    for j in 0..s {
        let sy = j * (h - 1) / (s - 1);
        for i in 0..s {
            let sx = i * (w - 1) / (s - 1);
            atlas.put(i as u32, j as u32, grid.distance_byte(sx, sy, radius));
        }
    }
    Ok(atlas)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_valued_channel_is_left_alone() {
        let (data, t) = binarize(vec![0, 7, 7, 0], Some(3));
        assert_eq!(data, vec![0, 7, 7, 0]);
        assert_eq!(t, None);
    }

    #[test]
    fn grey_channel_uses_midpoint() {
        let (data, t) = binarize(vec![10, 100, 200, 50], None);
        assert_eq!(t, Some(105));
        assert_eq!(data, vec![0, 0, 255, 0]);
    }

    #[test]
    fn threshold_clamped_into_range() {
        let (_, t) = binarize(vec![10, 100, 200], Some(0));
        assert_eq!(t, Some(11));
        let (_, t) = binarize(vec![10, 100, 200], Some(250));
        assert_eq!(t, Some(200));
    }

    #[test]
    fn small_image_rejected() {
        let grid = DistanceGrid::new(64, 64);
        let err = render_image_sdf(&grid, 64).unwrap_err();
        assert!(matches!(err, SdfError::ImageTooSmall { .. }));
    }

    #[test]
    fn degenerate_texture_rejected() {
        let grid = DistanceGrid::new(16, 16);
        for size in [0, 1] {
            let err = render_image_sdf(&grid, size).unwrap_err();
            assert!(matches!(err, SdfError::TextureTooSmall { .. }), "{err}");
        }
    }

    #[test]
    fn half_filled_image_splits_around_boundary() {
        let (w, h) = (256usize, 128usize);
        let data = (0..w * h)
            .map(|i| if i % w >= w / 2 { 255 } else { 0 })
            .collect();
        let grid = DistanceGrid::from_data(w, h, data);
        let atlas = render_image_sdf(&grid, 64).unwrap();
        assert_eq!(atlas.value(0, 10), 0);
        assert_eq!(atlas.value(63, 10), 255);
        let row: Vec<u8> = (0..64).map(|x| atlas.value(x, 10)).collect();
        assert!(row.windows(2).all(|p| p[0] <= p[1]), "{row:?}");
    }
}
