//! Finds the largest pixel size at which the whole glyph set fits one page.
//!
//! Three phases: doubling from the seed until an attempt fails, bisection of
//! the bracket, then a linear walk down if bisection stopped on a failure.

use tracing::{debug, info};

use super::{GlyphMetrics, RectanglePacker};
use crate::core::config::{SamplingConfig, SearchConfig};
use crate::core::error::{SdfError, SdfResult};
use crate::glyph::{GlyphSource, RenderRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    ProbeDoubling,
    BracketFound,
    Bisecting,
    LinearFallback,
    DoneSuccess,
    DoneFailure,
}

/// One trial layout at a candidate pixel size.
#[derive(Debug, Clone)]
pub struct PackAttempt {
    pub pixel_size: u32,
    pub fitted: bool,
    /// Positioned only when `fitted`.
    pub glyphs: Vec<GlyphMetrics>,
    pub unavailable: Vec<u32>,
}

impl PackAttempt {
    fn overflow(pixel_size: u32) -> Self {
        Self {
            pixel_size,
            fitted: false,
            glyphs: Vec::new(),
            unavailable: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub pixel_size: u32,
    pub glyphs: Vec<GlyphMetrics>,
    /// Requested codes the source could not produce.
    pub unavailable: Vec<u32>,
    /// Every attempted size in order, with its result.
    pub trail: Vec<(u32, bool)>,
}

pub struct SizeSearch<'a> {
    pub sampling: &'a SamplingConfig,
    pub search: &'a SearchConfig,
    pub texture_size: u32,
}

impl<'a> SizeSearch<'a> {
    pub fn new(sampling: &'a SamplingConfig, search: &'a SearchConfig, texture_size: u32) -> Self {
        Self {
            sampling,
            search,
            texture_size,
        }
    }

    fn max_pixel_size(&self) -> u32 {
        self.search.max_pixel_size.unwrap_or(self.texture_size)
    }

    /// Measures every requested glyph at `pixel_size` and asks the packer for a
    /// layout. A layout that does not fit, or a size above the cap, is
    /// `PackingOverflow`; the returned attempt is always `fitted`.
    pub fn attempt(
        &self,
        source: &mut dyn GlyphSource,
        request: &RenderRequest,
        packer: &mut dyn RectanglePacker,
        pixel_size: u32,
    ) -> SdfResult<PackAttempt> {
        if pixel_size > self.max_pixel_size() {
            debug!(pixel_size, "above the pixel size cap, counted as a failed attempt");
            return Err(SdfError::PackingOverflow { pixel_size });
        }
        let render_px = pixel_size.saturating_mul(self.sampling.supersample);
        let mut glyphs = Vec::with_capacity(request.len());
        let mut unavailable = Vec::new();
        for &code in request.codes() {
            match source.measure(code, render_px) {
                Ok(m) => glyphs.push(GlyphMetrics::from_measure(code, &m, self.sampling)),
                Err(SdfError::GlyphUnavailable { code }) => unavailable.push(code),
                Err(e) => return Err(e),
            }
        }
        if glyphs.is_empty() {
            return Err(SdfError::EmptyGlyphSet);
        }
        let sizes: Vec<(u32, u32)> = glyphs.iter().map(|g| (g.width, g.height)).collect();
        let Some(positions) = packer.pack(&sizes, self.texture_size) else {
            debug!(pixel_size, glyphs = glyphs.len(), "pack attempt overflowed");
            return Err(SdfError::PackingOverflow { pixel_size });
        };
        for (g, (x, y)) in glyphs.iter_mut().zip(positions) {
            g.x = x;
            g.y = y;
        }
        debug!(pixel_size, glyphs = glyphs.len(), "pack attempt fitted");
        Ok(PackAttempt {
            pixel_size,
            fitted: true,
            glyphs,
            unavailable,
        })
    }

    pub fn run(
        &self,
        source: &mut dyn GlyphSource,
        request: &RenderRequest,
        packer: &mut dyn RectanglePacker,
    ) -> SdfResult<SearchOutcome> {
        let mut trail = Vec::new();
        let mut phase = SearchPhase::ProbeDoubling;
        let mut sz = self.search.seed_pixel_size.max(1);
        let mut try_size = |sz: u32, phase: SearchPhase, trail: &mut Vec<(u32, bool)>| {
            let a = match self.attempt(source, request, packer, sz) {
                Ok(a) => a,
                Err(SdfError::PackingOverflow { pixel_size }) => PackAttempt::overflow(pixel_size),
                Err(e) => return Err(e),
            };
            debug!(?phase, pixel_size = sz, fitted = a.fitted);
            trail.push((sz, a.fitted));
            Ok::<_, SdfError>(a)
        };

        let mut last = loop {
            sz = sz.saturating_mul(2);
            let a = try_size(sz, phase, &mut trail)?;
            if !a.fitted {
                break a;
            }
        };

        phase = SearchPhase::BracketFound;
        debug!(?phase, first_failure = sz);
        phase = SearchPhase::Bisecting;
        let mut step = sz >> 2;
        while step > 0 {
            if last.fitted {
                sz += step;
            } else {
                sz -= step;
            }
            step >>= 1;
            last = try_size(sz, phase, &mut trail)?;
        }

        if !last.fitted {
            phase = SearchPhase::LinearFallback;
            while !last.fitted && sz > 1 {
                sz -= 1;
                last = try_size(sz, phase, &mut trail)?;
            }
        }

        if !last.fitted {
            phase = SearchPhase::DoneFailure;
            info!(?phase, "glyphs do not fit a {0}^2 texture", self.texture_size);
            return Err(SdfError::AtlasInfeasible {
                texture_size: self.texture_size,
            });
        }
        phase = SearchPhase::DoneSuccess;
        info!(?phase, "result = {sz} pixels after {} attempts", trail.len());
        Ok(SearchOutcome {
            pixel_size: sz,
            glyphs: last.glyphs,
            unavailable: last.unavailable,
            trail,
        })
    }
}
