//! Turns stamp requests into pixels on a [`Surface`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stroke_core::{BrushSettings, MarkSink, MarkStrategy, StampRequest};

use crate::Surface;

/// Paints brush marks onto an owned surface.
///
/// The random source drives jitter. Seed it for reproducible strokes.
#[derive(Debug, Clone)]
pub struct MarkRenderer<R = StdRng> {
    surface: Surface,
    rng: R,
}

impl MarkRenderer<StdRng> {
    /// Create a renderer with an entropy-seeded jitter source.
    #[must_use]
    pub fn new(surface: Surface) -> Self {
        Self::with_rng(surface, StdRng::from_entropy())
    }

    /// Create a renderer whose jitter is reproducible from `seed`.
    #[must_use]
    pub fn seeded(surface: Surface, seed: u64) -> Self {
        Self::with_rng(surface, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> MarkRenderer<R> {
    /// Create a renderer with an explicit random source.
    #[must_use]
    pub fn with_rng(surface: Surface, rng: R) -> Self {
        Self { surface, rng }
    }

    /// The target surface.
    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Mutable access to the target surface.
    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Consume the renderer, returning its surface.
    #[must_use]
    pub fn into_surface(self) -> Surface {
        self.surface
    }

    /// Apply one stamp using the tool's strategy.
    pub fn stamp(&mut self, stamp: &StampRequest, settings: &BrushSettings) {
        match settings.tool.strategy() {
            MarkStrategy::Disc { erase } => self.stamp_disc(stamp, settings, erase),
            MarkStrategy::Cell => self.stamp_cell(stamp, settings),
            MarkStrategy::Flood => self.stamp_flood(stamp, settings),
        }
    }

    fn stamp_disc(&mut self, stamp: &StampRequest, settings: &BrushSettings, erase: bool) {
        let color = if erase {
            self.surface.background()
        } else {
            settings.color
        };
        let radius = settings.radius(stamp.pressure);

        let (mut x, mut y) = (stamp.x, stamp.y);
        if settings.jitter > 0.0 {
            let spread = settings.jitter * settings.size * 2.0;
            x += self.rng.gen_range(-0.5f32..=0.5) * spread;
            y += self.rng.gen_range(-0.5f32..=0.5) * spread;
        }

        if settings.hardness < 1.0 {
            self.surface.fill_radial(
                x,
                y,
                radius,
                settings.hardness * radius,
                color,
                settings.opacity,
            );
        } else {
            self.surface
                .fill_circle(x, y, radius, color, settings.opacity);
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn stamp_cell(&mut self, stamp: &StampRequest, settings: &BrushSettings) {
        let cell = settings.pixel_size();
        let side = f64::from(cell);
        let x = (f64::from(stamp.x) / side).floor() * side;
        let y = (f64::from(stamp.y) / side).floor() * side;
        self.surface
            .fill_rect(x as i64, y as i64, cell, cell, settings.color, 1.0);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn stamp_flood(&mut self, stamp: &StampRequest, settings: &BrushSettings) {
        let filled = self.surface.flood_fill(
            stamp.x.floor() as i64,
            stamp.y.floor() as i64,
            settings.color,
        );
        tracing::debug!(
            "Flood fill at ({}, {}) repainted {} pixels",
            stamp.x,
            stamp.y,
            filled
        );
    }
}

impl<R: Rng> MarkSink for MarkRenderer<R> {
    fn stamp(&mut self, stamp: &StampRequest, settings: &BrushSettings) {
        MarkRenderer::stamp(self, stamp, settings);
    }
}
