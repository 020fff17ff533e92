//! Brush settings and the per-tool stamping strategy table.

use serde::{Deserialize, Serialize};

use crate::interpolate::MIN_STEP;
use crate::{Rgb, StrokeError, StrokeResult};

/// Drawing tool selected by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Thin graphite-style line.
    Pencil,
    /// General purpose round brush.
    #[default]
    Brush,
    /// Solid ink pen.
    Ink,
    /// Grainy charcoal stick.
    Charcoal,
    /// Paints with the surface background colour.
    Eraser,
    /// Grid-snapped pixel-art cells.
    Pixel,
    /// Flood fill of the region under the pointer.
    Fill,
}

/// How a single stamp of a tool is rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkStrategy {
    /// Round disc, hard or soft according to hardness.
    Disc {
        /// Paint with the background colour instead of the brush colour.
        erase: bool,
    },
    /// One opaque grid-aligned cell.
    Cell,
    /// Flood fill of the contiguous region under the point.
    Flood,
}

impl Tool {
    /// Strategy used to rasterize one stamp of this tool.
    #[must_use]
    pub fn strategy(self) -> MarkStrategy {
        match self {
            Self::Pencil | Self::Brush | Self::Ink | Self::Charcoal => {
                MarkStrategy::Disc { erase: false }
            }
            Self::Eraser => MarkStrategy::Disc { erase: true },
            Self::Pixel => MarkStrategy::Cell,
            Self::Fill => MarkStrategy::Flood,
        }
    }

    /// Whether pointer moves are filled in with evenly spaced stamps.
    ///
    /// Pixel strokes show discrete jumps instead.
    #[must_use]
    pub fn interpolates(self) -> bool {
        matches!(self.strategy(), MarkStrategy::Disc { .. })
    }

    /// Whether pointer moves produce stamps at all.
    #[must_use]
    pub fn stamps_on_move(self) -> bool {
        !matches!(self.strategy(), MarkStrategy::Flood)
    }
}

/// Brush parameters supplied by the host.
///
/// A stroke reads these once per stamp; replacing them mid-stroke affects
/// only the stamps that follow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrushSettings {
    /// Brush colour.
    pub color: Rgb,
    /// Brush diameter in pixels (> 0).
    pub size: f32,
    /// Per-stamp opacity (0 to 1).
    pub opacity: f32,
    /// Fraction of the radius painted fully opaque (0 to 1).
    pub hardness: f32,
    /// Stamp spacing as a fraction of size (> 0).
    pub spacing: f32,
    /// Random positional perturbation, proportional to size (0 to 1).
    pub jitter: f32,
    /// Active tool.
    pub tool: Tool,
    /// Whether the input device is a pressure-sensitive stylus.
    pub is_stylus: bool,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: Rgb::BLACK,
            size: 10.0,
            opacity: 1.0,
            hardness: 1.0,
            spacing: 0.25,
            jitter: 0.0,
            tool: Tool::Brush,
            is_stylus: false,
        }
    }
}

impl BrushSettings {
    /// Check every numeric field against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`StrokeError::InvalidSetting`] naming the first bad field.
    pub fn validate(&self) -> StrokeResult<()> {
        fn positive(field: &'static str, value: f32) -> StrokeResult<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(StrokeError::InvalidSetting { field, value })
            }
        }

        fn unit(field: &'static str, value: f32) -> StrokeResult<()> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(StrokeError::InvalidSetting { field, value })
            }
        }

        positive("size", self.size)?;
        positive("spacing", self.spacing)?;
        unit("opacity", self.opacity)?;
        unit("hardness", self.hardness)?;
        unit("jitter", self.jitter)?;
        Ok(())
    }

    /// Parse and validate settings from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> StrokeResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Distance between consecutive stamps, never below [`MIN_STEP`].
    #[must_use]
    pub fn step(&self) -> f32 {
        (self.size * self.spacing).max(MIN_STEP)
    }

    /// Pressure that actually scales the mark.
    ///
    /// Mouse and touch pressure is synthetic, so only styluses use it.
    #[must_use]
    pub fn effective_pressure(&self, pressure: f32) -> f32 {
        if self.is_stylus {
            pressure
        } else {
            1.0
        }
    }

    /// Disc radius for a stamp at the given pressure.
    #[must_use]
    pub fn radius(&self, pressure: f32) -> f32 {
        self.size * self.effective_pressure(pressure) / 2.0
    }

    /// Side of a pixel-art cell: `max(1, floor(size / 2))`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixel_size(&self) -> u32 {
        ((self.size / 2.0).floor() as u32).max(1)
    }
}
