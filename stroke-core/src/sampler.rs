//! Conversion of raw pointer samples into canonical stroke points.

use crate::{Point, RawSample, StrokeError, StrokeResult, StrokeState, DEFAULT_PRESSURE};

/// Largest accepted surface-local coordinate magnitude, in pixels.
///
/// Beyond 2^24 an `f32` can no longer resolve the minimum stamp step.
pub const MAX_COORDINATE: f32 = 16_777_216.0;

/// Normalizes raw samples into surface-local [`Point`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sampler {
    origin_x: f32,
    origin_y: f32,
}

impl Sampler {
    /// Create a sampler for a surface whose on-screen origin is `(x, y)`.
    #[must_use]
    pub fn new(origin_x: f32, origin_y: f32) -> Self {
        Self { origin_x, origin_y }
    }

    /// On-screen origin of the surface.
    #[must_use]
    pub fn origin(&self) -> (f32, f32) {
        (self.origin_x, self.origin_y)
    }

    /// Move the surface origin.
    pub fn set_origin(&mut self, x: f32, y: f32) {
        self.origin_x = x;
        self.origin_y = y;
    }

    /// Convert the first sample of a stroke and reset `state` around it.
    ///
    /// # Errors
    ///
    /// Returns [`StrokeError::InvalidSample`] for non-finite coordinates;
    /// `state` is left untouched in that case.
    pub fn on_sample_start(&self, raw: &RawSample, state: &mut StrokeState) -> StrokeResult<Point> {
        let point = self.normalize(raw)?;
        state.begin(point);
        Ok(point)
    }

    /// Convert a sample taken while the stroke is in progress.
    ///
    /// # Errors
    ///
    /// Returns [`StrokeError::InvalidSample`] for non-finite coordinates.
    pub fn on_sample_move(&self, raw: &RawSample) -> StrokeResult<Point> {
        self.normalize(raw)
    }

    fn normalize(&self, raw: &RawSample) -> StrokeResult<Point> {
        if !(raw.x.is_finite() && raw.y.is_finite()) {
            return Err(StrokeError::InvalidSample(format!(
                "non-finite position ({}, {})",
                raw.x, raw.y
            )));
        }

        // Zero means the device has no pressure sensor, not a feather touch.
        let pressure = match raw.pressure {
            Some(p) if p.is_finite() && p > 0.0 => p.min(1.0),
            _ => DEFAULT_PRESSURE,
        };

        let (x, y) = (raw.x - self.origin_x, raw.y - self.origin_y);
        if x.abs() > MAX_COORDINATE || y.abs() > MAX_COORDINATE {
            return Err(StrokeError::InvalidSample(format!(
                "position ({x}, {y}) outside +/-{MAX_COORDINATE}"
            )));
        }

        Ok(Point {
            x,
            y,
            pressure,
            tilt: raw.tilt.filter(|t| t.is_finite()),
        })
    }
}
