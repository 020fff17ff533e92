//! Pointer samples, canonical stroke points and stamp requests.

use serde::{Deserialize, Serialize};

/// Pressure assumed when the input device reports none (or reports zero).
pub const DEFAULT_PRESSURE: f32 = 0.5;

/// A raw pointer sample as delivered by the host, in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// X position in device pixels.
    pub x: f32,
    /// Y position in device pixels.
    pub y: f32,
    /// Reported pressure (0.0 to 1.0, if available).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f32>,
    /// Reported pen tilt (if available).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilt: Option<f32>,
}

impl RawSample {
    /// Create a sample without pressure or tilt.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            pressure: None,
            tilt: None,
        }
    }

    /// Set the reported pressure.
    #[must_use]
    pub fn with_pressure(mut self, pressure: f32) -> Self {
        self.pressure = Some(pressure);
        self
    }

    /// Set the reported tilt.
    #[must_use]
    pub fn with_tilt(mut self, tilt: f32) -> Self {
        self.tilt = Some(tilt);
        self
    }
}

/// A canonical stroke point in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X position in surface pixels.
    pub x: f32,
    /// Y position in surface pixels.
    pub y: f32,
    /// Pressure in `[0, 1]`.
    pub pressure: f32,
    /// Pen tilt, carried through but not used for rendering.
    pub tilt: Option<f32>,
}

impl Point {
    /// Create a point with the default pressure.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            pressure: DEFAULT_PRESSURE,
            tilt: None,
        }
    }

    /// Set the pressure.
    #[must_use]
    pub fn with_pressure(mut self, pressure: f32) -> Self {
        self.pressure = pressure;
        self
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Linear interpolation of position, pressure and tilt at fraction `u`.
    #[must_use]
    pub fn lerp(&self, other: &Self, u: f32) -> Self {
        let tilt = match (self.tilt, other.tilt) {
            (Some(a), Some(b)) => Some(a + (b - a) * u),
            (_, b) => b,
        };
        Self {
            x: self.x + (other.x - self.x) * u,
            y: self.y + (other.y - self.y) * u,
            pressure: self.pressure + (other.pressure - self.pressure) * u,
            tilt,
        }
    }
}

/// A request to apply the brush once at a position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StampRequest {
    /// Centre X in surface pixels.
    pub x: f32,
    /// Centre Y in surface pixels.
    pub y: f32,
    /// Pressure at this position.
    pub pressure: f32,
    /// Tilt at this position, if known.
    pub tilt: Option<f32>,
}

impl From<Point> for StampRequest {
    fn from(p: Point) -> Self {
        Self {
            x: p.x,
            y: p.y,
            pressure: p.pressure,
            tilt: p.tilt,
        }
    }
}
