//! Evenly spaced stamp positions between two stroke points.
//!
//! The walk starts `carry` pixels into the segment and advances by the brush
//! step. Whatever part of a step is left over when the segment runs out is
//! returned as the new carry and added to the start of the next segment, so
//! spacing stays uniform across pointer-event boundaries.

use crate::{BrushSettings, Point, StampRequest};

/// Smallest allowed distance between stamps, in pixels.
pub const MIN_STEP: f32 = 0.5;

/// Slack for float error when deciding whether the last stamp still fits.
const FIT_EPSILON: f32 = 1e-4;

/// Lazily yields the stamps of one segment.
///
/// The carry for the next segment is known up front via [`StampWalk::carry`].
#[derive(Debug, Clone)]
pub struct StampWalk {
    prev: Point,
    curr: Point,
    dist: f32,
    start: f32,
    step: f32,
    direct: bool,
    index: usize,
    count: usize,
    carry: f32,
}

/// Plan the stamps between `prev` and `curr`.
///
/// Pixel-style tools skip interpolation and stamp `curr` once, leaving the
/// carry untouched. A zero-length segment yields nothing.
#[must_use]
pub fn interpolate(prev: &Point, curr: &Point, settings: &BrushSettings, carry: f32) -> StampWalk {
    debug_assert!(carry >= 0.0, "negative carry {carry}");
    let carry = carry.max(0.0);
    let step = settings.step();

    let mut walk = StampWalk {
        prev: *prev,
        curr: *curr,
        dist: 0.0,
        start: carry,
        step,
        direct: false,
        index: 0,
        count: 0,
        carry,
    };

    if !settings.tool.interpolates() {
        walk.direct = true;
        walk.count = 1;
        return walk;
    }

    let dist = prev.distance_to(curr);
    if !(dist.is_finite() && dist > 0.0) {
        return walk;
    }
    walk.dist = dist;

    if carry > dist {
        walk.carry = carry - dist;
        return walk;
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    {
        let count = ((dist - carry) / step + FIT_EPSILON).floor() as usize + 1;
        walk.count = count;
        walk.carry = (carry + count as f32 * step - dist).max(0.0);
    }
    walk
}

impl StampWalk {
    /// Distance to carry into the next segment once this walk is consumed.
    #[must_use]
    pub fn carry(&self) -> f32 {
        self.carry
    }

    /// Whether the first stamp sits exactly on the segment start.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn starts_at_origin(&self) -> bool {
        !self.direct && self.count > 0 && self.start == 0.0
    }
}

impl Iterator for StampWalk {
    type Item = StampRequest;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let i = self.index;
        self.index += 1;

        if self.direct {
            return Some(self.curr.into());
        }

        #[allow(clippy::cast_precision_loss)]
        let t = self.start + i as f32 * self.step;
        let u = (t / self.dist).min(1.0);
        Some(self.prev.lerp(&self.curr, u).into())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for StampWalk {}
