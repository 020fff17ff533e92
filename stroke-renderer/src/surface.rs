//! Opaque RGBA raster buffer and its drawing primitives.
//!
//! Every pixel is composited source-over onto an opaque background, so the
//! alpha channel always stays at 255.

use stroke_core::Rgb;

use crate::error::{RenderError, RenderResult};

/// A fixed-size opaque raster surface in device pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    background: Rgb,
    pixels: Vec<u8>,
}

/// Alpha of a soft disc at distance `d` from its centre.
///
/// Fully opaque up to `inner`, fading linearly to zero at `outer`.
#[must_use]
pub fn radial_falloff(d: f32, inner: f32, outer: f32) -> f32 {
    if d <= inner {
        1.0
    } else if d >= outer {
        0.0
    } else {
        (outer - d) / (outer - inner)
    }
}

impl Surface {
    /// Create a surface filled with `background`.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    pub fn new(width: u32, height: u32, background: Rgb) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let mut surface = Self {
            width,
            height,
            background,
            pixels: vec![0; pixel_len(width, height)],
        };
        surface.clear();
        Ok(surface)
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Background colour used by [`Surface::clear`] and the eraser.
    #[must_use]
    pub fn background(&self) -> Rgb {
        self.background
    }

    /// Raw RGBA bytes, row-major.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// RGBA value at `(x, y)`, or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Fill the whole buffer with one opaque colour.
    pub fn fill(&mut self, color: Rgb) {
        let [r, g, b] = color.channels();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[r, g, b, 255]);
        }
    }

    /// Reset to the background fill.
    pub fn clear(&mut self) {
        self.fill(self.background);
    }

    /// Change dimensions, discarding content and rebaselining to the background.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0; pixel_len(width, height)];
        self.clear();
        tracing::debug!("Surface resized to {}x{}", width, height);
        Ok(())
    }

    /// Composite `color` at `alpha` over one pixel. Out-of-bounds is a no-op.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgb, alpha: f32) {
        let Some((x, y)) = self.clip(x, y) else {
            return;
        };
        if alpha <= 0.0 || alpha.is_nan() {
            return;
        }
        let alpha = alpha.min(1.0);
        let i = self.index(x, y);
        for (offset, src) in color.channels().into_iter().enumerate() {
            let dst = f32::from(self.pixels[i + offset]);
            let out = f32::from(src).mul_add(alpha, dst * (1.0 - alpha));
            self.pixels[i + offset] = out.round().clamp(0.0, 255.0) as u8;
        }
        self.pixels[i + 3] = 255;
    }

    /// Composite a filled rectangle with its top-left corner at `(x, y)`.
    pub fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, color: Rgb, alpha: f32) {
        let x1 = (x + i64::from(width)).min(i64::from(self.width));
        let y1 = (y + i64::from(height)).min(i64::from(self.height));
        for py in y.max(0)..y1 {
            for px in x.max(0)..x1 {
                self.blend_pixel(px, py, color, alpha);
            }
        }
    }

    /// Composite a hard-edged disc.
    ///
    /// A pixel is covered when its centre lies within `radius` of `(cx, cy)`.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32) {
        self.fill_disc_with(cx, cy, radius, color, alpha, |d| {
            if d <= radius {
                1.0
            } else {
                0.0
            }
        });
    }

    /// Composite a radial-gradient disc: solid out to `inner`, transparent at `radius`.
    pub fn fill_radial(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        inner: f32,
        color: Rgb,
        alpha: f32,
    ) {
        self.fill_disc_with(cx, cy, radius, color, alpha, |d| {
            radial_falloff(d, inner, radius)
        });
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn fill_disc_with(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        color: Rgb,
        alpha: f32,
        coverage: impl Fn(f32) -> f32,
    ) {
        if !(radius > 0.0 && cx.is_finite() && cy.is_finite()) {
            return;
        }
        let x0 = ((cx - radius).floor() as i64).max(0);
        let y0 = ((cy - radius).floor() as i64).max(0);
        let x1 = ((cx + radius).ceil() as i64).min(i64::from(self.width) - 1);
        let y1 = ((cy + radius).ceil() as i64).min(i64::from(self.height) - 1);

        for py in y0..=y1 {
            let dy = py as f32 + 0.5 - cy;
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - cx;
                let a = coverage(dx.hypot(dy));
                if a > 0.0 {
                    self.blend_pixel(px, py, color, a * alpha);
                }
            }
        }
    }

    /// Flood fill the 4-connected region sharing the colour at `(x, y)`.
    ///
    /// Returns the number of pixels repainted.
    pub fn flood_fill(&mut self, x: i64, y: i64, color: Rgb) -> usize {
        let Some((x, y)) = self.clip(x, y) else {
            return 0;
        };
        let target = self.rgb(x, y);
        let fill = color.channels();
        if target == fill {
            return 0;
        }

        let mut filled = 0;
        let mut stack = vec![(x, y)];
        while let Some((sx, sy)) = stack.pop() {
            if self.rgb(sx, sy) != target {
                continue;
            }
            let mut left = sx;
            while left > 0 && self.rgb(left - 1, sy) == target {
                left -= 1;
            }
            let mut right = sx;
            while right + 1 < self.width && self.rgb(right + 1, sy) == target {
                right += 1;
            }

            for px in left..=right {
                let i = self.index(px, sy);
                self.pixels[i..i + 4].copy_from_slice(&[fill[0], fill[1], fill[2], 255]);
                filled += 1;
                if sy > 0 && self.rgb(px, sy - 1) == target {
                    stack.push((px, sy - 1));
                }
                if sy + 1 < self.height && self.rgb(px, sy + 1) == target {
                    stack.push((px, sy + 1));
                }
            }
        }
        filled
    }

    fn clip(&self, x: i64, y: i64) -> Option<(u32, u32)> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        Some((x, y))
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.index(x, y);
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

fn pixel_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    #[test]
    fn test_new_fills_background() {
        let surface = Surface::new(4, 3, Rgb::WHITE).unwrap();
        assert_eq!(surface.as_raw().len(), 4 * 3 * 4);
        assert!(surface.as_raw().iter().all(|&b| b == 255));
        assert_eq!(surface.pixel(4, 0), None);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            Surface::new(0, 10, Rgb::WHITE),
            Err(RenderError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_blend_half_alpha() {
        let mut surface = Surface::new(1, 1, Rgb::WHITE).unwrap();
        surface.blend_pixel(0, 0, Rgb::BLACK, 0.5);
        assert_eq!(surface.pixel(0, 0), Some([128, 128, 128, 255]));

        surface.blend_pixel(-1, 0, Rgb::BLACK, 1.0);
        surface.blend_pixel(0, 7, Rgb::BLACK, 1.0);
        assert_eq!(surface.pixel(0, 0), Some([128, 128, 128, 255]));
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut surface = Surface::new(4, 4, Rgb::WHITE).unwrap();
        surface.fill_rect(-2, 2, 4, 10, RED, 1.0);
        assert_eq!(surface.pixel(0, 2), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(1, 3), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(2, 2), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(0, 1), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_fill_circle_coverage() {
        let mut surface = Surface::new(20, 20, Rgb::WHITE).unwrap();
        surface.fill_circle(10.0, 10.0, 3.0, RED, 1.0);
        assert_eq!(surface.pixel(10, 10), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(12, 9), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(13, 10), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(12, 12), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_radial_falloff() {
        assert!((radial_falloff(2.0, 5.0, 10.0) - 1.0).abs() < f32::EPSILON);
        assert!((radial_falloff(7.5, 5.0, 10.0) - 0.5).abs() < f32::EPSILON);
        assert!(radial_falloff(10.0, 5.0, 10.0).abs() < f32::EPSILON);
        assert!(radial_falloff(3.0, 0.0, 4.0) > 0.0);
    }

    #[test]
    fn test_flood_fill_stops_at_border() {
        let mut surface = Surface::new(10, 10, Rgb::WHITE).unwrap();
        // Vertical wall at x = 5.
        surface.fill_rect(5, 0, 1, 10, Rgb::BLACK, 1.0);

        let filled = surface.flood_fill(1, 1, RED);
        assert_eq!(filled, 50);
        assert_eq!(surface.pixel(4, 9), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(5, 5), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(6, 5), Some([255, 255, 255, 255]));

        assert_eq!(surface.flood_fill(1, 1, RED), 0);
        assert_eq!(surface.flood_fill(-1, 1, RED), 0);
    }

    #[test]
    fn test_resize_rebaselines() {
        let mut surface = Surface::new(2, 2, Rgb::WHITE).unwrap();
        surface.fill(RED);
        surface.resize(3, 1).unwrap();
        assert_eq!(surface.width(), 3);
        assert_eq!(surface.height(), 1);
        assert_eq!(surface.pixel(2, 0), Some([255, 255, 255, 255]));
        assert!(surface.resize(0, 1).is_err());
    }
}
