//! # Stroke Renderer
//!
//! Software rasterizer for freehand strokes.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                   Canvas                     │
//! ├──────────────────┬───────────────────────────┤
//! │  StrokeMachine   │  MarkRenderer             │
//! │  (stroke-core)   │   - disc / soft disc      │
//! │                  │   - pixel cell            │
//! │                  │   - flood fill            │
//! ├──────────────────┴───────────────────────────┤
//! │  Surface (opaque RGBA)  ◄──►  PNG / base64   │
//! └──────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod error;
pub mod mark;
pub mod surface;

pub use error::{RenderError, RenderResult};
pub use mark::MarkRenderer;
pub use surface::Surface;

use rand::rngs::StdRng;
use rand::Rng;
use stroke_core::{BrushSettings, PointerEvent, RawSample, Rgb, StrokeMachine, Transition};

/// Configuration for a new canvas.
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Background fill, also used by the eraser.
    pub background: Rgb,
    /// Initial brush.
    pub settings: BrushSettings,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Rgb::WHITE,
            settings: BrushSettings::default(),
        }
    }
}

/// A drawing surface wired to the stroke state machine.
///
/// This is the host-facing entry point: feed it pointer events, swap brush
/// settings, and import or export the raster.
#[derive(Debug)]
pub struct Canvas<R = StdRng> {
    renderer: MarkRenderer<R>,
    machine: StrokeMachine,
}

impl Canvas<StdRng> {
    /// Create a canvas with an entropy-seeded jitter source.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero or the settings are invalid.
    pub fn new(config: CanvasConfig) -> RenderResult<Self> {
        let surface = Surface::new(config.width, config.height, config.background)?;
        Self::from_parts(MarkRenderer::new(surface), config.settings)
    }

    /// Create a canvas whose jitter is reproducible from `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero or the settings are invalid.
    pub fn seeded(config: CanvasConfig, seed: u64) -> RenderResult<Self> {
        let surface = Surface::new(config.width, config.height, config.background)?;
        Self::from_parts(MarkRenderer::seeded(surface, seed), config.settings)
    }
}

impl<R: Rng> Canvas<R> {
    /// Create a canvas from an existing renderer.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid.
    pub fn from_parts(renderer: MarkRenderer<R>, settings: BrushSettings) -> RenderResult<Self> {
        Ok(Self {
            renderer,
            machine: StrokeMachine::new(settings)?,
        })
    }

    /// The raster surface.
    #[must_use]
    pub fn surface(&self) -> &Surface {
        self.renderer.surface()
    }

    /// Current brush settings.
    #[must_use]
    pub fn settings(&self) -> &BrushSettings {
        self.machine.settings()
    }

    /// Whether a stroke is in progress.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.machine.is_active()
    }

    /// Replace the brush; applies from the next stamp on.
    ///
    /// # Errors
    ///
    /// Returns an error (keeping the old brush) if validation fails.
    pub fn set_settings(&mut self, settings: BrushSettings) -> RenderResult<()> {
        self.machine.set_settings(settings)?;
        Ok(())
    }

    /// Move the surface's on-screen origin used to translate pointer samples.
    pub fn set_origin(&mut self, x: f32, y: f32) {
        self.machine.set_origin(x, y);
    }

    /// Set the callback fired once per completed stroke.
    pub fn set_on_stroke_end<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.machine.set_on_stroke_end(callback);
    }

    /// Feed one pointer event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event carries an invalid sample.
    pub fn handle(&mut self, event: &PointerEvent) -> RenderResult<Transition> {
        tracing::trace!("Pointer {}", event.phase());
        Ok(self.machine.handle(event, &mut self.renderer)?)
    }

    /// Pointer pressed.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample is invalid.
    pub fn pointer_down(&mut self, sample: RawSample) -> RenderResult<Transition> {
        self.handle(&PointerEvent::Down(sample))
    }

    /// Pointer dragged.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample is invalid.
    pub fn pointer_move(&mut self, sample: RawSample) -> RenderResult<Transition> {
        self.handle(&PointerEvent::Move(sample))
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) -> Transition {
        self.machine.pointer_up()
    }

    /// Reset the surface to its background.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::StrokeInProgress`] while drawing.
    pub fn clear(&mut self) -> RenderResult<()> {
        self.ensure_idle("clear")?;
        self.renderer.surface_mut().clear();
        Ok(())
    }

    /// Resize and rebaseline the surface.
    ///
    /// # Errors
    ///
    /// Returns an error while drawing or for zero dimensions.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.ensure_idle("resize")?;
        self.renderer.surface_mut().resize(width, height)
    }

    /// Export the surface as base64 PNG.
    ///
    /// Reflects every stamp applied so far, including those of a stroke
    /// still in progress.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn export_png_base64(&self) -> RenderResult<String> {
        codec::export_png_base64(self.surface())
    }

    /// Export the surface as a PNG data URI.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn export_data_uri(&self) -> RenderResult<String> {
        codec::export_data_uri(self.surface())
    }

    /// Replace the surface content with a base64 image or data URI.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::StrokeInProgress`] while drawing, or
    /// [`RenderError::ImageDecode`] for a malformed payload. The surface is
    /// unchanged on error.
    pub fn import_base64(&mut self, payload: &str) -> RenderResult<()> {
        self.ensure_idle("import")?;
        codec::import_base64(self.renderer.surface_mut(), payload)?;
        tracing::debug!("Imported image onto surface");
        Ok(())
    }

    fn ensure_idle(&self, operation: &'static str) -> RenderResult<()> {
        if self.machine.is_active() {
            tracing::warn!("Refusing to {operation} during an active stroke");
            return Err(RenderError::StrokeInProgress(operation));
        }
        Ok(())
    }
}
