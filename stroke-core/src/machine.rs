//! Stroke lifecycle: `Idle --down--> Active --move--> Active --up/leave--> Idle`.

use std::fmt;

use crate::{
    interpolate, BrushSettings, Point, PointerEvent, RawSample, Sampler, StampRequest,
    StrokeResult,
};

/// Receiver of the stamps a stroke produces.
pub trait MarkSink {
    /// Apply the brush once at `stamp` using `settings`.
    fn stamp(&mut self, stamp: &StampRequest, settings: &BrushSettings);
}

impl<T: MarkSink + ?Sized> MarkSink for &mut T {
    fn stamp(&mut self, stamp: &StampRequest, settings: &BrushSettings) {
        (**self).stamp(stamp, settings);
    }
}

/// Rolling state of the stroke in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StrokeState {
    active: bool,
    last_point: Option<Point>,
    distance_remainder: f32,
    stamps: usize,
}

impl StrokeState {
    /// The idle state: no stroke, no last point, no carry.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Whether a stroke is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Most recent point of the stroke.
    #[must_use]
    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }

    /// Distance already travelled towards the next stamp.
    #[must_use]
    pub fn distance_remainder(&self) -> f32 {
        self.distance_remainder
    }

    /// Stamps applied so far in this stroke.
    #[must_use]
    pub fn stamps(&self) -> usize {
        self.stamps
    }

    pub(crate) fn begin(&mut self, start: Point) {
        *self = Self {
            active: true,
            last_point: Some(start),
            distance_remainder: 0.0,
            stamps: 0,
        };
    }

    fn advance(&mut self, point: Point, carry: f32, stamps: usize) {
        self.last_point = Some(point);
        self.distance_remainder = carry;
        self.stamps += stamps;
    }
}

/// Outcome of a completed stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeSummary {
    /// Total stamps applied between pointer-down and pointer-up.
    pub stamps: usize,
}

/// What a pointer event did to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Idle -> Active; the start point was stamped.
    Started,
    /// Active -> Active with this many new stamps.
    Continued {
        /// Stamps applied for this event.
        stamps: usize,
    },
    /// Active -> Idle.
    Ended(StrokeSummary),
    /// The event has no transition from the current state.
    Ignored,
}

/// Callback fired once per completed stroke.
pub type OnStrokeEnd = Box<dyn FnMut() + Send>;

/// Single-pointer stroke state machine.
pub struct StrokeMachine {
    sampler: Sampler,
    settings: BrushSettings,
    state: StrokeState,
    on_stroke_end: Option<OnStrokeEnd>,
}

impl fmt::Debug for StrokeMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrokeMachine")
            .field("sampler", &self.sampler)
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("on_stroke_end", &self.on_stroke_end.is_some())
            .finish()
    }
}

impl StrokeMachine {
    /// Create an idle machine with validated settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `settings` fail validation.
    pub fn new(settings: BrushSettings) -> StrokeResult<Self> {
        settings.validate()?;
        Ok(Self {
            sampler: Sampler::default(),
            settings,
            state: StrokeState::idle(),
            on_stroke_end: None,
        })
    }

    /// Current brush settings.
    #[must_use]
    pub fn settings(&self) -> &BrushSettings {
        &self.settings
    }

    /// Replace the brush settings; applies from the next stamp on.
    ///
    /// # Errors
    ///
    /// Returns an error (and keeps the old settings) if validation fails.
    pub fn set_settings(&mut self, settings: BrushSettings) -> StrokeResult<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// The sample normalizer.
    #[must_use]
    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// Move the surface's on-screen origin.
    pub fn set_origin(&mut self, x: f32, y: f32) {
        self.sampler.set_origin(x, y);
    }

    /// Current stroke state.
    #[must_use]
    pub fn state(&self) -> &StrokeState {
        &self.state
    }

    /// Whether a stroke is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Set the stroke-completion callback.
    pub fn set_on_stroke_end<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.on_stroke_end = Some(Box::new(callback));
    }

    /// Dispatch a pointer event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event carries an invalid sample.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        sink: &mut impl MarkSink,
    ) -> StrokeResult<Transition> {
        match event {
            PointerEvent::Down(raw) => self.pointer_down(raw, sink),
            PointerEvent::Move(raw) => self.pointer_move(raw, sink),
            PointerEvent::Up | PointerEvent::Leave => Ok(self.pointer_up()),
        }
    }

    /// Begin a stroke and stamp its start point.
    ///
    /// A second pointer-down while a stroke is active is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample has non-finite coordinates.
    pub fn pointer_down(
        &mut self,
        raw: &RawSample,
        sink: &mut impl MarkSink,
    ) -> StrokeResult<Transition> {
        if self.state.is_active() {
            tracing::warn!("Ignoring pointer-down during an active stroke");
            return Ok(Transition::Ignored);
        }

        let start = self.sampler.on_sample_start(raw, &mut self.state)?;
        sink.stamp(&start.into(), &self.settings);
        self.state.advance(start, 0.0, 1);

        tracing::debug!(
            "Stroke started at ({}, {}) with {:?}",
            start.x,
            start.y,
            self.settings.tool
        );
        Ok(Transition::Started)
    }

    /// Extend the active stroke to a new sample.
    ///
    /// Moves while idle (hover) are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample has non-finite coordinates; the stroke
    /// state is left unchanged.
    pub fn pointer_move(
        &mut self,
        raw: &RawSample,
        sink: &mut impl MarkSink,
    ) -> StrokeResult<Transition> {
        if !self.state.is_active() {
            return Ok(Transition::Ignored);
        }
        let Some(prev) = self.state.last_point() else {
            return Ok(Transition::Ignored);
        };

        let point = self.sampler.on_sample_move(raw)?;
        let carry = self.state.distance_remainder();

        if !self.settings.tool.stamps_on_move() {
            self.state.advance(point, carry, 0);
            return Ok(Transition::Continued { stamps: 0 });
        }

        let walk = interpolate(&prev, &point, &self.settings, carry);
        let next_carry = walk.carry();
        // The pointer-down stamp already covers the segment origin.
        let skip = usize::from(walk.starts_at_origin());

        let mut stamps = 0;
        for stamp in walk.skip(skip) {
            tracing::trace!("Stamp at ({}, {}) p={}", stamp.x, stamp.y, stamp.pressure);
            sink.stamp(&stamp, &self.settings);
            stamps += 1;
        }

        self.state.advance(point, next_carry, stamps);
        Ok(Transition::Continued { stamps })
    }

    /// End the active stroke (pointer-up or pointer-leave).
    pub fn pointer_up(&mut self) -> Transition {
        if !self.state.is_active() {
            return Transition::Ignored;
        }

        let summary = StrokeSummary {
            stamps: self.state.stamps(),
        };
        self.state = StrokeState::idle();
        tracing::debug!("Stroke ended after {} stamps", summary.stamps);

        if let Some(callback) = self.on_stroke_end.as_mut() {
            callback();
        }
        Transition::Ended(summary)
    }
}
