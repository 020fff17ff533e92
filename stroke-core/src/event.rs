//! Pointer events driving the stroke lifecycle.

use serde::{Deserialize, Serialize};

use crate::RawSample;

/// A single-pointer input event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PointerEvent {
    /// Pointer pressed (stroke begins).
    Down(RawSample),
    /// Pointer dragged.
    Move(RawSample),
    /// Pointer released (stroke ends).
    Up,
    /// Pointer left the surface (stroke ends).
    Leave,
}

impl PointerEvent {
    /// The sample carried by this event, if any.
    #[must_use]
    pub fn sample(&self) -> Option<&RawSample> {
        match self {
            Self::Down(sample) | Self::Move(sample) => Some(sample),
            Self::Up | Self::Leave => None,
        }
    }

    /// Short name of the event phase, for logging.
    #[must_use]
    pub fn phase(&self) -> &'static str {
        match self {
            Self::Down(_) => "down",
            Self::Move(_) => "move",
            Self::Up => "up",
            Self::Leave => "leave",
        }
    }
}
