//! # Stroke Core
//!
//! Turns a stream of pointer samples into evenly spaced brush stamps.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                   stroke-core                    │
//! ├──────────────────────────────────────────────────┤
//! │  RawSample ──► Sampler ──► Point                 │
//! │                              │                   │
//! │  StrokeMachine ◄─────────────┘                   │
//! │   - Idle / Active            │                   │
//! │   - StrokeState (carry)      ▼                   │
//! │                          interpolate()           │
//! │                              │                   │
//! │                              ▼                   │
//! │                    MarkSink::stamp(StampRequest) │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! Rasterization lives behind the [`MarkSink`] trait so everything here is
//! pure geometry and can be tested without a surface.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod error;
pub mod event;
pub mod interpolate;
pub mod machine;
pub mod point;
pub mod sampler;
pub mod settings;

pub use color::Rgb;
pub use error::{StrokeError, StrokeResult};
pub use event::PointerEvent;
pub use interpolate::{interpolate, StampWalk, MIN_STEP};
pub use machine::{MarkSink, StrokeMachine, StrokeState, StrokeSummary, Transition};
pub use point::{Point, RawSample, StampRequest, DEFAULT_PRESSURE};
pub use sampler::{Sampler, MAX_COORDINATE};
pub use settings::{BrushSettings, MarkStrategy, Tool};

/// Stroke core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
