//! # Stroke Replay
//!
//! Replays a recorded pointer script onto a fresh surface.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p stroke-cli -- demos/signature.json --output signature.png
//! ```
//!
//! ## Script format
//!
//! ```json
//! {
//!   "settings": { "color": "#1a1aff", "size": 6, "isStylus": true },
//!   "events": [
//!     { "type": "down", "x": 10, "y": 10, "pressure": 0.4 },
//!     { "type": "move", "x": 60, "y": 30, "pressure": 0.9 },
//!     { "type": "settings", "settings": { "tool": "eraser", "size": 12 } },
//!     { "type": "move", "x": 90, "y": 30 },
//!     { "type": "up" }
//!   ]
//! }
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `ReplayConfig` - Surface and output configuration
//! - `StrokeScript` - The JSON script
//! - `replay` / `run` - Drive a `stroke_renderer::Canvas` through the script

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};
use stroke_core::{BrushSettings, PointerEvent, Rgb, StrokeSummary, Transition};
use stroke_renderer::{codec, Canvas, CanvasConfig, RenderResult};

/// Command-line arguments for stroke-replay.
#[derive(Debug, Clone, Parser)]
#[command(name = "stroke-replay")]
#[command(about = "Replay a JSON stroke script onto a raster surface")]
#[command(version)]
pub struct CliArgs {
    /// Path to the JSON stroke script
    pub script: PathBuf,

    /// Write the result as a PNG file instead of printing base64
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print a `data:image/png;base64,...` URI rather than bare base64
    #[arg(long)]
    pub data_uri: bool,

    /// Surface width in pixels
    #[arg(long, env = "STROKE_WIDTH", default_value = "800")]
    pub width: u32,

    /// Surface height in pixels
    #[arg(long, env = "STROKE_HEIGHT", default_value = "600")]
    pub height: u32,

    /// Background colour as a hex string
    #[arg(long, env = "STROKE_BACKGROUND", default_value = "#ffffff")]
    pub background: Rgb,

    /// Seed for brush jitter; omit for a random seed
    #[arg(long, env = "STROKE_SEED")]
    pub seed: Option<u64>,
}

/// Where the rendered surface goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayOutput {
    /// Write PNG bytes to this path.
    Png(PathBuf),
    /// Print base64 PNG to stdout.
    Base64 {
        /// Wrap the payload in a data URI.
        data_uri: bool,
    },
}

/// Replay configuration.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Surface background.
    pub background: Rgb,
    /// Jitter seed.
    pub seed: Option<u64>,
    /// Script to replay.
    pub script: PathBuf,
    /// Output target.
    pub output: ReplayOutput,
}

impl ReplayConfig {
    /// Create a configuration with default surface values.
    #[must_use]
    pub fn new(script: impl Into<PathBuf>) -> Self {
        let canvas = CanvasConfig::default();
        Self {
            width: canvas.width,
            height: canvas.height,
            background: canvas.background,
            seed: None,
            script: script.into(),
            output: ReplayOutput::Base64 { data_uri: false },
        }
    }

    fn canvas_config(&self, settings: BrushSettings) -> CanvasConfig {
        CanvasConfig {
            width: self.width,
            height: self.height,
            background: self.background,
            settings,
        }
    }
}

impl From<CliArgs> for ReplayConfig {
    fn from(args: CliArgs) -> Self {
        let output = match args.output {
            Some(path) => ReplayOutput::Png(path),
            None => ReplayOutput::Base64 {
                data_uri: args.data_uri,
            },
        };
        Self {
            width: args.width,
            height: args.height,
            background: args.background,
            seed: args.seed,
            script: args.script,
            output,
        }
    }
}

/// One entry of a stroke script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    /// A pointer event (`down`, `move`, `up`, `leave`).
    Pointer(PointerEvent),
    /// Swap the brush; takes effect at the next stamp.
    Settings {
        /// The new brush.
        settings: BrushSettings,
    },
}

/// A recorded sequence of pointer events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeScript {
    /// Brush at the start of the script.
    #[serde(default)]
    pub settings: BrushSettings,
    /// Events in delivery order.
    #[serde(default)]
    pub events: Vec<ScriptStep>,
}

impl StrokeScript {
    /// Parse a script from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a script.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Invalid stroke script")
    }

    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_json(&json)
    }
}

/// Feed every step of `script` into `canvas`.
///
/// Returns the summary of each stroke completed during the replay.
///
/// # Errors
///
/// Returns the first settings or sample error; earlier steps stay applied.
pub fn replay(canvas: &mut Canvas, script: &StrokeScript) -> RenderResult<Vec<StrokeSummary>> {
    canvas.set_settings(script.settings.clone())?;

    let mut summaries = Vec::new();
    for step in &script.events {
        match step {
            ScriptStep::Pointer(event) => {
                if let Transition::Ended(summary) = canvas.handle(event)? {
                    summaries.push(summary);
                }
            }
            ScriptStep::Settings { settings } => canvas.set_settings(settings.clone())?,
        }
    }

    if canvas.is_drawing() {
        tracing::warn!("Script ended mid-stroke; the unfinished stroke stays on the surface");
    }
    Ok(summaries)
}

/// Result of a replay run.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    /// Completed strokes in order.
    pub strokes: Vec<StrokeSummary>,
    /// Base64 payload, when the output target is stdout.
    pub encoded: Option<String>,
}

/// Load the configured script, replay it, and emit the surface.
///
/// # Errors
///
/// Returns an error if the script cannot be loaded or replayed, or the output
/// cannot be written.
pub fn run(config: &ReplayConfig) -> anyhow::Result<ReplayOutcome> {
    let script = StrokeScript::load(&config.script)?;
    tracing::debug!(
        "Loaded {} script events from {}",
        script.events.len(),
        config.script.display()
    );

    let canvas_config = config.canvas_config(script.settings.clone());
    let mut canvas = match config.seed {
        Some(seed) => Canvas::seeded(canvas_config, seed)?,
        None => Canvas::new(canvas_config)?,
    };

    let strokes = replay(&mut canvas, &script)?;
    tracing::info!("Replayed {} strokes", strokes.len());

    let encoded = match &config.output {
        ReplayOutput::Png(path) => {
            let bytes = codec::encode_png(canvas.surface())?;
            fs::write(path, bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
            None
        }
        ReplayOutput::Base64 { data_uri: true } => Some(canvas.export_data_uri()?),
        ReplayOutput::Base64 { data_uri: false } => Some(canvas.export_png_base64()?),
    };

    Ok(ReplayOutcome { strokes, encoded })
}
