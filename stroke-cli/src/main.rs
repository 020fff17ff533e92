//! # Stroke Replay
//!
//! Renders a JSON stroke script to PNG.

use clap::Parser;
use stroke_cli::{CliArgs, ReplayConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stroke_core=debug,stroke_renderer=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    // Use JSON format when RUST_LOG_FORMAT=json
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = ReplayConfig::from(args);

    tracing::info!(
        "Surface {}x{} background {}",
        config.width,
        config.height,
        config.background
    );

    let outcome = stroke_cli::run(&config)?;
    if let Some(encoded) = outcome.encoded {
        println!("{encoded}");
    }

    tracing::info!("Stroke replay finished");
    Ok(())
}
