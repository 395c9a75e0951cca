// SPDX-License-Identifier: MIT OR Apache-2.0
//! QC compiler - turns a QC node graph into a Source engine compile script.
//!
//! The graph is read from a RON file produced by the host editor. Command-line
//! overrides are applied as ordinary graph edits, every LOD is resolved, and
//! the script (or a JSON report of the resolved LODs) is written to a file or
//! stdout. Logs go to stderr.

mod app;
mod cli;
mod report;
mod settings;

use clap::Parser;
use cli::CliArgs;
use settings::{CompilerSettings, DEFAULT_LOG_FILTER};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_logging(filter: &str) {
    // RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let args = CliArgs::parse();

    let loaded = CompilerSettings::load_or_default(args.config.as_deref());
    let mut settings = loaded.as_ref().cloned().unwrap_or_default();
    settings.apply_cli_overrides(&args);
    init_logging(&settings.log_level);

    if let Err(e) = loaded {
        tracing::error!("Failed to load settings: {e}");
        std::process::exit(1);
    }

    tracing::info!("Starting QC compiler v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = app::run(&args, &settings) {
        tracing::error!("Compile aborted: {e}");
        std::process::exit(1);
    }
}
