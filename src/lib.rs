//! # GCodeGoblin
//!
//! Rewrites G-code toolpaths, plain or inside a 3MF project archive, by
//! interpreting comment directives:
//!
//! - `; START_COPY:<name>` / `; STOP_COPY:<name>` record lines into a buffer
//! - `; PASTE:<name>` re-emits a buffer
//! - `; START_CUT` / `; STOP_CUT` drop the lines in between
//!
//! ## Architecture
//!
//! 1. **gcodegoblin-core** - Directive detection, rewriter, checksums, archive I/O
//! 2. **gcodegoblin-settings** - Config files and validation
//! 3. **gcodegoblin** - Command-line binary

pub mod cli;

pub use cli::{usage, Cli};

pub use gcodegoblin_core::{
    process_file, rewrite_lines, Checksum, Directive, Error, FileKind, Layout, ProcessOutcome,
    Result, Rewrite, RewriteStats, Rewriter, RewriterState,
};
pub use gcodegoblin_settings::{Config, LogLevel};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, keeping stdout for usage text
/// - RUST_LOG environment variable support, falling back to `level`
pub fn init_logging(level: LogLevel) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load the config named on the command line, or the default one
pub fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    use anyhow::Context;

    Config::load_or_default(cli.config.as_deref()).context("Failed to load configuration")
}

/// Process the file named on the command line
pub fn run(cli: &Cli, config: &Config) -> Result<ProcessOutcome> {
    let outcome = process_file(&cli.file, cli.output.as_deref(), &config.layout)?;

    tracing::info!(
        "{} -> {} ({} lines read, {} cut, {} pastes, md5 {})",
        outcome.input.display(),
        outcome.output.display(),
        outcome.stats.lines_read,
        outcome.stats.lines_cut,
        outcome.stats.pastes,
        outcome.checksum
    );
    for name in &outcome.stats.unknown_pastes {
        tracing::warn!("PASTE referenced unknown buffer {:?}", name);
    }

    Ok(outcome)
}
