//! Command-line arguments

use clap::Parser;
use gcodegoblin_settings::{Layout, LogLevel};
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

/// Rewrite G-code using START_COPY / STOP_COPY / PASTE / START_CUT / STOP_CUT comment directives
#[derive(Debug, Parser)]
#[command(name = "gcodegoblin", version, long_version = LONG_VERSION, about)]
pub struct Cli {
    /// Project archive (.3mf) or toolpath (.gcode) to rewrite
    pub file: PathBuf,

    /// Write here instead of next to the input with a `.fixed` infix
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Config file (TOML or JSON)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log every directive and archive entry
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Effective log level given the configured default
    pub fn log_level(&self, configured: LogLevel) -> LogLevel {
        if self.verbose {
            LogLevel::Debug
        } else if self.quiet {
            LogLevel::Warn
        } else {
            configured
        }
    }
}

/// Usage text printed for missing or unsupported input files
pub fn usage(layout: &Layout) -> String {
    format!(
        "Usage: gcodegoblin [OPTIONS] <FILE>\n       <FILE> can be a .{} file or a .{} file",
        layout.archive_extension, layout.toolpath_extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_positional() {
        let cli = Cli::try_parse_from(["gcodegoblin", "benchy.3mf"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("benchy.3mf"));
        assert!(cli.output.is_none());
        assert_eq!(cli.log_level(LogLevel::Info), LogLevel::Info);
    }

    #[test]
    fn test_parse_options() {
        let cli = Cli::try_parse_from([
            "gcodegoblin",
            "-v",
            "-o",
            "out.gcode",
            "--config",
            "goblin.toml",
            "part.gcode",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(PathBuf::from("out.gcode")));
        assert_eq!(cli.config, Some(PathBuf::from("goblin.toml")));
        assert_eq!(cli.log_level(LogLevel::Warn), LogLevel::Debug);
    }

    #[test]
    fn test_missing_file_is_rejected() {
        assert!(Cli::try_parse_from(["gcodegoblin"]).is_err());
        assert!(Cli::try_parse_from(["gcodegoblin", "-v", "-q", "a.gcode"]).is_err());
    }

    #[test]
    fn test_usage_mentions_extensions() {
        let text = usage(&Layout::default());
        assert!(text.contains(".3mf"));
        assert!(text.contains(".gcode"));
    }
}
