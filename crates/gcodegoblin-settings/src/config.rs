//! Configuration for GCodeGoblin
//!
//! A config file is optional. When present it may override the archive
//! layout conventions and the default log level:
//!
//! ```toml
//! [layout]
//! metadata_dir = "Metadata/"
//! toolpath_extension = "gcode"
//!
//! [logging]
//! level = "debug"
//! ```

use crate::error::{SettingsError, SettingsResult};
use gcodegoblin_core::Layout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive string understood by `EnvFilter`
    pub fn as_filter(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter())
    }
}

/// Logging preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level when RUST_LOG is unset
    pub level: LogLevel,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Archive and output naming conventions
    pub layout: Layout,
    /// Logging preferences
    pub logging: LoggingSettings,
}

/// Default config location, `<config dir>/gcodegoblin/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gcodegoblin").join("config.toml"))
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => {
                return Err(SettingsError::UnsupportedFormat(
                    path.display().to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load `explicit` if given, else the default location if it exists,
    /// else defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match default_config_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("Loading config from {}", path.display());
                Self::load_from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let layout = &self.layout;
        let extensions = [
            ("layout.archive_extension", &layout.archive_extension),
            ("layout.toolpath_extension", &layout.toolpath_extension),
            ("layout.checksum_extension", &layout.checksum_extension),
        ];
        for (key, value) in extensions {
            if value.is_empty() {
                return Err(invalid(key, "must not be empty"));
            }
            if value.starts_with('.') {
                return Err(invalid(key, "must not start with '.'"));
            }
        }

        if layout.archive_extension == layout.toolpath_extension {
            return Err(invalid(
                "layout.toolpath_extension",
                "must differ from layout.archive_extension",
            ));
        }

        if !layout.metadata_dir.ends_with('/') {
            return Err(invalid("layout.metadata_dir", "must end with '/'"));
        }

        if layout.fixed_marker.is_empty() {
            return Err(invalid("layout.fixed_marker", "must not be empty"));
        }

        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> SettingsError {
    SettingsError::InvalidSetting {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
