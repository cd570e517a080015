//! GCodeGoblin Settings Crate
//!
//! Handles configuration files: archive layout conventions and logging
//! defaults, stored as TOML or JSON.

pub mod config;
pub mod error;

pub use config::{default_config_path, Config, LogLevel, LoggingSettings};
pub use error::{SettingsError, SettingsResult};
pub use gcodegoblin_core::Layout;
