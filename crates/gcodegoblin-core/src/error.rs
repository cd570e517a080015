//! Error handling for GCodeGoblin
//!
//! Provides error types for each layer of the tool:
//! - Directive errors (malformed directive lines)
//! - Archive errors (project archive layout and encoding)
//! - Usage errors (unsupported input files)
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Directive error type
///
/// Raised while interpreting directive comment lines. The rewriting pass
/// itself is total for well-formed directives; these only surface when a
/// directive that needs an argument cannot be split.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    /// Directive line has no argument delimiter
    #[error("Malformed {directive} directive at line {line_number}: missing ':' in {line:?}")]
    Malformed {
        /// The 1-based line number of the offending line.
        line_number: usize,
        /// The directive token that matched.
        directive: String,
        /// The trimmed line text.
        line: String,
    },
}

/// Archive error type
///
/// Represents errors related to reading and rewriting 3MF project archives.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// No toolpath entry under the metadata directory
    #[error("No '*.{extension}' entry under '{directory}' in {archive}")]
    ToolpathEntryNotFound {
        /// The archive that was searched.
        archive: PathBuf,
        /// The metadata directory prefix.
        directory: String,
        /// The toolpath extension searched for.
        extension: String,
    },

    /// Toolpath entry is not valid UTF-8
    #[error("Entry '{entry}' is not valid UTF-8: {reason}")]
    InvalidEncoding {
        /// The archive entry name.
        entry: String,
        /// The decoder error.
        reason: String,
    },

    /// Underlying zip failure
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Main error type for GCodeGoblin
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Directive error
    #[error(transparent)]
    Directive(#[from] DirectiveError),

    /// Archive error
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Input file type is neither a project archive nor a toolpath
    #[error("{} is neither a .{archive_extension} nor a .{toolpath_extension} file", path.display())]
    UnsupportedFileType {
        /// The rejected path.
        path: PathBuf,
        /// Expected archive extension.
        archive_extension: String,
        /// Expected toolpath extension.
        toolpath_extension: String,
    },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this error should be reported with usage text
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Error::UnsupportedFileType { .. })
    }

    /// Check if this is a directive error
    pub fn is_directive_error(&self) -> bool {
        matches!(self, Error::Directive(_))
    }

    /// Check if this is an archive error
    pub fn is_archive_error(&self) -> bool {
        matches!(self, Error::Archive(_))
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Archive(ArchiveError::Zip(err))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
