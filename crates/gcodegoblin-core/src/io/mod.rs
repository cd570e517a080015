//! File I/O for toolpaths and project archives
//!
//! Two input kinds are supported:
//! - Project archives (`.3mf`): the toolpath lives under `Metadata/` and is
//!   guarded by an MD5 sidecar entry.
//! - Plain toolpaths (`.gcode`).
//!
//! Output always goes to a sibling file with a `.fixed` infix, e.g.
//! `benchy.3mf` becomes `benchy.fixed.3mf`.

pub mod archive;
pub mod plain;

use crate::checksum::Checksum;
use crate::error::{Error, Result};
use crate::rewriter::RewriteStats;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Naming conventions for inputs, archive entries and outputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Extension of project archives, without the dot
    pub archive_extension: String,
    /// Extension of toolpath files and entries, without the dot
    pub toolpath_extension: String,
    /// Archive directory holding the toolpath entry, with trailing `/`
    pub metadata_dir: String,
    /// Extension of checksum sidecar entries, without the dot
    pub checksum_extension: String,
    /// Infix inserted before the extension of output files
    pub fixed_marker: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            archive_extension: "3mf".to_string(),
            toolpath_extension: "gcode".to_string(),
            metadata_dir: "Metadata/".to_string(),
            checksum_extension: "md5".to_string(),
            fixed_marker: "fixed".to_string(),
        }
    }
}

impl Layout {
    /// Whether an archive entry name is the toolpath
    pub fn is_toolpath_entry(&self, name: &str) -> bool {
        name.starts_with(&self.metadata_dir)
            && name.ends_with(&format!(".{}", self.toolpath_extension))
    }

    /// Whether an archive entry name is a checksum sidecar
    pub fn is_checksum_entry(&self, name: &str) -> bool {
        name.ends_with(&format!(".{}", self.checksum_extension))
    }
}

/// Kind of input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Project archive containing a toolpath entry
    Archive,
    /// Plain toolpath text file
    Toolpath,
}

impl FileKind {
    /// Detect the kind of `path` from its file name suffix
    pub fn detect(path: &Path, layout: &Layout) -> Result<Self> {
        let name = path.to_string_lossy();
        if name.ends_with(&format!(".{}", layout.archive_extension)) {
            Ok(Self::Archive)
        } else if name.ends_with(&format!(".{}", layout.toolpath_extension)) {
            Ok(Self::Toolpath)
        } else {
            Err(Error::UnsupportedFileType {
                path: path.to_path_buf(),
                archive_extension: layout.archive_extension.clone(),
                toolpath_extension: layout.toolpath_extension.clone(),
            })
        }
    }

    /// Extension handled by this kind
    pub fn extension(self, layout: &Layout) -> &str {
        match self {
            Self::Archive => &layout.archive_extension,
            Self::Toolpath => &layout.toolpath_extension,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archive => write!(f, "archive"),
            Self::Toolpath => write!(f, "toolpath"),
        }
    }
}

/// Derive the output path: `dir/name.ext` becomes `dir/name.<marker>.ext`.
///
/// Only the final extension is rewritten.
pub fn fixed_output_path(path: &Path, extension: &str, layout: &Layout) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = format!(".{}", extension);
    let stem = name.strip_suffix(&suffix).unwrap_or(&name);
    path.with_file_name(format!("{}.{}{}", stem, layout.fixed_marker, suffix))
}

/// Split text into lines on `\n`, `\r\n` and lone `\r`.
///
/// A trailing terminator does not produce an empty final line.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(|c| c == '\r' || c == '\n') {
            Some(end) => {
                lines.push(rest[..end].to_string());
                let width = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + width..];
            }
            None => {
                lines.push(rest.to_string());
                break;
            }
        }
    }
    lines
}

/// Summary of one processed file
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// Input path
    pub input: PathBuf,
    /// Output path written
    pub output: PathBuf,
    /// Input kind
    pub kind: FileKind,
    /// Rewritten archive entry, for archives
    pub entry: Option<String>,
    /// Checksum of the rewritten toolpath text
    pub checksum: Checksum,
    /// Rewriter counters
    pub stats: RewriteStats,
}

/// Rewrite `input`, writing to `output` or to the derived `.fixed` path
pub fn process_file(input: &Path, output: Option<&Path>, layout: &Layout) -> Result<ProcessOutcome> {
    let kind = FileKind::detect(input, layout)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| fixed_output_path(input, kind.extension(layout), layout));

    if output == input {
        return Err(Error::other(format!(
            "Refusing to overwrite input file {}",
            input.display()
        )));
    }

    tracing::info!("Processing {} {} -> {}", kind, input.display(), output.display());

    match kind {
        FileKind::Archive => archive::process_archive(input, &output, layout),
        FileKind::Toolpath => plain::process_toolpath(input, &output),
    }
}
