//! # GCodeGoblin Core
//!
//! Directive-driven rewriting of G-code toolpaths.
//! Provides the directive detector, the single-pass rewriter, MD5 checksums
//! and I/O for plain toolpaths and 3MF project archives.

pub mod checksum;
pub mod directive;
pub mod error;
pub mod io;
pub mod rewriter;

pub use checksum::{sidecar_name, Checksum};
pub use directive::{detect, parse_buffer_name, Directive};
pub use error::{ArchiveError, DirectiveError, Error, Result};
pub use io::{fixed_output_path, process_file, FileKind, Layout, ProcessOutcome};
pub use rewriter::{rewrite_lines, Rewrite, RewriteStats, Rewriter, RewriterState};
