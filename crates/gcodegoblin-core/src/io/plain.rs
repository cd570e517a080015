//! Plain toolpath files

use super::{split_lines, FileKind, ProcessOutcome};
use crate::error::Result;
use crate::rewriter::rewrite_lines;
use std::fs;
use std::path::Path;

/// Read the lines of a toolpath file
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(split_lines(&content))
}

/// Rewrite `input` into `output`.
///
/// The output is the rewritten lines joined with `\n`, the same text the
/// checksum is computed over.
pub fn process_toolpath(input: &Path, output: &Path) -> Result<ProcessOutcome> {
    let lines = read_lines(input)?;
    tracing::debug!("Read {} lines from {}", lines.len(), input.display());

    let rewrite = rewrite_lines(&lines)?;
    let content = rewrite.joined();
    let checksum = rewrite.checksum();
    fs::write(output, &content)?;

    tracing::info!(
        "Wrote {} lines to {} (md5 {})",
        rewrite.lines.len(),
        output.display(),
        checksum
    );

    Ok(ProcessOutcome {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        kind: FileKind::Toolpath,
        entry: None,
        checksum,
        stats: rewrite.stats,
    })
}
