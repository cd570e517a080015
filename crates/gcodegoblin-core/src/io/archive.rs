//! 3MF project archives
//!
//! The archive is handled in two scoped passes: the toolpath entry is read
//! and the archive closed, then the source is reopened and copied entry by
//! entry into the new archive. Entries are copied raw so their bytes and
//! metadata are unchanged. A failed write leaves no output file behind.

use super::{split_lines, FileKind, Layout, ProcessOutcome};
use crate::checksum::{sidecar_name, Checksum};
use crate::error::{ArchiveError, Result};
use crate::rewriter::rewrite_lines;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Toolpath extracted from an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolpathEntry {
    /// Entry name inside the archive
    pub name: String,
    /// Entry text split into lines
    pub lines: Vec<String>,
}

/// Name of the toolpath entry, if any.
///
/// The first qualifying entry in archive order wins.
pub fn find_toolpath_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    layout: &Layout,
) -> Result<Option<String>> {
    let mut found: Option<String> = None;
    for index in 0..archive.len() {
        let file = archive.by_index_raw(index)?;
        if !layout.is_toolpath_entry(file.name()) {
            continue;
        }
        if found.is_none() {
            found = Some(file.name().to_string());
        } else {
            tracing::warn!("Ignoring extra toolpath entry {}", file.name());
        }
    }
    Ok(found)
}

/// Read the toolpath entry of the archive at `path`
pub fn read_toolpath(path: &Path, layout: &Layout) -> Result<ToolpathEntry> {
    let mut archive = ZipArchive::new(File::open(path)?)?;

    let name = find_toolpath_entry(&mut archive, layout)?.ok_or_else(|| {
        ArchiveError::ToolpathEntryNotFound {
            archive: path.to_path_buf(),
            directory: layout.metadata_dir.clone(),
            extension: layout.toolpath_extension.clone(),
        }
    })?;

    let mut bytes = Vec::new();
    archive.by_name(&name)?.read_to_end(&mut bytes)?;
    let text = String::from_utf8(bytes).map_err(|e| ArchiveError::InvalidEncoding {
        entry: name.clone(),
        reason: e.to_string(),
    })?;

    tracing::debug!("Read entry {} ({} bytes)", name, text.len());

    Ok(ToolpathEntry {
        lines: split_lines(&text),
        name,
    })
}

/// Write a copy of `source` to `destination` with the toolpath replaced.
///
/// Every other entry is copied unchanged except checksum sidecars, which are
/// dropped; a fresh sidecar holding `checksum` is written after the toolpath.
pub fn write_fixed_archive(
    source: &Path,
    destination: &Path,
    entry_name: &str,
    content: &str,
    checksum: &Checksum,
    layout: &Layout,
) -> Result<()> {
    let mut archive = ZipArchive::new(File::open(source)?)?;

    // Staged next to the destination and renamed into place only once complete.
    let directory = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut writer = ZipWriter::new(NamedTempFile::new_in(directory)?);

    for index in 0..archive.len() {
        let file = archive.by_index_raw(index)?;
        if file.name() == entry_name {
            continue;
        }
        if layout.is_checksum_entry(file.name()) {
            tracing::debug!("Dropping stale checksum entry {}", file.name());
            continue;
        }
        tracing::debug!("Copying entry {}", file.name());
        writer.raw_copy_file(file)?;
    }

    writer.start_file(entry_name, entry_options())?;
    writer.write_all(content.as_bytes())?;

    writer.start_file(
        sidecar_name(entry_name, &layout.checksum_extension),
        entry_options(),
    )?;
    writer.write_all(checksum.to_hex().as_bytes())?;

    writer
        .finish()?
        .persist(destination)
        .map_err(|e| e.error)?;
    Ok(())
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// Rewrite the toolpath inside `input` into a new archive at `output`
pub fn process_archive(input: &Path, output: &Path, layout: &Layout) -> Result<ProcessOutcome> {
    let entry = read_toolpath(input, layout)?;
    tracing::info!("Found toolpath entry {} ({} lines)", entry.name, entry.lines.len());

    let rewrite = rewrite_lines(&entry.lines)?;
    let content = rewrite.joined();
    let checksum = Checksum::of(&content);

    write_fixed_archive(input, output, &entry.name, &content, &checksum, layout)?;

    tracing::info!("Wrote {} (md5 {})", output.display(), checksum);

    Ok(ProcessOutcome {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        kind: FileKind::Archive,
        entry: Some(entry.name),
        checksum,
        stats: rewrite.stats,
    })
}
