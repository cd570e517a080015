use gcodegoblin_core::io::archive::{read_toolpath, write_fixed_archive};
use gcodegoblin_core::{process_file, ArchiveError, Checksum, Error, FileKind, Layout};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

const TOOLPATH: &str = "G28\n; START_COPY:wipe\nG1 X10\nG1 X20\n; STOP_COPY:wipe\n; START_CUT\nM106 S255\n; STOP_CUT\n; PASTE:wipe\nM400\n";

fn build_archive(path: &Path, entries: &[(&str, &str)]) {
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    for (name, content) in entries {
        writer
            .start_file(name.to_string(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

fn read_entry(path: &Path, name: &str) -> String {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

fn entry_names(path: &Path) -> Vec<String> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

#[test]
fn test_process_archive_end_to_end() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("benchy.3mf");
    build_archive(
        &input,
        &[
            ("3D/3dmodel.model", "<model/>"),
            ("Metadata/plate_1.gcode", TOOLPATH),
            ("Metadata/plate_1.gcode.md5", "stale"),
            ("Metadata/plate_1.png", "png-bytes"),
        ],
    );

    let outcome = process_file(&input, None, &Layout::default()).unwrap();
    assert_eq!(outcome.kind, FileKind::Archive);
    assert_eq!(outcome.output, dir.path().join("benchy.fixed.3mf"));
    assert_eq!(outcome.entry.as_deref(), Some("Metadata/plate_1.gcode"));
    assert_eq!(outcome.stats.pastes, 1);
    assert_eq!(outcome.stats.lines_cut, 2);

    let gcode = read_entry(&outcome.output, "Metadata/plate_1.gcode");
    let expected = [
        "G28",
        "; START_COPY:wipe",
        "; starting to copy into buffer wipe",
        "G1 X10",
        "G1 X20",
        "; STOP_COPY:wipe",
        "; stopping copy into buffer wipe",
        "; START_CUT",
        "; CUT START",
        "; CUT STOPPED",
        "; PASTE:wipe",
        "; pasting from buffer wipe into output:",
        "G1 X10",
        "G1 X20",
        "; END OF PASTE BUFFER",
        "M400",
    ]
    .join("\n");
    assert_eq!(gcode, expected);

    let md5 = read_entry(&outcome.output, "Metadata/plate_1.gcode.md5");
    assert_eq!(md5, Checksum::of(&expected).to_hex());
    assert_eq!(md5, outcome.checksum.to_hex());

    let names = entry_names(&outcome.output);
    assert_eq!(
        names,
        vec![
            "3D/3dmodel.model",
            "Metadata/plate_1.png",
            "Metadata/plate_1.gcode",
            "Metadata/plate_1.gcode.md5",
        ]
    );
    assert_eq!(read_entry(&outcome.output, "3D/3dmodel.model"), "<model/>");
    assert_eq!(read_entry(&outcome.output, "Metadata/plate_1.png"), "png-bytes");

    // Source archive is untouched
    assert_eq!(read_entry(&input, "Metadata/plate_1.gcode.md5"), "stale");
}

#[test]
fn test_archive_without_toolpath() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("empty.3mf");
    build_archive(&input, &[("plate_1.gcode", "G28"), ("Metadata/model.config", "")]);

    let err = process_file(&input, None, &Layout::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::Archive(ArchiveError::ToolpathEntryNotFound { .. })
    ));
    assert!(!dir.path().join("empty.fixed.3mf").exists());
}

#[test]
fn test_first_toolpath_entry_wins() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("multi.3mf");
    build_archive(
        &input,
        &[
            ("Metadata/plate_2.gcode", "G1 X2"),
            ("Metadata/plate_1.gcode", "G1 X1"),
        ],
    );

    let entry = read_toolpath(&input, &Layout::default()).unwrap();
    assert_eq!(entry.name, "Metadata/plate_2.gcode");
    assert_eq!(entry.lines, vec!["G1 X2"]);
}

#[test]
fn test_cr_only_archive_entry() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("classic.3mf");
    build_archive(
        &input,
        &[("Metadata/plate_1.gcode", "G28\r; START_CUT\rG1 X1\r; STOP_CUT\rG1 X2")],
    );

    let entry = read_toolpath(&input, &Layout::default()).unwrap();
    assert_eq!(entry.lines.len(), 5);

    let outcome = process_file(&input, None, &Layout::default()).unwrap();
    assert_eq!(
        read_entry(&outcome.output, "Metadata/plate_1.gcode"),
        "G28\n; START_CUT\n; CUT START\n; CUT STOPPED\nG1 X2"
    );
}

#[test]
fn test_failed_copy_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.3mf");
    let output = dir.path().join("broken.fixed.3mf");
    build_archive(
        &input,
        &[("3D/3dmodel.model", "<model/>"), ("Metadata/plate_1.gcode", "G28")],
    );

    // Damage the local header of the first entry; the central directory stays readable.
    let mut bytes = std::fs::read(&input).unwrap();
    bytes[..4].copy_from_slice(b"XXXX");
    std::fs::write(&input, bytes).unwrap();

    let result = write_fixed_archive(
        &input,
        &output,
        "Metadata/plate_1.gcode",
        "G28",
        &Checksum::of("G28"),
        &Layout::default(),
    );
    assert!(result.is_err());
    assert!(!output.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_invalid_utf8_entry() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("binary.3mf");
    let mut writer = ZipWriter::new(File::create(&input).unwrap());
    writer
        .start_file("Metadata/plate_1.gcode", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(&[0xff, 0xfe, 0x00]).unwrap();
    writer.finish().unwrap();

    let err = read_toolpath(&input, &Layout::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::Archive(ArchiveError::InvalidEncoding { .. })
    ));
}

#[test]
fn test_custom_layout() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("job.3mf");
    build_archive(
        &input,
        &[("Plates/a.nc", "; PASTE:none"), ("Plates/a.nc.sha", "old")],
    );
    let layout = Layout {
        metadata_dir: "Plates/".to_string(),
        toolpath_extension: "nc".to_string(),
        checksum_extension: "sha".to_string(),
        ..Layout::default()
    };
    let output = dir.path().join("out.3mf");

    let outcome = process_file(&input, Some(&output), &layout).unwrap();
    assert_eq!(outcome.output, output);
    assert_eq!(outcome.stats.unknown_pastes, vec!["none"]);
    assert_eq!(entry_names(&output), vec!["Plates/a.nc", "Plates/a.nc.sha"]);
    assert_eq!(read_entry(&output, "Plates/a.nc"), "; PASTE:none");
}

#[test]
fn test_write_fixed_archive_replaces_entry() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.3mf");
    let output = dir.path().join("out.3mf");
    build_archive(&input, &[("Metadata/plate_1.gcode", "old")]);

    let checksum = Checksum::of("new");
    write_fixed_archive(
        &input,
        &output,
        "Metadata/plate_1.gcode",
        "new",
        &checksum,
        &Layout::default(),
    )
    .unwrap();

    assert_eq!(read_entry(&output, "Metadata/plate_1.gcode"), "new");
    assert_eq!(
        read_entry(&output, "Metadata/plate_1.gcode.md5"),
        checksum.to_hex()
    );
}
