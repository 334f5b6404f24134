//! ZIP packaging of viewer snapshots.

use std::collections::HashMap;
use std::io::{Cursor, Write};

use esi_model::SessionId;
use esi_viewer::Snapshot;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::error::{ExportError, Result};

/// Filename of the image archive for a session.
#[must_use]
pub fn archive_filename(session: &SessionId) -> String {
    format!("{session}_images.zip")
}

/// Entry names for `snapshots`, in order.
///
/// Each entry is `{display_name}.png`; a repeated name gets a ` (n)` suffix so
/// no entry is overwritten.
#[must_use]
pub fn entry_names(snapshots: &[Snapshot]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    snapshots
        .iter()
        .map(|snapshot| {
            let stem = sanitize(&snapshot.display_name);
            let count = seen.entry(stem.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                format!("{stem}.png")
            } else {
                format!("{stem} ({count}).png")
            }
        })
        .collect()
}

/// Build a ZIP holding one PNG per snapshot.
///
/// An empty input yields a valid, empty archive.
pub fn build_archive(snapshots: &[Snapshot]) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));

    for (name, snapshot) in entry_names(snapshots).into_iter().zip(snapshots) {
        tracing::debug!(entry = %name, bytes = snapshot.png.len(), "Adding archive entry");
        zip.start_file(name, options)?;
        zip.write_all(&snapshot.png)
            .map_err(|e| ExportError::Archive(e.to_string()))?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Entry names stay flat: path separators are replaced.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    if cleaned.trim().is_empty() {
        "molecule".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::ZipArchive;

    fn snapshot(name: &str, png: &[u8]) -> Snapshot {
        Snapshot {
            display_name: name.to_string(),
            png: png.to_vec(),
        }
    }

    fn read_entries(bytes: Vec<u8>) -> Vec<(String, Vec<u8>)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut data = Vec::new();
                std::io::Read::read_to_end(&mut file, &mut data).unwrap();
                (file.name().to_string(), data)
            })
            .collect()
    }

    #[test]
    fn test_archive_filename() {
        let session: SessionId = "0b4e7a0e-5b1c-4a5e-9f1a-2d3c4b5a6f70".parse().unwrap();
        assert_eq!(
            archive_filename(&session),
            "0b4e7a0e-5b1c-4a5e-9f1a-2d3c4b5a6f70_images.zip"
        );
    }

    #[test]
    fn test_entries_keep_order_and_bytes() {
        let bytes = build_archive(&[snapshot("water", b"w"), snapshot("benzene", b"b")]).unwrap();
        assert_eq!(
            read_entries(bytes),
            vec![
                ("water.png".to_string(), b"w".to_vec()),
                ("benzene.png".to_string(), b"b".to_vec()),
            ]
        );
    }

    #[test]
    fn test_empty_archive_is_valid() {
        let bytes = build_archive(&[]).unwrap();
        assert!(read_entries(bytes).is_empty());
    }

    #[test]
    fn test_duplicate_and_unsafe_names() {
        let names = entry_names(&[
            snapshot("a", b""),
            snapshot("a", b""),
            snapshot("dir/b", b""),
            snapshot(" ", b""),
        ]);
        assert_eq!(names, vec!["a.png", "a (2).png", "dir_b.png", "molecule.png"]);
    }
}
