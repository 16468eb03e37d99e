//! Copying matched thumbnails out under sanitized names.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::models::PlaylistEntry;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors from thumbnail export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The destination directory could not be created.
    #[error("failed to create destination '{path}': {source}")]
    CreateDir {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A copy failed. Earlier copies are left in place.
    #[error("failed to copy '{source_file}' to '{destination}': {source}")]
    Copy {
        source_file: String,
        destination: String,
        #[source]
        source: io::Error,
    },
}

/// Replace characters that are hostile to filesystems or shells with
/// underscores.
///
/// The replaced set is `` & * / : ` < > ? | ``; everything else,
/// backslashes included, passes through untouched.
pub fn sanitize(label: &str) -> String {
    label
        .chars()
        .map(|ch| match ch {
            '&' | '*' | '/' | ':' | '`' | '<' | '>' | '?' | '|' => '_',
            _ => ch,
        })
        .collect()
}

/// The final dot-suffix of a filename, dot included.
///
/// Empty when the name has no extension; a leading dot is part of the
/// name, not a suffix.
pub fn extension_of(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[idx..],
        _ => "",
    }
}

/// Copy every matched thumbnail into `destination_dir`.
///
/// Entries without a thumbnail are skipped. Copies run sequentially in
/// document order; `on_each_copied` fires once per initiated copy,
/// before the copy is confirmed. Best-effort and non-transactional:
/// the first failure aborts the batch and files already copied stay in
/// place. The destination directory is created if missing. Returns the
/// number of files copied.
pub fn export_thumbnails(
    entries: &[PlaylistEntry],
    destination_dir: &Path,
    mut on_each_copied: impl FnMut(),
) -> ExportResult<usize> {
    fs::create_dir_all(destination_dir).map_err(|e| ExportError::CreateDir {
        path: destination_dir.display().to_string(),
        source: e,
    })?;

    let mut copied = 0usize;
    for entry in entries {
        let Some(thumbnail) = entry.thumbnail.as_ref() else {
            continue;
        };

        let file_name = format!(
            "{}{}",
            sanitize(&entry.label),
            extension_of(&thumbnail.file_name)
        );
        let destination = destination_dir.join(&file_name);

        on_each_copied();
        fs::copy(&thumbnail.source_path, &destination).map_err(|e| ExportError::Copy {
            source_file: thumbnail.source_path.clone(),
            destination: destination.display().to_string(),
            source: e,
        })?;
        copied += 1;
    }

    tracing::info!(
        "Exported {} thumbnails to {}",
        copied,
        destination_dir.display()
    );
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThumbnailRef;
    use tempfile::tempdir;

    fn entry_with_thumbnail(label: &str, source_path: &Path, file_name: &str) -> PlaylistEntry {
        let mut entry = PlaylistEntry::new(label);
        entry.thumbnail = Some(ThumbnailRef {
            source_path: source_path.display().to_string(),
            file_name: file_name.to_string(),
        });
        entry
    }

    #[test]
    fn sanitize_matches_the_documented_example() {
        assert_eq!(
            sanitize("Sonic & Knuckles: Ultra/Best"),
            "Sonic _ Knuckles_ Ultra_Best"
        );
    }

    #[test]
    fn sanitize_replaces_each_reserved_character() {
        assert_eq!(sanitize("&*/:`<>?|"), "_________");
        // Backslashes and ordinary punctuation pass through.
        assert_eq!(sanitize("a\\b (v1.1)"), "a\\b (v1.1)");
    }

    #[test]
    fn extension_of_cases() {
        assert_eq!(extension_of("a.png"), ".png");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of(".hidden"), "");
    }

    #[test]
    fn exports_matched_entries_byte_for_byte() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.png");
        std::fs::write(&source, b"PNGDATA").unwrap();

        let entries = vec![
            entry_with_thumbnail("Contra", &source, "a.png"),
            PlaylistEntry::new("Unmatched"),
        ];
        let out = dir.path().join("nested").join("out");

        let mut callbacks = 0;
        let copied = export_thumbnails(&entries, &out, || callbacks += 1).unwrap();

        assert_eq!(copied, 1);
        assert_eq!(callbacks, 1);
        assert_eq!(std::fs::read(out.join("Contra.png")).unwrap(), b"PNGDATA");
    }

    #[test]
    fn sanitized_label_names_the_destination() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("src.jpg");
        std::fs::write(&source, b"JPG").unwrap();

        let entries = vec![entry_with_thumbnail("Sonic & Knuckles: Ultra/Best", &source, "src.jpg")];
        let out = dir.path().join("out");
        export_thumbnails(&entries, &out, || {}).unwrap();

        assert!(out.join("Sonic _ Knuckles_ Ultra_Best.jpg").exists());
    }

    #[test]
    fn first_failure_aborts_and_keeps_earlier_copies() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.png");
        std::fs::write(&good, b"G").unwrap();
        let missing = dir.path().join("missing.png");

        let entries = vec![
            entry_with_thumbnail("First", &good, "good.png"),
            entry_with_thumbnail("Second", &missing, "missing.png"),
            entry_with_thumbnail("Third", &good, "good.png"),
        ];
        let out = dir.path().join("out");

        let mut callbacks = 0;
        let result = export_thumbnails(&entries, &out, || callbacks += 1);

        assert!(matches!(result, Err(ExportError::Copy { .. })));
        // The callback fired for both initiated copies, the batch
        // stopped before the third.
        assert_eq!(callbacks, 2);
        assert!(out.join("First.png").exists());
        assert!(!out.join("Third.png").exists());
    }

    #[test]
    fn empty_entry_list_still_creates_the_destination() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let copied = export_thumbnails(&[], &out, || {}).unwrap();
        assert_eq!(copied, 0);
        assert!(out.is_dir());
    }
}
