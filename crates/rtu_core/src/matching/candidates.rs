//! Candidate discovery: directory scans that feed the matcher.
//!
//! The matcher itself accepts any candidate list; this module is how
//! the front-end builds one from a thumbnails directory.

use std::io;
use std::path::Path;

/// Extensions treated as thumbnail images by `scan_image_candidates`.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp"];

/// List every plain file name in a directory, sorted.
///
/// Not recursive. Directory order from the OS is unspecified, so the
/// names are sorted before returning. Names that are not valid UTF-8
/// cannot travel as candidate strings and are skipped with a warning.
pub fn scan_candidates(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => {
                tracing::warn!("Skipping non-UTF-8 filename: {}", name.to_string_lossy());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// List image filenames in a directory, sorted.
pub fn scan_image_candidates(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = scan_candidates(dir)?;
    names.retain(|name| has_image_extension(name));
    Ok(names)
}

fn has_image_extension(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => IMAGE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known)),
        _ => false,
    }
}
