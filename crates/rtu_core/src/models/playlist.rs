//! Playlist data structures (documents, entries, thumbnail references).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reference to a thumbnail image on disk.
///
/// This points at a file, it does not own a copy of it. The reference is
/// only meaningful while the source file exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailRef {
    /// Path to the image file as given in the candidate list.
    #[serde(rename = "sourcePath")]
    pub source_path: String,
    /// Bare filename of the image (no directory components).
    #[serde(rename = "fileName")]
    pub file_name: String,
}

impl ThumbnailRef {
    /// Build a reference from a raw candidate string.
    ///
    /// The candidate may be a bare filename or a full path; the path is
    /// kept verbatim as the source and the trailing component becomes
    /// the filename.
    pub fn from_candidate(candidate: &str) -> Self {
        Self {
            source_path: candidate.to_string(),
            file_name: base_name(candidate).to_string(),
        }
    }
}

/// Trailing path component of a candidate string.
///
/// Candidates can use either separator style regardless of platform, so
/// both are split on.
pub(crate) fn base_name(candidate: &str) -> &str {
    match candidate.rfind(['/', '\\']) {
        Some(idx) => &candidate[idx + 1..],
        None => candidate,
    }
}

/// One game/item record inside a playlist document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// Human-readable display name, used as the match key.
    pub label: String,
    /// Path to the ROM/content file this entry launches.
    #[serde(rename = "romPath", default)]
    pub rom_path: String,
    /// Matched thumbnail, if any. Serialized as an explicit `null` when
    /// unset so round-tripped documents keep the field visible.
    #[serde(default)]
    pub thumbnail: Option<ThumbnailRef>,
    /// Any additional fields carried by the source document. Preserved
    /// verbatim through load/save round-trips.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlaylistEntry {
    /// Create an entry with just a label (test/helper constructor).
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            rom_path: String::new(),
            thumbnail: None,
            extra: Map::new(),
        }
    }
}

/// A full playlist document: a name plus an ordered list of entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistDocument {
    /// Display name of the playlist.
    #[serde(default)]
    pub name: String,
    /// Entries in document order. A document without an `items` field
    /// parses as empty; the store treats that the same as `items: []`.
    #[serde(default)]
    pub items: Vec<PlaylistEntry>,
}

impl PlaylistDocument {
    /// Create a document from a name and entries.
    pub fn new(name: impl Into<String>, items: Vec<PlaylistEntry>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    /// Labels of all entries, in document order.
    pub fn labels(&self) -> Vec<String> {
        self.items.iter().map(|e| e.label.clone()).collect()
    }

    /// Clear the thumbnail on every entry.
    pub fn clear_thumbnails(&mut self) {
        for entry in &mut self.items {
            entry.thumbnail = None;
        }
    }
}
