//! The playlist store: owner of the one live document.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::models::{Assignment, PlaylistDocument, PlaylistEntry, ThumbnailRef};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from playlist store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The playlist file could not be read.
    #[error("failed to read playlist: {0}")]
    Read(#[source] std::io::Error),
    /// The content was not a valid playlist document.
    #[error("invalid playlist format: {0}")]
    Parse(String),
    /// The document parsed but carries no items.
    #[error("no items in the playlist")]
    EmptyPlaylist,
    /// The operation needs a loaded playlist and none is.
    #[error("no playlist loaded")]
    NotLoaded,
    /// The document could not be written back to disk.
    #[error("failed to write playlist: {0}")]
    Write(#[source] std::io::Error),
}

/// Exclusive owner of the currently loaded playlist document.
///
/// At most one document is live at a time; a successful `load` fully
/// supersedes the previous one, and a failed `load` leaves it
/// untouched. Nothing else in the crate mutates playlist state: the
/// orchestrator hands the final assignment back through
/// `apply_assignment` and the exporter only reads entries.
#[derive(Debug, Default)]
pub struct PlaylistStore {
    document: Option<PlaylistDocument>,
}

impl PlaylistStore {
    /// Create a store with no document loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a document is currently loaded.
    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    /// The live document, if any.
    pub fn document(&self) -> Option<&PlaylistDocument> {
        self.document.as_ref()
    }

    /// The live document's entries, if any.
    pub fn entries(&self) -> Option<&[PlaylistEntry]> {
        self.document.as_ref().map(|d| d.items.as_slice())
    }

    /// Snapshot of entry labels for a match run.
    pub fn labels(&self) -> Option<Vec<String>> {
        self.document.as_ref().map(|d| d.labels())
    }

    /// Load a playlist file, replacing any previous document.
    ///
    /// Every entry comes up with its thumbnail unset, whatever the file
    /// said.
    pub fn load(&mut self, path: &Path) -> StoreResult<&PlaylistDocument> {
        tracing::info!("Loading playlist from {}", path.display());
        let content = fs::read_to_string(path).map_err(StoreError::Read)?;
        self.load_from_str(&content)
    }

    /// Load a playlist from already-read content.
    pub fn load_from_str(&mut self, content: &str) -> StoreResult<&PlaylistDocument> {
        let mut document: PlaylistDocument =
            serde_json::from_str(content).map_err(|e| StoreError::Parse(e.to_string()))?;
        if document.items.is_empty() {
            return Err(StoreError::EmptyPlaylist);
        }

        document.clear_thumbnails();
        tracing::info!(
            "Loaded playlist '{}' with {} entries",
            document.name,
            document.items.len()
        );
        Ok(self.document.insert(document))
    }

    /// Clear the thumbnail on every entry. Idempotent.
    pub fn reset(&mut self) -> StoreResult<&PlaylistDocument> {
        let Some(document) = self.document.as_mut() else {
            return Err(StoreError::NotLoaded);
        };
        document.clear_thumbnails();
        Ok(document)
    }

    /// Write the current entries to disk as `{name: title, items}`.
    ///
    /// Returns `Ok(false)` without writing when no destination was
    /// given (a dismissed file chooser, not an error). The write is
    /// atomic: a temp file next to the target, then a rename.
    pub fn save(&self, path: Option<&Path>, title: &str) -> StoreResult<bool> {
        let Some(document) = self.document.as_ref() else {
            return Err(StoreError::NotLoaded);
        };
        let Some(path) = path else {
            return Ok(false);
        };

        let out = PlaylistDocument::new(title, document.items.clone());
        let json = serde_json::to_string_pretty(&out).map_err(|e| {
            StoreError::Write(std::io::Error::new(std::io::ErrorKind::Other, e))
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(StoreError::Write)?;
        }

        // Write atomically via temp file
        let temp_file = path.with_extension("lpl.tmp");
        fs::write(&temp_file, &json).map_err(StoreError::Write)?;
        fs::rename(&temp_file, path).map_err(StoreError::Write)?;

        tracing::info!(
            "Saved playlist '{}' ({} entries) to {}",
            title,
            out.items.len(),
            path.display()
        );
        Ok(true)
    }

    /// Write a completed assignment into the live entries.
    ///
    /// Each slot sets or clears its entry's thumbnail; slots pointing
    /// past the end of the document are skipped with a warning.
    pub fn apply_assignment(&mut self, assignment: &Assignment) -> StoreResult<&[PlaylistEntry]> {
        let Some(document) = self.document.as_mut() else {
            return Err(StoreError::NotLoaded);
        };

        for slot in assignment.slots() {
            let Some(entry) = document.items.get_mut(slot.entry_index) else {
                tracing::warn!("Assignment covers entry {} which is out of range", slot.entry_index);
                continue;
            };
            entry.thumbnail = slot
                .candidate_filename
                .as_deref()
                .map(ThumbnailRef::from_candidate);
        }

        Ok(&document.items)
    }
}
