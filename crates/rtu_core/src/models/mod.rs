//! Data models for the thumbnail updater.
//!
//! This module contains the core data structures used throughout the crate:
//! - Playlist structures (documents, entries, thumbnail references)
//! - Matching structures (options, assignments, diagnostics)

mod matching;
mod playlist;

// Re-export all public types
pub use matching::{
    Assignment, AssignmentSlot, MatchDiagnostics, MatchOptions, MatchOutcome, NormalizeRule,
    Suggestion,
};
pub use playlist::{PlaylistDocument, PlaylistEntry, ThumbnailRef};

pub(crate) use playlist::base_name;
