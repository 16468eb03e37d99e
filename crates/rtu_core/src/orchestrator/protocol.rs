//! Messages crossing the worker boundary.
//!
//! The snapshot in and the event stream out are the whole interface to
//! the isolated context; the worker shares no memory with the caller.
//! Both sides are plain serializable data so the boundary could move
//! out of process without changing the contract.

use serde::{Deserialize, Serialize};

use crate::models::{Assignment, MatchOptions};

/// Snapshot dispatched to the match worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    /// Entry labels, in document order.
    pub labels: Vec<String>,
    /// Candidate filenames to match against.
    #[serde(rename = "candidateFilenames")]
    pub candidate_filenames: Vec<String>,
    /// Options for this run.
    pub options: MatchOptions,
}

/// One message in the response stream from the worker.
///
/// A stream carries any number of `Progress` events and ends with at
/// most one terminal event. A cancelled worker ends its stream without
/// a terminal event; the handle reports the cancellation itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MatchEvent {
    /// The run is underway; `ratio` of entries processed so far.
    Progress { ratio: f64 },
    /// Terminal: the run completed with this assignment.
    Done { assignment: Assignment },
    /// Terminal: the run failed.
    Error { message: String },
}

impl MatchEvent {
    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchEvent::Done { .. } | MatchEvent::Error { .. })
    }
}
