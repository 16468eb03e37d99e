//! Orchestration of match runs on an isolated worker thread.
//!
//! This module owns everything between "start a match" and "the result
//! is in the playlist": spawning the worker, streaming progress,
//! enforcing single-flight, and guaranteeing the worker is torn down on
//! every exit path (completion, failure, cancellation, panic, or an
//! abandoned handle).
//!
//! # Architecture
//!
//! ```text
//! MatchOrchestrator::begin_match
//!     │  snapshot {labels, candidateFilenames, options}
//!     ▼
//! match-worker thread ── MatchEngine::run
//!     │  MatchEvent stream (progress .. done | error)
//!     ▼
//! MatchHandle::wait ── write-back into PlaylistStore
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rtu_core::orchestrator::MatchOrchestrator;
//!
//! let orchestrator = MatchOrchestrator::new();
//! let handle = orchestrator.begin_match(&store, candidates, options)?;
//! let entries = handle.wait(&mut store, |ratio| bar.set_ratio(ratio))?;
//! ```

mod errors;
mod protocol;
mod runner;

pub use errors::{MatchError, MatchResult};
pub use protocol::{MatchEvent, MatchRequest};
pub use runner::{MatchHandle, MatchOrchestrator};
