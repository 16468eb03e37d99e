//! Fuzzy label-to-filename matching.
//!
//! The engine is a pure function of its inputs: a label snapshot, a
//! candidate filename list, and options. It never touches the live
//! playlist; the orchestrator owns the write-back.
//!
//! ```
//! use rtu_core::matching::{CancelHandle, FuzzyMatcher, MatchEngine};
//! use rtu_core::models::MatchOptions;
//!
//! let labels = vec!["Contra".to_string()];
//! let candidates = vec!["contra (usa).png".to_string(), "unrelated.png".to_string()];
//!
//! let outcome = FuzzyMatcher::new()
//!     .run(&labels, &candidates, &MatchOptions::default(), &|_| {}, &CancelHandle::new())
//!     .unwrap();
//!
//! assert_eq!(outcome.assignment.candidate_for(0), Some("contra (usa).png"));
//! ```

mod candidates;
mod engine;
mod normalize;

pub use candidates::{scan_candidates, scan_image_candidates};
pub use engine::{similarity, CancelHandle, EngineError, EngineResult, FuzzyMatcher, MatchEngine};
pub use normalize::{candidate_stem, normalize};
