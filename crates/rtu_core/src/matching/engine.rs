//! The fuzzy matching engine: scoring, thresholding, and greedy
//! assignment resolution.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use super::normalize::{candidate_stem, normalize};
use crate::models::{Assignment, MatchDiagnostics, MatchOptions, MatchOutcome, Suggestion};

/// Result type for engine runs.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by a matching engine run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The run observed its cancel flag and stopped early.
    #[error("match run cancelled")]
    Cancelled,
    /// The engine hit an internal fault.
    #[error("{0}")]
    Failed(String),
}

impl EngineError {
    /// Create a failure with a message.
    pub fn failed(message: impl Into<String>) -> Self {
        EngineError::Failed(message.into())
    }
}

/// Handle for cancelling a running match.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Create a fresh, un-cancelled handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    ///
    /// The engine stops at the next entry boundary.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// A matching engine: scores labels against candidate filenames and
/// resolves an assignment.
///
/// Implementations must be deterministic for a given input, report
/// progress through the callback at least once per entry, and check the
/// cancel handle often enough to stop promptly.
pub trait MatchEngine: Send + Sync {
    /// Run one match over a snapshot of labels and candidates.
    fn run(
        &self,
        labels: &[String],
        candidates: &[String],
        options: &MatchOptions,
        progress: &dyn Fn(f64),
        cancel: &CancelHandle,
    ) -> EngineResult<MatchOutcome>;
}

/// Similarity between two already-normalized strings, in `[0, 1]`.
///
/// Normalized Levenshtein: symmetric, deterministic, and 1.0 for equal
/// inputs. Empty strings are unmatchable and score 0 against
/// everything, including each other.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(a, b)
}

/// One (entry, candidate) pair that survived the threshold.
struct ScoredPair<'a> {
    entry_index: usize,
    candidate_index: usize,
    score: f64,
    normalized_candidate: &'a str,
}

/// The default engine: normalized-Levenshtein scoring with a global
/// greedy assignment.
///
/// Assignment is globally unique: the full pair list is sorted by
/// confidence and walked once, so each candidate lands on at most one
/// entry and the strongest pairings win.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyMatcher;

impl FuzzyMatcher {
    /// Create a matcher.
    pub fn new() -> Self {
        Self
    }
}

impl MatchEngine for FuzzyMatcher {
    fn run(
        &self,
        labels: &[String],
        candidates: &[String],
        options: &MatchOptions,
        progress: &dyn Fn(f64),
        cancel: &CancelHandle,
    ) -> EngineResult<MatchOutcome> {
        let rules = &options.normalize;
        let normalized_candidates: Vec<String> = candidates
            .iter()
            .map(|c| normalize(candidate_stem(c), rules))
            .collect();

        let total = labels.len();
        let mut pairs: Vec<ScoredPair> = Vec::new();

        for (entry_index, label) in labels.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(EngineError::Cancelled);
            }

            let normalized_label = normalize(label, rules);
            if !normalized_label.is_empty() {
                for (candidate_index, normalized_candidate) in
                    normalized_candidates.iter().enumerate()
                {
                    // Strings that normalize to nothing are unmatchable.
                    if normalized_candidate.is_empty() {
                        continue;
                    }
                    let score = similarity(&normalized_label, normalized_candidate);
                    if score >= options.threshold {
                        pairs.push(ScoredPair {
                            entry_index,
                            candidate_index,
                            score,
                            normalized_candidate,
                        });
                    }
                }
            }

            progress((entry_index + 1) as f64 / total as f64);
        }

        // Highest confidence first; remaining ranks only break ties, so
        // equal-score runs come out the same way every time.
        pairs.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.normalized_candidate.len().cmp(&b.normalized_candidate.len()))
                .then_with(|| a.normalized_candidate.cmp(b.normalized_candidate))
                .then_with(|| a.entry_index.cmp(&b.entry_index))
                .then_with(|| a.candidate_index.cmp(&b.candidate_index))
        });

        let mut assignment = Assignment::unassigned(total);
        let mut entry_taken = vec![false; total];
        let mut candidate_taken = vec![false; candidates.len()];
        for pair in &pairs {
            if entry_taken[pair.entry_index] || candidate_taken[pair.candidate_index] {
                continue;
            }
            entry_taken[pair.entry_index] = true;
            candidate_taken[pair.candidate_index] = true;
            assignment.assign(pair.entry_index, candidates[pair.candidate_index].clone());
        }

        let mut suggestions = Vec::new();
        let mut per_entry = vec![0usize; total];
        for pair in &pairs {
            if per_entry[pair.entry_index] >= options.max_candidates_per_entry {
                continue;
            }
            per_entry[pair.entry_index] += 1;
            suggestions.push(Suggestion {
                entry_index: pair.entry_index,
                candidate: candidates[pair.candidate_index].clone(),
                score: pair.score,
            });
        }

        let diagnostics = MatchDiagnostics {
            pairs_scored: total * candidates.len(),
            pairs_above_threshold: pairs.len(),
            entries_assigned: assignment.assigned_count(),
            candidates_unused: candidate_taken.iter().filter(|taken| !**taken).count(),
            suggestions,
        };

        Ok(MatchOutcome {
            assignment,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NormalizeRule;
    use std::cell::RefCell;

    fn run_matcher(
        labels: &[&str],
        candidates: &[&str],
        options: &MatchOptions,
    ) -> MatchOutcome {
        let labels: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
        let candidates: Vec<String> = candidates.iter().map(|s| s.to_string()).collect();
        FuzzyMatcher::new()
            .run(&labels, &candidates, options, &|_| {}, &CancelHandle::new())
            .unwrap()
    }

    #[test]
    fn similarity_is_one_for_equal_inputs() {
        assert_eq!(similarity("contra", "contra"), 1.0);
    }

    #[test]
    fn similarity_is_zero_for_empty_inputs() {
        assert_eq!(similarity("", ""), 0.0);
        assert_eq!(similarity("contra", ""), 0.0);
        assert_eq!(similarity("", "contra"), 0.0);
    }

    #[test]
    fn contra_gradius_end_to_end() {
        let outcome = run_matcher(
            &["Contra", "Gradius"],
            &["contra (usa).png", "gradius_EU.jpg", "unrelated.png"],
            &MatchOptions::default(),
        );
        let assignment = &outcome.assignment;
        assert_eq!(assignment.candidate_for(0), Some("contra (usa).png"));
        assert_eq!(assignment.candidate_for(1), Some("gradius_EU.jpg"));
        assert_eq!(outcome.diagnostics.entries_assigned, 2);
        assert_eq!(outcome.diagnostics.candidates_unused, 1);
        assert_eq!(outcome.diagnostics.pairs_scored, 6);
    }

    #[test]
    fn no_candidate_claimed_twice() {
        let outcome = run_matcher(
            &["Mario", "Mario Bros"],
            &["mario.png"],
            &MatchOptions {
                threshold: 0.3,
                ..MatchOptions::default()
            },
        );
        let assigned: Vec<_> = outcome
            .assignment
            .slots()
            .iter()
            .filter_map(|slot| slot.candidate_filename.as_deref())
            .collect();
        assert_eq!(assigned, vec!["mario.png"]);
        // The exact-stem match outranks the longer label.
        assert_eq!(outcome.assignment.candidate_for(0), Some("mario.png"));
        assert_eq!(outcome.assignment.candidate_for(1), None);
    }

    #[test]
    fn empty_candidate_list_completes_unassigned() {
        let outcome = run_matcher(&["Contra"], &[], &MatchOptions::default());
        assert_eq!(outcome.assignment.len(), 1);
        assert_eq!(outcome.assignment.assigned_count(), 0);
        assert_eq!(outcome.diagnostics.pairs_scored, 0);
    }

    #[test]
    fn empty_labels_complete_without_progress() {
        let calls = RefCell::new(Vec::new());
        let outcome = FuzzyMatcher::new()
            .run(
                &[],
                &["a.png".to_string()],
                &MatchOptions::default(),
                &|ratio| calls.borrow_mut().push(ratio),
                &CancelHandle::new(),
            )
            .unwrap();
        assert!(outcome.assignment.is_empty());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn unmatchable_candidates_never_assign() {
        // "---.png" normalizes to nothing and must not match anything,
        // even with a threshold of zero.
        let outcome = run_matcher(
            &["Contra"],
            &["---.png"],
            &MatchOptions {
                threshold: 0.0,
                ..MatchOptions::default()
            },
        );
        assert_eq!(outcome.assignment.candidate_for(0), None);
        assert_eq!(outcome.diagnostics.pairs_above_threshold, 0);
    }

    #[test]
    fn threshold_above_one_is_vacuous_not_an_error() {
        let outcome = run_matcher(
            &["Contra"],
            &["contra.png"],
            &MatchOptions {
                threshold: 1.5,
                ..MatchOptions::default()
            },
        );
        assert_eq!(outcome.assignment.assigned_count(), 0);
        assert_eq!(outcome.diagnostics.pairs_above_threshold, 0);
    }

    #[test]
    fn deterministic_across_runs() {
        let labels = &["Contra", "Gradius", "Castlevania", "Metroid"];
        let candidates = &[
            "castlevania (usa).png",
            "contra (usa).png",
            "gradius_EU.jpg",
            "metroid [!].png",
            "unrelated.png",
        ];
        let options = MatchOptions {
            threshold: 0.4,
            ..MatchOptions::default()
        };
        let first = run_matcher(labels, candidates, &options);
        let second = run_matcher(labels, candidates, &options);
        assert_eq!(first, second);
    }

    #[test]
    fn equal_scores_prefer_shorter_candidate() {
        // "ax" and "abcd" both score exactly 0.5 against "ab"
        // (1 edit in 2 vs 2 edits in 4), so the shorter stem wins.
        let outcome = run_matcher(&["ab"], &["abcd.png", "ax.png"], &MatchOptions::default());
        assert_eq!(outcome.assignment.candidate_for(0), Some("ax.png"));
    }

    #[test]
    fn equal_scores_and_lengths_prefer_lexical_candidate() {
        // Listed worst-first to show input order is not the tie-break.
        let outcome = run_matcher(&["ab"], &["ay.png", "ax.png"], &MatchOptions::default());
        assert_eq!(outcome.assignment.candidate_for(0), Some("ax.png"));
    }

    #[test]
    fn progress_is_monotone_and_ends_at_one() {
        let ratios = RefCell::new(Vec::new());
        let labels: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        FuzzyMatcher::new()
            .run(
                &labels,
                &["a.png".to_string()],
                &MatchOptions::default(),
                &|ratio| ratios.borrow_mut().push(ratio),
                &CancelHandle::new(),
            )
            .unwrap();
        let ratios = ratios.into_inner();
        assert_eq!(ratios.len(), 4);
        assert!(ratios.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(ratios.last(), Some(&1.0));
    }

    #[test]
    fn cancelled_before_start_reports_cancelled() {
        let cancel = CancelHandle::new();
        cancel.cancel();
        let result = FuzzyMatcher::new().run(
            &["Contra".to_string()],
            &["contra.png".to_string()],
            &MatchOptions::default(),
            &|_| {},
            &cancel,
        );
        assert_eq!(result, Err(EngineError::Cancelled));
    }

    #[test]
    fn suggestions_capped_per_entry() {
        let options = MatchOptions {
            threshold: 0.3,
            max_candidates_per_entry: 2,
            ..MatchOptions::default()
        };
        let outcome = run_matcher(
            &["Mega Man"],
            &["mega man.png", "mega man 2.png", "mega man 3.png"],
            &options,
        );
        assert_eq!(outcome.diagnostics.suggestions.len(), 2);
        assert_eq!(outcome.diagnostics.suggestions[0].candidate, "mega man.png");
        assert_eq!(outcome.diagnostics.suggestions[0].score, 1.0);
    }

    #[test]
    fn region_tags_stripped_when_enabled() {
        let mut options = MatchOptions::default();
        options.normalize.push(NormalizeRule::StripRegionTags);
        let outcome = run_matcher(&["Contra"], &["contra (usa).png"], &options);
        assert_eq!(outcome.assignment.candidate_for(0), Some("contra (usa).png"));
        assert_eq!(outcome.diagnostics.suggestions[0].score, 1.0);
    }

    #[test]
    fn error_display_reads_well() {
        assert_eq!(EngineError::Cancelled.to_string(), "match run cancelled");
        assert_eq!(EngineError::failed("boom").to_string(), "boom");
    }
}
