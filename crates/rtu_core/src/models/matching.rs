//! Matching data structures (options, assignments, diagnostics).

use serde::{Deserialize, Serialize};

/// Text-normalization rules applied to labels and candidate filenames
/// before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeRule {
    /// Lowercase the text.
    CaseFold,
    /// Replace punctuation and separator characters with spaces.
    StripPunctuation,
    /// Collapse whitespace runs into single spaces and trim the ends.
    CollapseWhitespace,
    /// Drop parenthesized or bracketed groups such as `(USA)` or `[!]`.
    StripRegionTags,
}

impl NormalizeRule {
    /// Rules enabled by default: everything except region-tag stripping.
    pub fn default_rules() -> Vec<NormalizeRule> {
        vec![
            NormalizeRule::CaseFold,
            NormalizeRule::StripPunctuation,
            NormalizeRule::CollapseWhitespace,
        ]
    }
}

/// Options controlling one matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Minimum similarity for a pair to be considered, nominally in
    /// `[0, 1]`. Out-of-range values are accepted: above 1.0 nothing
    /// survives, at or below 0.0 every pair does.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Normalization rules applied before scoring.
    #[serde(default = "NormalizeRule::default_rules")]
    pub normalize: Vec<NormalizeRule>,
    /// Cap on per-entry suggestion lists in diagnostics.
    #[serde(rename = "maxCandidatesPerEntry", default = "default_max_candidates")]
    pub max_candidates_per_entry: usize,
}

fn default_threshold() -> f64 {
    0.5
}

fn default_max_candidates() -> usize {
    1
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            normalize: NormalizeRule::default_rules(),
            max_candidates_per_entry: default_max_candidates(),
        }
    }
}

/// One entry's slot in an assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentSlot {
    /// Index of the playlist entry this slot belongs to.
    #[serde(rename = "entryIndex")]
    pub entry_index: usize,
    /// Matched candidate, or `None` when the entry stayed unassigned.
    #[serde(rename = "candidateFilename")]
    pub candidate_filename: Option<String>,
}

/// Result of one matching run: entry index to optional candidate.
///
/// Covers every entry exactly once, in entry order, and no candidate
/// appears in more than one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    slots: Vec<AssignmentSlot>,
}

impl Assignment {
    /// An assignment with every one of `entry_count` entries unassigned.
    pub fn unassigned(entry_count: usize) -> Self {
        Self {
            slots: (0..entry_count)
                .map(|entry_index| AssignmentSlot {
                    entry_index,
                    candidate_filename: None,
                })
                .collect(),
        }
    }

    /// All slots, in entry order.
    pub fn slots(&self) -> &[AssignmentSlot] {
        &self.slots
    }

    /// Number of entries covered.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the assignment covers no entries.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The candidate assigned to an entry, if any.
    pub fn candidate_for(&self, entry_index: usize) -> Option<&str> {
        self.slots
            .get(entry_index)
            .and_then(|slot| slot.candidate_filename.as_deref())
    }

    /// Count of entries that received a candidate.
    pub fn assigned_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.candidate_filename.is_some())
            .count()
    }

    /// Set the candidate for an entry. Out-of-range indices are ignored.
    pub(crate) fn assign(&mut self, entry_index: usize, candidate: String) {
        if let Some(slot) = self.slots.get_mut(entry_index) {
            slot.candidate_filename = Some(candidate);
        }
    }
}

/// One scored pairing retained for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Entry the candidate was scored against.
    pub entry_index: usize,
    /// The raw candidate string.
    pub candidate: String,
    /// Similarity score of the pair.
    pub score: f64,
}

/// Summary of one matching run. Deterministic for a given input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchDiagnostics {
    /// Total (label, candidate) pairs scored.
    pub pairs_scored: usize,
    /// Pairs at or above the threshold.
    pub pairs_above_threshold: usize,
    /// Entries that received a candidate.
    pub entries_assigned: usize,
    /// Candidates not claimed by any entry.
    pub candidates_unused: usize,
    /// Top-ranked surviving candidates per entry, capped at
    /// `maxCandidatesPerEntry`, ranked the same way assignment
    /// considered them.
    pub suggestions: Vec<Suggestion>,
}

/// Full output of one matching run.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    /// The resolved assignment.
    pub assignment: Assignment,
    /// Run statistics and near-miss suggestions.
    pub diagnostics: MatchDiagnostics,
}
