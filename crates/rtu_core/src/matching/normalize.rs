//! Text normalization applied to labels and candidate filenames before
//! scoring.

use crate::models::{base_name, NormalizeRule};

/// Reduce a candidate string to its bare stem: directory components and
/// the file extension removed. Applied to every candidate before the
/// normalization rules run.
pub fn candidate_stem(candidate: &str) -> &str {
    strip_extension(base_name(candidate))
}

/// Drop the final dot-suffix from a filename.
///
/// A leading dot is part of the name, not an extension separator, so
/// `.hidden` stays whole.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Apply normalization rules to a piece of text.
///
/// The rules are a set: they run in a fixed canonical order (region
/// tags, case fold, punctuation, whitespace) regardless of the order
/// they appear in, so two option sets with the same rules normalize
/// identically.
pub fn normalize(text: &str, rules: &[NormalizeRule]) -> String {
    let mut text = if rules.contains(&NormalizeRule::StripRegionTags) {
        strip_region_tags(text)
    } else {
        text.to_string()
    };
    if rules.contains(&NormalizeRule::CaseFold) {
        text = text.to_lowercase();
    }
    if rules.contains(&NormalizeRule::StripPunctuation) {
        text = text
            .chars()
            .map(|ch| {
                if ch.is_alphanumeric() || ch.is_whitespace() {
                    ch
                } else {
                    ' '
                }
            })
            .collect();
    }
    if rules.contains(&NormalizeRule::CollapseWhitespace) {
        text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    }
    text
}

/// Remove parenthesized and bracketed groups, brackets included.
/// Nesting is honored; unbalanced closers are dropped.
fn strip_region_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}
