// filescrub-core/src/matcher.rs
//! Multi-pattern matching with deterministic overlap resolution.
//!
//! Each pattern is searched independently. The candidates of all patterns are
//! then ordered by start (ascending), length (descending) and pattern priority
//! (ascending) and accepted greedily, skipping any candidate that overlaps an
//! already-accepted span. Overlap between broad patterns is expected, so
//! dropped candidates are not errors.
//!
//! License: MIT OR APACHE 2.0

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::redaction_log::{log_captured_match_debug, log_rejected_candidate_debug};
use crate::registry::PatternDefinition;

/// A matched region `[start, end)` of the input, in UTF-8 byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
    pub pattern_id: String,
    /// The matched text, `input[start..end]`.
    pub text: String,
    /// Trailing characters a mask may keep, copied from the pattern definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_suffix: Option<usize>,
}

impl MatchSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn overlaps(&self, other: &MatchSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Accepted spans, sorted by start and mutually non-overlapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchSet {
    spans: Vec<MatchSpan>,
}

impl MatchSet {
    pub fn spans(&self) -> &[MatchSpan] {
        &self.spans
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchSpan> {
        self.spans.iter()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Number of accepted spans per pattern id.
    pub fn counts_by_pattern(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for span in &self.spans {
            *counts.entry(span.pattern_id.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn into_spans(self) -> Vec<MatchSpan> {
        self.spans
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a MatchSpan;
    type IntoIter = std::slice::Iter<'a, MatchSpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

struct Candidate {
    start: usize,
    end: usize,
    priority: usize,
}

/// Collects one pattern's occurrences, honoring its validator.
///
/// A candidate the validator rejects is skipped and the search resumes one
/// character after its start, so a valid occurrence beginning inside it can
/// still be found.
fn collect_candidates(text: &str, definition: &PatternDefinition, priority: usize, out: &mut Vec<Candidate>) {
    let compiled = definition.compiled();

    if definition.validator().is_none() {
        for span in compiled.find_all(text) {
            if !span.is_empty() {
                out.push(Candidate { start: span.start, end: span.end, priority });
            }
        }
        return;
    }

    let spans = compiled.find_all_accepted(text, &mut |span| {
        let accepted = definition.accepts(&text[span.clone()]);
        if !accepted {
            log_rejected_candidate_debug(definition.id(), span.start, span.end, "validator rejected");
        }
        accepted
    });
    out.extend(spans.into_iter().map(|span| Candidate { start: span.start, end: span.end, priority }));
}

/// Finds the non-overlapping matches of `patterns` in `text`.
///
/// `patterns` must be in priority order (as returned by
/// [`PatternRegistry::resolve`](crate::PatternRegistry::resolve)); earlier
/// entries win ties between equally long candidates at the same offset.
pub fn find_matches(text: &str, patterns: &[&PatternDefinition]) -> MatchSet {
    if text.is_empty() || patterns.is_empty() {
        return MatchSet::default();
    }

    let mut candidates = Vec::new();
    for (priority, definition) in patterns.iter().enumerate() {
        collect_candidates(text, definition, priority, &mut candidates);
    }

    candidates.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| (b.end - b.start).cmp(&(a.end - a.start)))
            .then_with(|| a.priority.cmp(&b.priority))
    });

    let mut spans: Vec<MatchSpan> = Vec::new();
    let mut accepted_end = 0;
    for candidate in candidates {
        // Candidates arrive by start, so only the last accepted span can overlap.
        if !spans.is_empty() && candidate.start < accepted_end {
            log_rejected_candidate_debug(
                patterns[candidate.priority].id(),
                candidate.start,
                candidate.end,
                "overlaps an accepted span",
            );
            continue;
        }

        let definition = patterns[candidate.priority];
        let matched = &text[candidate.start..candidate.end];
        log_captured_match_debug(definition.id(), candidate.start, candidate.end, matched);

        accepted_end = candidate.end;
        spans.push(MatchSpan {
            start: candidate.start,
            end: candidate.end,
            pattern_id: definition.id().to_string(),
            text: matched.to_string(),
            preserve_suffix: definition.preserve_suffix(),
        });
    }

    MatchSet { spans }
}
