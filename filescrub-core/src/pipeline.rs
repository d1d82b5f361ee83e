// filescrub-core/src/pipeline.rs
//! The sanitization pipeline: resolve, match, redact, splice.
//!
//! Output is assembled by copying the unmatched text between spans verbatim
//! and inserting the replacement for each span in order, so every byte outside
//! a match reaches the output unchanged and in place.
//!
//! License: MIT OR APACHE 2.0

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::ScrubError;
use crate::matcher::{find_matches, MatchSet};
use crate::redaction_log::log_redaction_action_debug;
use crate::redactor::{redact, RedactionPolicy};
use crate::registry::{PatternDefinition, PatternRegistry};

/// The outcome of sanitizing one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizationResult {
    pub output_text: String,
    /// Number of accepted spans.
    pub match_count: usize,
    /// Accepted spans per pattern id. Patterns without matches are absent.
    pub matches_by_pattern: BTreeMap<String, usize>,
}

impl SanitizationResult {
    /// Adds the tallies of `other` to this result. Output text is not touched.
    pub fn absorb(&mut self, other: &SanitizationResult) {
        self.match_count += other.match_count;
        for (id, count) in &other.matches_by_pattern {
            *self.matches_by_pattern.entry(id.clone()).or_insert(0) += count;
        }
    }
}

/// Resolved patterns plus a policy, reusable across many inputs.
///
/// `Sanitizer` borrows the registry immutably and keeps no per-call state, so
/// one instance can be shared by concurrent workers.
#[derive(Debug, Clone)]
pub struct Sanitizer<'r> {
    patterns: Vec<&'r PatternDefinition>,
    policy: RedactionPolicy,
}

impl<'r> Sanitizer<'r> {
    /// Resolves `active_ids` against `registry`. Unknown ids fail here, before
    /// any text is examined.
    pub fn new<S: AsRef<str>>(
        registry: &'r PatternRegistry,
        active_ids: &[S],
        policy: RedactionPolicy,
    ) -> Result<Self, ScrubError> {
        let patterns = registry.resolve(active_ids)?;
        Ok(Self::from_patterns(patterns, policy))
    }

    /// Uses every pattern in `registry`.
    pub fn with_all_patterns(registry: &'r PatternRegistry, policy: RedactionPolicy) -> Self {
        Self::from_patterns(registry.resolve_all(), policy)
    }

    /// Uses already resolved patterns, in the priority order given.
    pub fn from_patterns(patterns: Vec<&'r PatternDefinition>, policy: RedactionPolicy) -> Self {
        debug!(
            "Sanitizer ready with {} pattern(s) and policy '{}'.",
            patterns.len(),
            policy
        );
        Self { patterns, policy }
    }

    pub fn patterns(&self) -> &[&'r PatternDefinition] {
        &self.patterns
    }

    pub fn policy(&self) -> &RedactionPolicy {
        &self.policy
    }

    /// Finds the accepted spans without rewriting anything.
    pub fn find_matches(&self, text: &str) -> MatchSet {
        find_matches(text, &self.patterns)
    }

    pub fn sanitize(&self, text: &str) -> SanitizationResult {
        let matches = self.find_matches(text);
        splice(text, &matches, &self.policy)
    }
}

/// Builds the output for `text` from an already computed match set.
pub fn splice(text: &str, matches: &MatchSet, policy: &RedactionPolicy) -> SanitizationResult {
    let mut output_text = String::with_capacity(text.len());
    let mut last_end = 0;

    for span in matches {
        output_text.push_str(&text[last_end..span.start]);
        let replacement = redact(span, policy);
        log_redaction_action_debug(&span.pattern_id, &span.text, &replacement);
        output_text.push_str(&replacement);
        last_end = span.end;
    }
    output_text.push_str(&text[last_end..]);

    SanitizationResult {
        output_text,
        match_count: matches.len(),
        matches_by_pattern: matches.counts_by_pattern(),
    }
}

/// One-shot sanitization of `text` with the patterns named in `active_ids`.
pub fn sanitize<S: AsRef<str>>(
    text: &str,
    registry: &PatternRegistry,
    active_ids: &[S],
    policy: &RedactionPolicy,
) -> Result<SanitizationResult, ScrubError> {
    let sanitizer = Sanitizer::new(registry, active_ids, policy.clone())?;
    Ok(sanitizer.sanitize(text))
}
