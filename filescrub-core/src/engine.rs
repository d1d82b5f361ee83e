// filescrub-core/src/engine.rs
//! Defines the pattern-matching capability the rest of the crate is written
//! against.
//!
//! Regex engines differ in their match semantics, so the registry and matcher
//! never talk to a concrete engine. A [`PatternCompiler`] turns an expression
//! into a [`CompiledPattern`], and a compiled pattern reports the spans it
//! finds. The contract every backend must honor:
//!
//! * spans returned by [`CompiledPattern::find_all`] are non-empty, sorted by
//!   start and mutually non-overlapping;
//! * each span is leftmost-longest: it starts at the earliest position where the
//!   pattern matches (at or after the end of the previous span) and extends as
//!   far as any match starting there can;
//! * offsets are UTF-8 byte offsets that fall on character boundaries.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Compilation flags applied to a whole expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternFlags {
    pub case_insensitive: bool,
    /// `^` and `$` match at line boundaries.
    pub multiline: bool,
    /// `.` also matches `\n`.
    pub dot_matches_new_line: bool,
}

/// A compiled expression ready to be run against text.
pub trait CompiledPattern: fmt::Debug + Send + Sync {
    /// Finds every leftmost-longest, non-overlapping occurrence in `text`.
    fn find_all(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut at = 0;
        while let Some(span) = self.find_at(text, at) {
            // An empty span cannot advance the scan.
            if span.is_empty() || span.end <= at {
                break;
            }
            at = span.end;
            spans.push(span);
        }
        spans
    }

    /// Finds the leftmost-longest occurrence starting at or after `start`.
    ///
    /// Look-around assertions such as `\b` still see the text before `start`.
    fn find_at(&self, text: &str, start: usize) -> Option<Range<usize>>;

    /// Like [`find_all`](Self::find_all), but keeps only the spans `accept`
    /// returns `true` for.
    ///
    /// After a rejected span the scan resumes one character past its start, so
    /// an occurrence beginning inside it can still be found.
    fn find_all_accepted(&self, text: &str, accept: &mut dyn FnMut(Range<usize>) -> bool) -> Vec<Range<usize>> {
        scan_accepted(text, accept, |at| self.find_at(text, at))
    }
}

/// Drives an accept/resume scan over `text` with a backend's `find` step.
pub(crate) fn scan_accepted<F>(
    text: &str,
    accept: &mut dyn FnMut(Range<usize>) -> bool,
    mut find: F,
) -> Vec<Range<usize>>
where
    F: FnMut(usize) -> Option<Range<usize>>,
{
    let mut spans = Vec::new();
    let mut at = 0;
    while let Some(span) = find(at) {
        if span.is_empty() || span.end <= at {
            break;
        }
        if accept(span.clone()) {
            at = span.end;
            spans.push(span);
        } else {
            let step = text[span.start..].chars().next().map_or(1, char::len_utf8);
            at = span.start + step;
        }
    }
    spans
}

/// Turns expressions into [`CompiledPattern`]s.
///
/// Rejection reasons are returned as plain strings; the registry wraps them in
/// [`ScrubError::InvalidPattern`](crate::ScrubError::InvalidPattern) together
/// with the offending id.
pub trait PatternCompiler: Send + Sync {
    fn compile(&self, expression: &str, flags: PatternFlags) -> Result<Box<dyn CompiledPattern>, String>;

    /// A short name for logs.
    fn name(&self) -> &'static str;
}
