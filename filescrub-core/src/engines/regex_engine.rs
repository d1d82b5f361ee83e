// filescrub-core/src/engines/regex_engine.rs
//! The default [`PatternCompiler`] backend, built on the `regex` crate family.
//!
//! `regex::Regex` has leftmost-first semantics: among matches starting at the
//! same position it prefers the one its alternation order reaches first, so
//! `foo|foobar` finds `foo` in `foobar`. Every compiled pattern therefore
//! carries two programs:
//!
//! * a `regex::Regex` that locates the leftmost start quickly (the start is the
//!   same under both semantics), and
//! * a PikeVM configured with [`MatchKind::All`] which, searched anchored at that
//!   start, keeps running past the first match and reports the longest end.
//!
//! License: MIT OR APACHE 2.0

use std::ops::Range;

use log::debug;
use regex::{Regex, RegexBuilder};
use regex_automata::nfa::thompson::pikevm::{Cache, PikeVM};
use regex_automata::{Anchored, Input, MatchKind};

use crate::config::MAX_PATTERN_LENGTH;
use crate::engine::{CompiledPattern, PatternCompiler, PatternFlags, scan_accepted};

/// Upper bound on the compiled program size of a single expression.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Compiles expressions with the `regex` crate syntax.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexCompiler;

impl RegexCompiler {
    pub fn new() -> Self {
        RegexCompiler
    }
}

/// An expression compiled for leftmost-longest searching.
#[derive(Debug)]
pub struct RegexPattern {
    finder: Regex,
    longest: PikeVM,
}

impl RegexPattern {
    /// The effective source text, including any inline flag prefix.
    pub fn as_str(&self) -> &str {
        self.finder.as_str()
    }
}

/// Prefixes `expression` with the inline flags equivalent to `flags`, so the
/// same text can be handed to every program that needs to agree on it.
fn with_inline_flags(expression: &str, flags: PatternFlags) -> String {
    let mut prefix = String::new();
    if flags.case_insensitive {
        prefix.push('i');
    }
    if flags.multiline {
        prefix.push('m');
    }
    if flags.dot_matches_new_line {
        prefix.push('s');
    }
    if prefix.is_empty() {
        expression.to_string()
    } else {
        format!("(?{prefix}){expression}")
    }
}

impl PatternCompiler for RegexCompiler {
    fn compile(&self, expression: &str, flags: PatternFlags) -> Result<Box<dyn CompiledPattern>, String> {
        if expression.is_empty() {
            return Err("expression is empty".to_string());
        }
        if expression.len() > MAX_PATTERN_LENGTH {
            return Err(format!(
                "expression length ({}) exceeds maximum allowed ({})",
                expression.len(),
                MAX_PATTERN_LENGTH
            ));
        }

        let source = with_inline_flags(expression, flags);

        let finder = RegexBuilder::new(&source)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
            .map_err(|e| e.to_string())?;

        // A pattern that can match nothing would never advance a scan and would
        // splice replacements between untouched characters.
        let hir = regex_syntax::parse(&source).map_err(|e| e.to_string())?;
        if hir.properties().minimum_len() == Some(0) {
            return Err("pattern can match an empty string".to_string());
        }

        let longest = PikeVM::builder()
            .configure(PikeVM::config().match_kind(MatchKind::All))
            .build(&source)
            .map_err(|e| e.to_string())?;

        debug!("Compiled expression '{}' with the {} backend.", source, self.name());
        Ok(Box::new(RegexPattern { finder, longest }))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}

impl RegexPattern {
    fn search(&self, cache: &mut Cache, text: &str, start: usize) -> Option<Range<usize>> {
        if start > text.len() {
            return None;
        }
        let first = self.finder.find_at(text, start)?;

        let input = Input::new(text)
            .range(first.start()..)
            .anchored(Anchored::Yes);
        let end = match self.longest.find(cache, input) {
            Some(m) => m.end().max(first.end()),
            None => first.end(),
        };

        Some(first.start()..end)
    }
}

impl CompiledPattern for RegexPattern {
    fn find_all(&self, text: &str) -> Vec<Range<usize>> {
        let mut cache = self.longest.create_cache();
        let mut spans = Vec::new();
        let mut at = 0;
        while let Some(span) = self.search(&mut cache, text, at) {
            at = span.end;
            spans.push(span);
        }
        spans
    }

    fn find_at(&self, text: &str, start: usize) -> Option<Range<usize>> {
        let mut cache = self.longest.create_cache();
        self.search(&mut cache, text, start)
    }

    fn find_all_accepted(&self, text: &str, accept: &mut dyn FnMut(Range<usize>) -> bool) -> Vec<Range<usize>> {
        let mut cache = self.longest.create_cache();
        scan_accepted(text, accept, |at| self.search(&mut cache, text, at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(expression: &str) -> Box<dyn CompiledPattern> {
        RegexCompiler::new()
            .compile(expression, PatternFlags::default())
            .expect("expression should compile")
    }

    #[test]
    fn test_alternation_prefers_longest_branch() {
        let pattern = compile("foo|foobar");
        assert_eq!(pattern.find_all("xx foobar foo"), vec![3..9, 10..13]);
    }

    #[test]
    fn test_lazy_quantifier_still_reports_longest() {
        let pattern = compile("a+?");
        assert_eq!(pattern.find_all("aaa b a"), vec![0..3, 6..7]);
    }

    #[test]
    fn test_longest_end_found_past_shorter_branches() {
        let pattern = compile("ab|abcd|abcdef");
        assert_eq!(pattern.find_at("xabcdefg", 0), Some(1..7));
        assert_eq!(pattern.find_all("abcd ab abcdef"), vec![0..4, 5..7, 8..14]);
    }

    #[test]
    fn test_accepted_scan_resumes_after_rejection() {
        let pattern = compile("[0-9]{3}");
        let mut seen = Vec::new();
        let spans = pattern.find_all_accepted("1234 567", &mut |span| {
            seen.push(span.clone());
            span.start != 0
        });
        assert_eq!(spans, vec![1..4, 5..8]);
        assert_eq!(seen, vec![0..3, 1..4, 5..8]);
    }

    #[test]
    fn test_accepted_scan_over_long_rejected_run() {
        let pattern = compile("[0-9]{2,}");
        let text = "7".repeat(1_000);
        let mut calls = 0;
        let spans = pattern.find_all_accepted(&text, &mut |_| {
            calls += 1;
            false
        });
        assert!(spans.is_empty());
        // One candidate per start position that still leaves two digits.
        assert_eq!(calls, text.len() - 1);
    }

    #[test]
    fn test_occurrences_do_not_overlap() {
        let pattern = compile("aba");
        assert_eq!(pattern.find_all("ababa aba"), vec![0..3, 6..9]);
    }

    #[test]
    fn test_word_boundary_sees_text_before_start() {
        let pattern = compile(r"\bcat\b");
        assert_eq!(pattern.find_at("concat cat", 3), Some(7..10));
    }

    #[test]
    fn test_flags_are_applied() {
        let flags = PatternFlags { case_insensitive: true, ..PatternFlags::default() };
        let pattern = RegexCompiler::new().compile("secret", flags).unwrap();
        assert_eq!(pattern.find_all("SeCrEt"), vec![0..6]);
    }

    #[test]
    fn test_multibyte_offsets_are_char_boundaries() {
        let pattern = compile("é+");
        let text = "caféé!";
        let spans = pattern.find_all(text);
        assert_eq!(spans, vec![3..7]);
        assert_eq!(&text[spans[0].clone()], "éé");
    }

    #[test]
    fn test_rejects_zero_length_capable_expressions() {
        let compiler = RegexCompiler::new();
        for expression in ["a*", "x?", r"\b", "^", "(?:abc)?", "a|"] {
            let err = compiler.compile(expression, PatternFlags::default()).unwrap_err();
            assert!(err.contains("empty string"), "{expression}: {err}");
        }
    }

    #[test]
    fn test_rejects_malformed_and_oversized_expressions() {
        let compiler = RegexCompiler::new();
        assert!(compiler.compile("(unclosed", PatternFlags::default()).is_err());
        assert!(compiler.compile("", PatternFlags::default()).is_err());
        let long = "a".repeat(MAX_PATTERN_LENGTH + 1);
        let err = compiler.compile(&long, PatternFlags::default()).unwrap_err();
        assert!(err.contains("exceeds maximum"));
    }

    #[test]
    fn test_inline_flag_prefix() {
        let flags = PatternFlags { case_insensitive: true, multiline: true, dot_matches_new_line: true };
        assert_eq!(with_inline_flags("x", flags), "(?ims)x");
        assert_eq!(with_inline_flags("x", PatternFlags::default()), "x");
    }
}
