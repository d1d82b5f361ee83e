// filescrub-core/src/redactor.rs
//! Turns a matched span into its replacement text.
//!
//! The policy set is closed, so it is a plain enum rather than a trait.
//! [`redact`] is a pure function of a span and a policy.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::matcher::MatchSpan;

/// Replacement token used when none is given.
pub const DEFAULT_TOKEN: &str = "[REDACTED]";

/// Fill character used when none is given.
pub const DEFAULT_MASK_CHAR: char = 'X';

/// How matched spans are rewritten. One policy applies to a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RedactionPolicy {
    /// Delete the span.
    Remove,
    /// Replace the span with `token`, whatever its length.
    ReplaceWithToken { token: String },
    /// Replace every character with `fill`. With `preserve_suffix`, a span
    /// whose pattern declares a suffix hint keeps that many trailing characters.
    Mask { fill: char, preserve_suffix: bool },
}

impl RedactionPolicy {
    pub fn token(token: impl Into<String>) -> Self {
        RedactionPolicy::ReplaceWithToken { token: token.into() }
    }

    /// A mask that honors the patterns' suffix hints.
    pub fn mask(fill: char) -> Self {
        RedactionPolicy::Mask { fill, preserve_suffix: true }
    }

    /// A mask that hides every character.
    pub fn full_mask(fill: char) -> Self {
        RedactionPolicy::Mask { fill, preserve_suffix: false }
    }
}

impl fmt::Display for RedactionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedactionPolicy::Remove => write!(f, "remove"),
            RedactionPolicy::ReplaceWithToken { token } => write!(f, "token={}", token),
            RedactionPolicy::Mask { fill, preserve_suffix: true } => write!(f, "mask={}", fill),
            RedactionPolicy::Mask { fill, preserve_suffix: false } => write!(f, "mask-full={}", fill),
        }
    }
}

/// Error returned when a policy string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePolicyError(String);

impl fmt::Display for ParsePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid redaction policy '{}'; expected one of: remove, token[=TEXT], mask[=CHAR], mask-full[=CHAR]",
            self.0
        )
    }
}

impl std::error::Error for ParsePolicyError {}

fn parse_fill(input: &str, value: Option<&str>) -> Result<char, ParsePolicyError> {
    let Some(value) = value else { return Ok(DEFAULT_MASK_CHAR); };
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ParsePolicyError(input.to_string())),
    }
}

impl FromStr for RedactionPolicy {
    type Err = ParsePolicyError;

    /// Parses `remove`, `token`, `token=TEXT`, `mask`, `mask=C`, `mask-full`
    /// or `mask-full=C`. Keywords are case-insensitive; values are kept as
    /// written.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (keyword, value) = match s.split_once('=') {
            Some((k, v)) => (k, Some(v)),
            None => (s, None),
        };

        match keyword.trim().to_ascii_lowercase().as_str() {
            "remove" if value.is_none() => Ok(RedactionPolicy::Remove),
            "token" => match value {
                None => Ok(RedactionPolicy::token(DEFAULT_TOKEN)),
                Some("") => Err(ParsePolicyError(s.to_string())),
                Some(token) => Ok(RedactionPolicy::token(token)),
            },
            "mask" => Ok(RedactionPolicy::mask(parse_fill(s, value)?)),
            "mask-full" => Ok(RedactionPolicy::full_mask(parse_fill(s, value)?)),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// Produces the replacement text for `span` under `policy`.
///
/// Mask output has exactly as many characters as the span. A suffix hint is
/// only honored when it leaves at least one masked character; otherwise the
/// whole span is masked.
pub fn redact(span: &MatchSpan, policy: &RedactionPolicy) -> String {
    match policy {
        RedactionPolicy::Remove => String::new(),
        RedactionPolicy::ReplaceWithToken { token } => token.clone(),
        RedactionPolicy::Mask { fill, preserve_suffix } => {
            let total = span.text.chars().count();
            let keep = match span.preserve_suffix {
                Some(k) if *preserve_suffix && k < total => k,
                _ => 0,
            };
            let mut out = String::with_capacity(span.text.len());
            out.extend(std::iter::repeat(*fill).take(total - keep));
            out.extend(span.text.chars().skip(total - keep));
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, preserve_suffix: Option<usize>) -> MatchSpan {
        MatchSpan {
            start: 0,
            end: text.len(),
            pattern_id: "test".to_string(),
            text: text.to_string(),
            preserve_suffix,
        }
    }

    #[test]
    fn test_remove_yields_empty_string() {
        assert_eq!(redact(&span("a@b.com", None), &RedactionPolicy::Remove), "");
    }

    #[test]
    fn test_token_ignores_span_length() {
        let policy = RedactionPolicy::token("[PII]");
        assert_eq!(redact(&span("x", None), &policy), "[PII]");
        assert_eq!(redact(&span("a much longer value", None), &policy), "[PII]");
    }

    #[test]
    fn test_mask_keeps_suffix_when_hinted() {
        let policy = RedactionPolicy::mask('X');
        assert_eq!(redact(&span("123-45-6789", Some(4)), &policy), "XXXXXXX6789");
        assert_eq!(redact(&span("a@b.com", None), &policy), "XXXXXXX");
    }

    #[test]
    fn test_full_mask_ignores_hint() {
        let policy = RedactionPolicy::full_mask('*');
        assert_eq!(redact(&span("123-45-6789", Some(4)), &policy), "***********");
    }

    #[test]
    fn test_mask_hides_spans_not_longer_than_hint() {
        let policy = RedactionPolicy::mask('#');
        assert_eq!(redact(&span("1234", Some(4)), &policy), "####");
        assert_eq!(redact(&span("123", Some(4)), &policy), "###");
    }

    #[test]
    fn test_mask_counts_characters_not_bytes() {
        let policy = RedactionPolicy::mask('•');
        assert_eq!(redact(&span("héllo", Some(2)), &policy), "•••lo");
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("remove".parse::<RedactionPolicy>().unwrap(), RedactionPolicy::Remove);
        assert_eq!("token".parse::<RedactionPolicy>().unwrap(), RedactionPolicy::token(DEFAULT_TOKEN));
        assert_eq!("Token=<gone>".parse::<RedactionPolicy>().unwrap(), RedactionPolicy::token("<gone>"));
        assert_eq!("token=a=b".parse::<RedactionPolicy>().unwrap(), RedactionPolicy::token("a=b"));
        assert_eq!("mask".parse::<RedactionPolicy>().unwrap(), RedactionPolicy::mask('X'));
        assert_eq!("mask=*".parse::<RedactionPolicy>().unwrap(), RedactionPolicy::mask('*'));
        assert_eq!("mask-full=#".parse::<RedactionPolicy>().unwrap(), RedactionPolicy::full_mask('#'));

        assert!("mask=ab".parse::<RedactionPolicy>().is_err());
        assert!("mask=".parse::<RedactionPolicy>().is_err());
        assert!("token=".parse::<RedactionPolicy>().is_err());
        assert!("remove=1".parse::<RedactionPolicy>().is_err());
        assert!("shred".parse::<RedactionPolicy>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for policy in [
            RedactionPolicy::Remove,
            RedactionPolicy::token("[X]"),
            RedactionPolicy::mask('X'),
            RedactionPolicy::full_mask('*'),
        ] {
            assert_eq!(policy.to_string().parse::<RedactionPolicy>().unwrap(), policy);
        }
    }
}
