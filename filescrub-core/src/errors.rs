//! errors.rs - Custom error types for the filescrub-core library.
//!
//! Registration and resolution of patterns are the only fallible steps of the
//! engine; matching and redaction operate on validated inputs and cannot fail.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// All error kinds surfaced by `filescrub-core`.
///
/// Marked `#[non_exhaustive]` so new variants can be added without breaking
/// downstream `match` statements.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScrubError {
    /// The expression is malformed, too long, or able to match an empty span.
    #[error("Invalid pattern '{id}': {reason}")]
    InvalidPattern { id: String, reason: String },

    #[error("Pattern id '{0}' is already registered")]
    DuplicateId(String),

    #[error("Unknown pattern id '{0}'")]
    UnknownPattern(String),

    /// A record of a tab-separated pattern file could not be parsed.
    #[error("Malformed pattern record on line {line}: {reason}")]
    PatternFile { line: usize, reason: String },
}

impl ScrubError {
    pub(crate) fn invalid(id: impl Into<String>, reason: impl Into<String>) -> Self {
        ScrubError::InvalidPattern {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// The pattern id this error refers to, when there is one.
    pub fn pattern_id(&self) -> Option<&str> {
        match self {
            ScrubError::InvalidPattern { id, .. } => Some(id),
            ScrubError::DuplicateId(id) | ScrubError::UnknownPattern(id) => Some(id),
            ScrubError::PatternFile { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_pattern() {
        let err = ScrubError::invalid("digits", "pattern can match an empty string");
        assert_eq!(
            err.to_string(),
            "Invalid pattern 'digits': pattern can match an empty string"
        );
        assert_eq!(err.pattern_id(), Some("digits"));
        assert_eq!(ScrubError::UnknownPattern("x".into()).pattern_id(), Some("x"));
        assert_eq!(
            ScrubError::PatternFile { line: 3, reason: "missing expression".into() }.pattern_id(),
            None
        );
    }
}
