// filescrub-core/src/redaction_log.rs
//! Debug logging of match events without leaking the matched content.
//!
//! Matched text is sensitive by definition. Unless the
//! `FILESCRUB_ALLOW_DEBUG_PII` environment variable is set to `true`, every
//! helper here replaces it with a placeholder that only reveals its length.

use lazy_static::lazy_static;
use log::debug;

lazy_static! {
    /// Read once: whether matched content may appear verbatim in debug logs.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("FILESCRUB_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// Replaces sensitive content with a placeholder. Short values do not reveal
/// their length.
pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    let len = s.chars().count();
    if len <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", len)
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub(crate) fn log_captured_match_debug(pattern_id: &str, start: usize, end: usize, original: &str) {
    debug!(
        "Captured match for pattern '{}' at {}..{}: '{}'",
        pattern_id,
        start,
        end,
        get_loggable_content(original)
    );
}

pub(crate) fn log_rejected_candidate_debug(pattern_id: &str, start: usize, end: usize, reason: &str) {
    debug!(
        "Dropped candidate for pattern '{}' at {}..{}: {}",
        pattern_id, start, end, reason
    );
}

pub(crate) fn log_redaction_action_debug(pattern_id: &str, original: &str, replacement: &str) {
    debug!(
        "Redaction action: Original='{}', Redacted='{}' for pattern '{}'",
        get_loggable_content(original),
        replacement,
        pattern_id
    );
}
