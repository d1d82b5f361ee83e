// filescrub-core/src/lib.rs
//! # filescrub Core Library
//!
//! `filescrub-core` is the pattern-matching and redaction engine behind the
//! `filescrub` CLI. Given a registry of named patterns and a redaction policy,
//! it finds sensitive substrings in text and rewrites them, leaving every other
//! byte untouched.
//!
//! The library does no I/O of its own beyond loading pattern files on request.
//! Callers hand it decoded text and receive a [`SanitizationResult`].
//!
//! ## Modules
//!
//! * `config`: [`PatternSpec`] / [`PatternConfig`], the built-in YAML and user pattern files.
//! * `engine`: the [`PatternCompiler`] / [`CompiledPattern`] capability traits.
//! * `engines`: concrete backends, currently [`RegexCompiler`].
//! * `registry`: [`PatternRegistry`], compiled and validated definitions.
//! * `matcher`: [`find_matches`], multi-pattern matching with overlap resolution.
//! * `redactor`: [`RedactionPolicy`] and [`redact`].
//! * `pipeline`: [`Sanitizer`] and [`sanitize`].
//! * `validators`: Luhn and SSN checks used by the built-ins.
//! * `redaction_log`: debug logging that never prints matched content by default.
//! * `errors`: [`ScrubError`].
//!
//! ## Usage Example
//!
//! ```rust
//! use filescrub_core::{sanitize, PatternRegistry, RedactionPolicy};
//!
//! fn main() -> anyhow::Result<()> {
//!     let registry = PatternRegistry::with_builtins()?;
//!     let result = sanitize(
//!         "Contact me at a@b.com or 4111111111111111",
//!         &registry,
//!         &["email", "credit_card"],
//!         &RedactionPolicy::token("[REDACTED]"),
//!     )?;
//!
//!     assert_eq!(result.output_text, "Contact me at [REDACTED] or [REDACTED]");
//!     assert_eq!(result.match_count, 2);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Registration and resolution return [`ScrubError`]. Matching and redaction
//! cannot fail. Loading pattern files returns `anyhow::Error` with file context.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod matcher;
pub mod pipeline;
pub mod redaction_log;
pub mod redactor;
pub mod registry;
pub mod validators;

/// Pattern specs and pattern file loading.
pub use config::{PatternConfig, PatternSpec, MAX_PATTERN_LENGTH};

/// The matching capability and its default backend.
pub use engine::{CompiledPattern, PatternCompiler, PatternFlags};
pub use engines::regex_engine::RegexCompiler;

pub use errors::ScrubError;

pub use matcher::{find_matches, MatchSet, MatchSpan};
pub use pipeline::{sanitize, splice, SanitizationResult, Sanitizer};
pub use redaction_log::redact_sensitive;
pub use redactor::{redact, ParsePolicyError, RedactionPolicy, DEFAULT_MASK_CHAR, DEFAULT_TOKEN};
pub use registry::{PatternDefinition, PatternRegistry, RegistrationMode};
pub use validators::Validator;
