//! Configuration management for `filescrub-core`.
//!
//! This module defines [`PatternSpec`], the uncompiled description of a pattern,
//! and [`PatternConfig`], a list of them. Specs come from three places: the
//! embedded built-in YAML document, user YAML files, and user tab-separated
//! files with one `id<TAB>expression<TAB>description` record per line.
//!
//! License: MIT OR Apache-2.0

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::engine::PatternFlags;
use crate::errors::ScrubError;
use crate::validators::Validator;

/// Maximum allowed length for an expression string.
pub const MAX_PATTERN_LENGTH: usize = 500;

const BUILTIN_PATTERNS_YAML: &str = include_str!("../config/builtin_patterns.yaml");

static BUILTIN_PATTERNS: Lazy<std::result::Result<PatternConfig, String>> = Lazy::new(|| {
    serde_yml::from_str::<PatternConfig>(BUILTIN_PATTERNS_YAML).map_err(|e| e.to_string())
});

/// A single pattern as written by a user or shipped as a built-in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternSpec {
    /// Unique identifier (e.g. `"email"`).
    pub id: String,
    /// The regular expression source.
    pub expression: String,
    /// Human-readable description of what the pattern targets.
    pub description: String,
    #[serde(flatten)]
    pub flags: PatternFlags,
    /// Number of trailing characters a mask policy may leave visible.
    pub preserve_suffix: Option<usize>,
    /// Programmatic check a candidate must pass after matching.
    pub validator: Option<Validator>,
}

impl PatternSpec {
    pub fn new(id: impl Into<String>, expression: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            expression: expression.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_flags(mut self, flags: PatternFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_preserve_suffix(mut self, count: usize) -> Self {
        self.preserve_suffix = Some(count);
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }
}

/// An ordered list of pattern specs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PatternConfig {
    #[serde(default)]
    pub patterns: Vec<PatternSpec>,
}

impl PatternConfig {
    /// Returns the built-in detectors, parsed once from the embedded YAML.
    pub fn load_builtin() -> Result<Self> {
        debug!("Loading built-in patterns from embedded string...");
        let config = BUILTIN_PATTERNS
            .as_ref()
            .map_err(|e| anyhow!("Failed to parse built-in patterns: {}", e))?
            .clone();
        debug!("Loaded {} built-in patterns.", config.patterns.len());
        Ok(config)
    }

    /// Loads user patterns from a file.
    ///
    /// Files ending in `.yaml` or `.yml` are parsed as YAML; anything else is
    /// read as tab-separated records.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading user patterns from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pattern file {}", path.display()))?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let config = if is_yaml {
            Self::from_yaml_str(&text)
        } else {
            Self::from_tsv_str(&text).map_err(anyhow::Error::from)
        }
        .with_context(|| format!("Failed to parse pattern file {}", path.display()))?;

        info!("Loaded {} patterns from file {}.", config.patterns.len(), path.display());
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: PatternConfig = serde_yml::from_str(text).context("Invalid YAML pattern document")?;
        Ok(config)
    }

    /// Parses `id<TAB>expression[<TAB>description]` records.
    ///
    /// Blank lines and lines whose first non-blank character is `#` are skipped.
    /// The expression column is taken verbatim apart from a trailing `\r`.
    pub fn from_tsv_str(text: &str) -> std::result::Result<Self, ScrubError> {
        let mut patterns = Vec::new();

        for (index, raw_line) in text.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut columns = line.splitn(3, '\t');
            let id = columns.next().unwrap_or_default().trim();
            let expression = columns.next().unwrap_or_default();
            let description = columns.next().unwrap_or_default().trim();

            if id.is_empty() {
                return Err(ScrubError::PatternFile {
                    line: line_number,
                    reason: "missing pattern id".to_string(),
                });
            }
            if expression.is_empty() {
                return Err(ScrubError::PatternFile {
                    line: line_number,
                    reason: format!("pattern '{}' has no expression column", id),
                });
            }

            patterns.push(PatternSpec::new(id, expression, description));
        }

        Ok(PatternConfig { patterns })
    }
}
