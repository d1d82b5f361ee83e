// filescrub/src/cli.rs
//! This file defines the command-line interface (CLI) for the filescrub application,
//! including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

use filescrub_core::RedactionPolicy;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "filescrub",
    version = env!("CARGO_PKG_VERSION"),
    about = "Scrub personally identifiable information from text files",
    long_about = "filescrub finds personally identifiable information (email addresses, payment card numbers, US Social Security Numbers and any pattern you supply) in a text file or stream and removes, replaces or masks it. Everything that is not a match is copied through byte for byte.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Explicit log level; overrides RUST_LOG, --quiet and --debug.
    #[arg(long = "log-level", value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Only log errors.
    #[arg(long, short = 'q', global = true, conflicts_with = "debug")]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long, short = 'd', global = true)]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The level the logger should be forced to, or `None` to honor `RUST_LOG`.
    pub fn log_filter(&self) -> Option<LevelFilter> {
        if let Some(level) = self.log_level {
            return Some(level.into());
        }
        if self.quiet {
            Some(LevelFilter::Error)
        } else if self.debug {
            Some(LevelFilter::Debug)
        } else {
            None
        }
    }
}

/// All available commands for the `filescrub` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sanitizes an input file or stdin and writes the result.
    Sanitize(SanitizeCommand),

    /// Reports sensitive data found in an input without rewriting it.
    Scan(ScanCommand),

    /// Lists the registered patterns.
    Patterns(PatternsCommand),
}

/// Pattern selection shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct PatternArgs {
    /// Extra regular expression to detect, registered as custom_1, custom_2, ...
    #[arg(long = "pattern", value_name = "REGEX")]
    pub patterns: Vec<String>,

    /// Extra regular expression registered under an explicit id.
    #[arg(long = "named-pattern", value_name = "ID=REGEX", value_parser = parse_named_pattern)]
    pub named_patterns: Vec<NamedPattern>,

    /// YAML (.yaml/.yml) or tab-separated file of user patterns.
    #[arg(long = "patterns-file", value_name = "FILE", env = "FILESCRUB_PATTERNS_FILE")]
    pub patterns_file: Option<PathBuf>,

    /// Activate only these pattern ids (comma-separated).
    #[arg(long, short = 'e', value_delimiter = ',', value_name = "ID")]
    pub enable: Vec<String>,

    /// Deactivate these pattern ids (comma-separated).
    #[arg(long, short = 'x', value_delimiter = ',', value_name = "ID")]
    pub disable: Vec<String>,

    /// Do not register the built-in patterns.
    #[arg(long = "no-builtins")]
    pub no_builtins: bool,

    /// Skip user patterns that fail to compile instead of aborting.
    #[arg(long = "skip-invalid")]
    pub skip_invalid: bool,

    /// Let user patterns replace registered patterns with the same id.
    #[arg(long)]
    pub overwrite: bool,
}

/// A `--named-pattern` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedPattern {
    pub id: String,
    pub expression: String,
}

/// Splits `ID=REGEX` at the first `=`.
pub fn parse_named_pattern(value: &str) -> Result<NamedPattern, String> {
    match value.split_once('=') {
        Some((id, expression)) if !id.trim().is_empty() && !expression.is_empty() => Ok(NamedPattern {
            id: id.trim().to_string(),
            expression: expression.to_string(),
        }),
        _ => Err(format!("expected ID=REGEX, got '{}'", value)),
    }
}

/// Arguments for the `sanitize` command.
#[derive(Args, Debug)]
pub struct SanitizeCommand {
    /// Input file (reads stdin if not provided).
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output file (writes stdout if not provided).
    #[arg(value_name = "OUTPUT", conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Rewrite INPUT in place through a temporary file.
    #[arg(long = "in-place", requires = "input")]
    pub in_place: bool,

    /// remove | token[=TEXT] | mask[=CHAR] | mask-full[=CHAR]
    #[arg(long, value_name = "POLICY", env = "FILESCRUB_POLICY")]
    pub policy: Option<RedactionPolicy>,

    /// Replace matches with [REDACTED]. Takes precedence over --policy.
    #[arg(long)]
    pub redact: bool,

    /// Process the input line by line, flushing after each line. Patterns
    /// cannot match across line breaks in this mode.
    #[arg(long = "line-buffered")]
    pub line_buffered: bool,

    /// Suppress the redaction summary.
    #[arg(long = "no-summary")]
    pub no_summary: bool,

    /// Write a JSON report (counts, SHA-256 of input and output, timestamp).
    #[arg(long = "report-json", value_name = "FILE")]
    pub report_json: Option<PathBuf>,

    #[command(flatten)]
    pub patterns: PatternArgs,
}

impl SanitizeCommand {
    /// The policy for this run. Without `--redact` or `--policy` matches are removed.
    pub fn resolved_policy(&self) -> RedactionPolicy {
        if self.redact {
            RedactionPolicy::token(filescrub_core::DEFAULT_TOKEN)
        } else {
            self.policy.clone().unwrap_or(RedactionPolicy::Remove)
        }
    }
}

/// Arguments for the `scan` command.
#[derive(Args, Debug)]
pub struct ScanCommand {
    /// Input file (reads stdin if not provided).
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Print the findings to stdout as JSON. Matched text is never included.
    #[arg(long)]
    pub json: bool,

    /// Exit with a non-zero code if more than N matches are found.
    #[arg(long = "fail-over-threshold", value_name = "N")]
    pub fail_over_threshold: Option<usize>,

    #[command(flatten)]
    pub patterns: PatternArgs,
}

/// Arguments for the `patterns` command.
#[derive(Args, Debug)]
pub struct PatternsCommand {
    #[command(flatten)]
    pub patterns: PatternArgs,
}

/// Values accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Off => LevelFilter::Off,
        }
    }
}
