// filescrub/src/commands/scan.rs
//! The `scan` command: report what would be redacted without rewriting anything.

use anyhow::{Result, bail};
use is_terminal::IsTerminal;
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

use filescrub_core::{MatchSet, find_matches};

use crate::cli::ScanCommand;
use crate::commands::{STDIN_NAME, active_ids, build_registry, display_name, read_input};
use crate::ui::summary;

/// One finding. Positions only; the matched text is deliberately absent.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Finding {
    pub pattern_id: String,
    /// 1-based line of the first byte of the match.
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub input: String,
    pub match_count: usize,
    pub matches_by_pattern: BTreeMap<String, usize>,
    pub findings: Vec<Finding>,
}

impl ScanReport {
    pub fn new(input: String, text: &str, matches: &MatchSet) -> Self {
        let mut findings = Vec::with_capacity(matches.len());
        let mut line = 1;
        let mut scanned = 0;
        for span in matches {
            line += text.as_bytes()[scanned..span.start].iter().filter(|b| **b == b'\n').count();
            scanned = span.start;
            findings.push(Finding { pattern_id: span.pattern_id.clone(), line, start: span.start, end: span.end });
        }

        Self {
            input,
            match_count: matches.len(),
            matches_by_pattern: matches.counts_by_pattern(),
            findings,
        }
    }
}

pub fn run_scan(cmd: &ScanCommand, quiet: bool) -> Result<()> {
    info!("Starting scan operation.");
    let registry = build_registry(&cmd.patterns)?;
    let ids = active_ids(&registry, &cmd.patterns)?;
    let patterns = registry.resolve(&ids)?;

    let text = read_input(cmd.input.as_deref())?;
    let matches = find_matches(&text, &patterns);
    let report = ScanReport::new(display_name(cmd.input.as_deref(), STDIN_NAME), &text, &matches);

    if cmd.json {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writeln!(writer)?;
    } else if !quiet {
        let stderr = io::stderr();
        let supports_color = stderr.is_terminal();
        summary::print_summary(&mut stderr.lock(), "Scan Summary", &report.matches_by_pattern, supports_color)?;
    }

    if let Some(threshold) = cmd.fail_over_threshold {
        if report.match_count > threshold {
            bail!(
                "Found {} match(es) in {}, exceeding the threshold of {}",
                report.match_count,
                report.input,
                threshold
            );
        }
    }

    info!("Scan complete: {} match(es) in {}", report.match_count, report.input);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use filescrub_core::PatternRegistry;

    #[test]
    fn findings_carry_line_numbers_but_no_text() {
        let registry = PatternRegistry::with_builtins().unwrap();
        let text = "first a@b.com\nsecond\nthird 123-45-6789 and c@d.org\n";
        let matches = find_matches(text, &registry.resolve_all());
        let report = ScanReport::new("t".into(), text, &matches);

        let lines: Vec<(usize, &str)> = report.findings.iter().map(|f| (f.line, f.pattern_id.as_str())).collect();
        assert_eq!(lines, vec![(1, "email"), (3, "us_ssn"), (3, "email")]);

        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("a@b.com"));
        assert!(!json.contains("6789"));
    }
}
