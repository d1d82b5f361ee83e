// filescrub/src/commands/sanitize.rs
//! The `sanitize` command: rewrite an input with every active pattern redacted.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use is_terminal::IsTerminal;
use log::{debug, info};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use filescrub_core::{SanitizationResult, Sanitizer};

use crate::cli::SanitizeCommand;
use crate::commands::{
    STDIN_NAME, STDOUT_NAME, active_ids, build_registry, commit_temp, display_name, read_input, same_file,
    temp_file_for, validate_input_path, write_atomically, write_output,
};
use crate::ui::summary;

/// Machine-readable record of one sanitize run, written by `--report-json`.
#[derive(Debug, Serialize)]
pub struct SanitizeReport<'a> {
    pub input: String,
    pub output: String,
    pub policy: String,
    pub match_count: usize,
    pub matches_by_pattern: &'a BTreeMap<String, usize>,
    pub input_sha256: String,
    pub output_sha256: String,
    pub generated_at: DateTime<Utc>,
}

/// Running SHA-256 of what was read and what was written.
#[derive(Default)]
struct Digests {
    input: Sha256,
    output: Sha256,
}

impl Digests {
    fn finish(self) -> (String, String) {
        (hex::encode(self.input.finalize()), hex::encode(self.output.finalize()))
    }
}

pub fn run_sanitize(cmd: &SanitizeCommand, quiet: bool) -> Result<()> {
    info!("Starting sanitize operation.");
    let registry = build_registry(&cmd.patterns)?;
    let ids = active_ids(&registry, &cmd.patterns)?;
    let sanitizer = Sanitizer::new(&registry, &ids, cmd.resolved_policy())?;

    let input = cmd.input.as_deref();
    let output: Option<&Path> = if cmd.in_place { input } else { cmd.output.as_deref() };
    let input_name = display_name(input, STDIN_NAME);
    let output_name = display_name(output, STDOUT_NAME);

    // Writing straight into the file being read would truncate it first.
    let replaces_input = cmd.in_place
        || match (input, output) {
            (Some(input), Some(output)) => same_file(input, output),
            _ => false,
        };
    if replaces_input && !cmd.in_place {
        info!("Output is the input file; rewriting it in place.");
    }

    let mut digests = Digests::default();
    let result = if cmd.line_buffered {
        sanitize_line_buffered(&sanitizer, input, output, replaces_input, &mut digests)?
    } else {
        let text = read_input(input)?;
        let result = sanitizer.sanitize(&text);
        digests.input.update(text.as_bytes());
        digests.output.update(result.output_text.as_bytes());
        match output {
            Some(path) if replaces_input => write_atomically(path, &result.output_text)?,
            _ => write_output(output, &result.output_text)?,
        }
        result
    };
    debug!("Sanitize produced {} match(es).", result.match_count);

    if let Some(report_path) = &cmd.report_json {
        let (input_sha256, output_sha256) = digests.finish();
        let report = SanitizeReport {
            input: input_name.clone(),
            output: output_name.clone(),
            policy: sanitizer.policy().to_string(),
            match_count: result.match_count,
            matches_by_pattern: &result.matches_by_pattern,
            input_sha256,
            output_sha256,
            generated_at: Utc::now(),
        };
        write_report(report_path, &report)?;
    }

    if !cmd.no_summary && !quiet {
        let stderr = io::stderr();
        let supports_color = stderr.is_terminal();
        summary::print_summary(&mut stderr.lock(), "Redaction Summary", &result.matches_by_pattern, supports_color)?;
    }

    info!("Successfully sanitized file: {} -> {}", input_name, output_name);
    Ok(())
}

fn write_report(path: &Path, report: &SanitizeReport<'_>) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    fs::write(path, json).with_context(|| format!("Failed to write report: {}", path.display()))?;
    info!("Report written to {}", path.display());
    Ok(())
}

/// Streams the input line by line, flushing each sanitized line as it is produced.
///
/// With `replaces_input` the lines go to a temporary file that is moved over
/// the output only after the whole input was read.
fn sanitize_line_buffered(
    sanitizer: &Sanitizer<'_>,
    input: Option<&Path>,
    output: Option<&Path>,
    replaces_input: bool,
    digests: &mut Digests,
) -> Result<SanitizationResult> {
    let mut reader: Box<dyn BufRead> = match input {
        Some(path) => {
            validate_input_path(path)?;
            let file = File::open(path).with_context(|| format!("Failed to open input file: {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let mut temp = match output {
        Some(path) if replaces_input => Some(temp_file_for(path)?),
        _ => None,
    };

    let totals = {
        let mut writer: Box<dyn Write + '_> = match (temp.as_mut(), output) {
            (Some(tmp), _) => Box::new(BufWriter::new(tmp.as_file_mut())),
            (None, Some(path)) => {
                let file =
                    File::create(path).with_context(|| format!("Failed to create output file: {}", path.display()))?;
                Box::new(BufWriter::new(file))
            }
            (None, None) => Box::new(io::stdout().lock()),
        };
        stream_lines(sanitizer, &mut reader, &mut writer, digests)
    };
    drop(reader);

    // An uncommitted temp file is deleted when dropped.
    let totals = totals?;
    if let (Some(tmp), Some(path)) = (temp, output) {
        commit_temp(tmp, path)?;
    }
    Ok(totals)
}

fn stream_lines(
    sanitizer: &Sanitizer<'_>,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    digests: &mut Digests,
) -> Result<SanitizationResult> {
    let mut totals = SanitizationResult::default();
    let mut line = String::new();
    loop {
        line.clear();
        let read = reader.read_line(&mut line).context("Failed to read input line")?;
        if read == 0 {
            break;
        }
        let result = sanitizer.sanitize(&line);
        writer.write_all(result.output_text.as_bytes()).context("Failed to write output line")?;
        writer.flush().context("Failed to flush output")?;

        digests.input.update(line.as_bytes());
        digests.output.update(result.output_text.as_bytes());
        totals.absorb(&result);
    }
    Ok(totals)
}
