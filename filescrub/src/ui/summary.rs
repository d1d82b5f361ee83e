// filescrub/src/ui/summary.rs
//! Human-readable summaries printed after a run.
//!
//! Color is only applied when the caller says the target supports it, so the
//! same functions serve terminals, pipes and tests.
//! License: MIT OR Apache-2.0

use owo_colors::OwoColorize;
use std::collections::BTreeMap;
use std::io::{self, Write};

use filescrub_core::PatternDefinition;

fn plural(count: usize) -> &'static str {
    if count == 1 { "match" } else { "matches" }
}

/// Prints per-pattern counts under `title`, followed by a total line.
pub fn print_summary<W: Write>(
    writer: &mut W,
    title: &str,
    counts: &BTreeMap<String, usize>,
    supports_color: bool,
) -> io::Result<()> {
    if counts.is_empty() {
        if supports_color {
            writeln!(writer, "{}", "No sensitive data found.".green())?;
        } else {
            writeln!(writer, "No sensitive data found.")?;
        }
        return Ok(());
    }

    if supports_color {
        writeln!(writer, "{}", format!("{}:", title).bold())?;
    } else {
        writeln!(writer, "{}:", title)?;
    }

    let width = counts.keys().map(|id| id.len()).max().unwrap_or(0);
    for (id, count) in counts {
        if supports_color {
            writeln!(writer, "  {:<width$}  {} {}", id.cyan(), count.yellow(), plural(*count), width = width)?;
        } else {
            writeln!(writer, "  {:<width$}  {} {}", id, count, plural(*count), width = width)?;
        }
    }

    let total: usize = counts.values().sum();
    if supports_color {
        writeln!(writer, "  {} {}", "Total:".bold(), total)?;
    } else {
        writeln!(writer, "  Total: {}", total)?;
    }
    Ok(())
}

/// Prints one block per pattern: id, origin, description and expression.
pub fn print_pattern_list<'a, W, I>(writer: &mut W, definitions: I, supports_color: bool) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a PatternDefinition>,
{
    for definition in definitions {
        let origin = if definition.is_builtin() { "built-in" } else { "user" };
        if supports_color {
            writeln!(writer, "{} ({})", definition.id().cyan().bold(), origin.dimmed())?;
        } else {
            writeln!(writer, "{} ({})", definition.id(), origin)?;
        }
        if !definition.description().is_empty() {
            writeln!(writer, "    {}", definition.description())?;
        }
        writeln!(writer, "    {}", definition.expression())?;
    }
    Ok(())
}
