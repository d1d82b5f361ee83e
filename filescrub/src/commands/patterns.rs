// filescrub/src/commands/patterns.rs
//! The `patterns` command: list what is registered.

use anyhow::Result;
use is_terminal::IsTerminal;
use std::io;

use crate::cli::PatternsCommand;
use crate::commands::build_registry;
use crate::ui::summary;

pub fn run_patterns(cmd: &PatternsCommand) -> Result<()> {
    let registry = build_registry(&cmd.patterns)?;
    let stdout = io::stdout();
    let supports_color = stdout.is_terminal();
    summary::print_pattern_list(&mut stdout.lock(), registry.iter(), supports_color)?;
    Ok(())
}
