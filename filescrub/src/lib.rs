// filescrub/src/lib.rs
//! # filescrub CLI Application
//!
//! Command-line front end for `filescrub-core`. The binary in `main.rs` only
//! parses arguments, sets up logging and calls [`run`]; everything else lives
//! here so it can be exercised from tests.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;

use anyhow::Result;

use crate::cli::{Cli, Commands};

/// Dispatches a parsed command line.
pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Sanitize(cmd) => commands::sanitize::run_sanitize(cmd, cli.quiet),
        Commands::Scan(cmd) => commands::scan::run_scan(cmd, cli.quiet),
        Commands::Patterns(cmd) => commands::patterns::run_patterns(cmd),
    }
}
