// filescrub/src/main.rs
//! filescrub entry point.

use clap::Parser;
use log::error;
use std::process::ExitCode;

use filescrub::cli::Cli;
use filescrub::logger;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_logger(cli.log_filter());

    match filescrub::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
