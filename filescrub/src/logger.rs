// filescrub/src/logger.rs
//! Logger setup for the `filescrub` binary.
//!
//! Logs go to stderr so they never mix with sanitized output on stdout.
//! License: MIT OR Apache-2.0

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initializes `env_logger`.
///
/// With `Some(level)` the level is forced and `RUST_LOG` is ignored. With
/// `None`, `RUST_LOG` applies and falls back to `info`. Calling this more than
/// once is harmless; later calls are ignored.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = match level {
        Some(level) => {
            let mut builder = Builder::new();
            builder.filter_level(level);
            builder
        }
        None => Builder::from_env(Env::default().default_filter_or("info")),
    };

    builder
        .target(Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .try_init()
        .ok();
}
