// filescrub-core/src/engines/mod.rs
//! Concrete [`PatternCompiler`](crate::engine::PatternCompiler) backends.
//!
//! Each backend lives in its own file and is declared here.

pub mod regex_engine;
