//! Command-line interface definitions and handlers for the repmin CLI.

pub mod args;
pub mod build;
pub mod classify;
pub mod inspect;

pub use args::{Cli, Commands};
pub use build::{run_build, run_from_config};
pub use classify::{run_classify, run_locate};
pub use inspect::run_stats;
