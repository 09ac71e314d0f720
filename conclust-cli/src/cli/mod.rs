//! Command-line interface orchestration for conclust.
//!
//! The CLI offers a `run` command that loads a condensed dissimilarity file
//! (plus optional links and members files), executes the clustering engine,
//! and renders the merge sequence, heights, and leaf order.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, RunCommand, render_summary, run_cli,
};
