//! Command line interface for assignmentctl.
//!
//! Parses arguments, locates the workspace configuration and dispatches to the
//! `build` and `bundle` commands.

mod args;
pub mod commands;

pub use args::{Args, BuildArgs, BundleArgs, Commands};

use crate::context::AppContext;
use anyhow::{Context, Result};

/// Runs the parsed command in the workspace around the current directory.
pub fn run(args: &Args) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    let ctx = AppContext::discover(&cwd)?;
    run_in(&ctx, args)
}

/// Runs the parsed command in an already loaded context.
pub fn run_in(ctx: &AppContext, args: &Args) -> Result<()> {
    match &args.command {
        Commands::Build(build) => commands::build::execute(ctx, build),
        Commands::Bundle(bundle) => commands::bundle::execute(ctx, bundle),
    }
}

/// Default log filter for the verbosity flag.
pub fn log_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}
