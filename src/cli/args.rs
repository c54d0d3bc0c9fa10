//! Command line argument parsing and validation.

use crate::assignment::PREFIX;
use crate::bundler::Backend;
use crate::error::CliError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build LaTeX assignments and bundle them for submission
#[derive(Parser, Debug)]
#[command(
    name = "assignmentctl",
    version,
    about = "Build LaTeX assignments and bundle them for submission",
    long_about = "Builds assignment-<NN>/assignment.tex with a configurable recipe, exports the PDF to
dist/assignment-<NN>.pdf, cleans up intermediate files and bundles the PDF together with
additional files into zip, tar or tar.gz archives.

The workspace is the nearest directory at or above the current one containing .assignments.toml.

Usage:
  assignmentctl build 3
  assignmentctl build --all --quiet
  assignmentctl bundle --tar --gzip 3"
)]
pub struct Args {
    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build an assignment from source
    Build(BuildArgs),
    /// Bundle an exported assignment with additional files into an archive
    Bundle(BundleArgs),
}

/// Arguments of `build`
#[derive(clap::Args, Debug, Default)]
pub struct BuildArgs {
    /// Assignment number, defaults to the current assignment of the configuration
    #[arg(value_name = "ASSIGNMENT", value_parser = parse_assignment_number)]
    pub assignment: Option<u32>,

    /// Build all assignments in assignment-*/
    #[arg(short, long)]
    pub all: bool,

    /// Build this file, or assignment.tex inside this directory
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Override an existing exported PDF
    #[arg(long)]
    pub force: bool,

    /// Keep intermediate files instead of cleaning up
    #[arg(long)]
    pub keep: bool,

    /// Suppress output of the compiler
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments of `bundle`
#[derive(clap::Args, Debug, Default)]
pub struct BundleArgs {
    /// Assignment number, defaults to the current assignment of the configuration
    #[arg(value_name = "ASSIGNMENT", value_parser = parse_assignment_number)]
    pub assignment: Option<u32>,

    /// Bundle all exported assignments
    #[arg(short, long)]
    pub all: bool,

    /// Override existing archives with the same name
    #[arg(short, long)]
    pub force: bool,

    /// Use tar as archive format
    #[arg(long)]
    pub tar: bool,

    /// Compress the tar archive with gzip, requires --tar
    #[arg(long)]
    pub gzip: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl BuildArgs {
    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), CliError> {
        if self.all && self.assignment.is_some() {
            return Err(conflict("--all", "a specific assignment"));
        }
        if self.file.is_some() && self.assignment.is_some() {
            return Err(conflict("--file", "a specific assignment"));
        }
        if self.file.is_some() && self.all {
            return Err(conflict("--file", "--all"));
        }
        Ok(())
    }
}

impl BundleArgs {
    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), CliError> {
        if self.all && self.assignment.is_some() {
            return Err(conflict("--all", "a specific assignment"));
        }
        if self.gzip && !self.tar {
            return Err(CliError::MissingDependency {
                flag: "--gzip".into(),
                requires: "--tar".into(),
            });
        }
        Ok(())
    }

    /// Archive format selected by the flags.
    pub fn backend(&self) -> Backend {
        Backend::from_flags(self.tar, self.gzip)
    }
}

fn conflict(first: &str, second: &str) -> CliError {
    CliError::ConflictingArguments {
        first: first.into(),
        second: second.into(),
    }
}

/// Accepts `3`, `03` and `assignment-03`.
fn parse_assignment_number(value: &str) -> Result<u32, String> {
    let digits = value.strip_prefix(PREFIX).unwrap_or(value);
    digits
        .parse()
        .map_err(|_| format!("{value:?} is not an assignment number"))
}
