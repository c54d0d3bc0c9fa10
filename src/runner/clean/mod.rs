//! Removal of intermediate files after a build.
//!
//! Three strategies implement [`Cleaner`]:
//!
//! - [`GlobCleaner`] deletes files matching patterns in the target directory
//! - [`CommandCleaner`] runs a clean recipe, `latexmk -C` by default
//! - [`NoopCleaner`] does nothing, used when no strategy is configured
//!
//! [`select`] maps a validated [`CleanupStrategy`] onto one of them.

mod command;
mod glob;

pub use self::command::CommandCleaner;
pub use self::glob::GlobCleaner;

use super::recipe::PreparedCommand;
use crate::config::{CleanupStrategy, Defaults};
use crate::error::Result;
use std::path::Path;

/// A cleanup strategy for one target directory.
pub trait Cleaner {
    /// Commands this cleaner would run; empty for strategies working on the file system directly.
    fn make_commands(&self) -> Result<Vec<PreparedCommand>>;

    /// Performs the cleanup.
    fn run(&self) -> Result<()>;

    /// Short name for log output.
    fn name(&self) -> &'static str;
}

/// Cleaner that leaves everything in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCleaner;

impl Cleaner for NoopCleaner {
    fn make_commands(&self) -> Result<Vec<PreparedCommand>> {
        Ok(Vec::new())
    }

    fn run(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Builds the cleaner for `strategy` working on `target_directory`.
///
/// `filename` is the document the clean recipe is pointed at.
pub fn select(
    strategy: &CleanupStrategy,
    target_directory: &Path,
    filename: &Path,
    quiet: bool,
    defaults: &Defaults,
) -> Box<dyn Cleaner> {
    match strategy {
        CleanupStrategy::None => Box::new(NoopCleaner),
        CleanupStrategy::Glob {
            patterns,
            recursive,
        } => {
            let patterns = if patterns.is_empty() {
                defaults.cleanup_patterns.clone()
            } else {
                patterns.clone()
            };
            Box::new(GlobCleaner::new(target_directory, patterns, *recursive))
        }
        CleanupStrategy::Command { recipe } => Box::new(CommandCleaner::new(
            recipe.clone(),
            defaults.clean_recipe(),
            target_directory,
            filename,
            quiet,
        )),
    }
}
