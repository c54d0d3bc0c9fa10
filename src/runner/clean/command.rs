use super::Cleaner;
use crate::config::Recipe;
use crate::error::Result;
use crate::runner::recipe::{PreparedCommand, build_commands, run_commands};
use std::path::{Path, PathBuf};

/// Runs a clean recipe in the target directory.
#[derive(Debug, Clone)]
pub struct CommandCleaner {
    recipe: Option<Recipe>,
    fallback: Recipe,
    target_directory: PathBuf,
    filename: PathBuf,
    quiet: bool,
}

impl CommandCleaner {
    /// Cleaner running `recipe`, or `fallback` when it is missing or empty.
    pub fn new(
        recipe: Option<Recipe>,
        fallback: Recipe,
        target_directory: &Path,
        filename: &Path,
        quiet: bool,
    ) -> Self {
        Self {
            recipe,
            fallback,
            target_directory: target_directory.to_path_buf(),
            filename: filename.to_path_buf(),
            quiet,
        }
    }
}

impl Cleaner for CommandCleaner {
    fn make_commands(&self) -> Result<Vec<PreparedCommand>> {
        build_commands(
            self.recipe.as_ref(),
            self.fallback.clone(),
            &self.target_directory,
            &self.filename,
            self.quiet,
        )
    }

    fn run(&self) -> Result<()> {
        log::debug!(
            "Cleaning up {} with clean recipe",
            self.target_directory.display()
        );
        let commands = self.make_commands()?;
        run_commands(&commands)
    }

    fn name(&self) -> &'static str {
        "command"
    }
}
