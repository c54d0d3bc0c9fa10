use super::Cleaner;
use crate::error::Result;
use crate::runner::recipe::PreparedCommand;
use crate::utils::{expand_paths, fs::remove_file_if_exists};
use std::path::{Path, PathBuf};

/// Deletes files matching glob patterns below a target directory.
#[derive(Debug, Clone)]
pub struct GlobCleaner {
    target_directory: PathBuf,
    patterns: Vec<String>,
    recursive: bool,
}

impl GlobCleaner {
    /// Cleaner for `patterns` relative to `target_directory`.
    pub fn new(target_directory: &Path, patterns: Vec<String>, recursive: bool) -> Self {
        Self {
            target_directory: target_directory.to_path_buf(),
            patterns,
            recursive,
        }
    }
}

impl Cleaner for GlobCleaner {
    fn make_commands(&self) -> Result<Vec<PreparedCommand>> {
        Ok(Vec::new())
    }

    fn run(&self) -> Result<()> {
        log::debug!(
            "Cleaning up {} with {} glob pattern(s)",
            self.target_directory.display(),
            self.patterns.len()
        );

        let files = expand_paths(&self.target_directory, &self.patterns, self.recursive)?;
        let mut removed = 0;
        for file in &files {
            if remove_file_if_exists(&file.path)? {
                removed += 1;
            }
        }

        log::debug!(
            "Removed {} file(s) from {}",
            removed,
            self.target_directory.display()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "glob"
    }
}
