//! Cleanup configuration and strategy selection.

use super::Recipe;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// `[build.cleanup]` section. At most one of the two tables may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupOptions {
    /// Delete files matching patterns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glob: Option<GlobCleanupOptions>,
    /// Run a clean recipe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandCleanupOptions>,
}

/// `[build.cleanup.glob]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobCleanupOptions {
    /// Also match inside sub-directories
    #[serde(default)]
    pub recursive: bool,
    /// Patterns relative to the target directory; empty means the built-in list
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// `[build.cleanup.command]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandCleanupOptions {
    /// Clean recipe; missing or empty means `latexmk -C`
    #[serde(default)]
    pub recipe: Option<Recipe>,
}

/// Validated cleanup strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupStrategy {
    /// Leave intermediate files alone
    None,
    /// Delete files matching patterns
    Glob {
        /// Configured patterns, possibly empty
        patterns: Vec<String>,
        /// Descend into sub-directories
        recursive: bool,
    },
    /// Run a clean recipe
    Command {
        /// Configured recipe, if any
        recipe: Option<Recipe>,
    },
}

impl CleanupOptions {
    /// Resolves the configured strategy, rejecting ambiguous configuration.
    pub fn strategy(&self) -> Result<CleanupStrategy> {
        match (&self.glob, &self.command) {
            (Some(_), Some(_)) => Err(Error::AmbiguousCleanup),
            (Some(glob), None) => Ok(CleanupStrategy::Glob {
                patterns: glob.patterns.clone(),
                recursive: glob.recursive,
            }),
            (None, Some(command)) => Ok(CleanupStrategy::Command {
                recipe: command.recipe.clone(),
            }),
            (None, None) => Ok(CleanupStrategy::None),
        }
    }

    /// Strategy for an optional section; an absent section means no cleanup.
    pub fn strategy_of(options: Option<&CleanupOptions>) -> Result<CleanupStrategy> {
        options.map_or(Ok(CleanupStrategy::None), CleanupOptions::strategy)
    }
}
