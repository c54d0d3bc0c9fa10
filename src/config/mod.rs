//! Workspace configuration.
//!
//! The configuration is read once per invocation from `.assignments.toml` at the
//! workspace root and handed to the runner and bundler by reference. Sections:
//!
//! - `[build]` - the build [`Recipe`] and [`CleanupOptions`]
//! - `[bundle]` - archive name template, data bindings and include patterns
//! - `[status]` - the current assignment number
//!
//! Unknown keys are ignored so files shared with other tooling still load.

mod bundle;
mod cleanup;
pub mod defaults;
mod loader;
mod recipe;

pub use bundle::{Bindings, BundleOptions};
pub use cleanup::{CleanupOptions, CleanupStrategy, CommandCleanupOptions, GlobCleanupOptions};
pub use defaults::Defaults;
pub use loader::{CONFIG_FILE, find_root, load, parse};
pub use recipe::{Recipe, Tool};

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Parsed `.assignments.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// `[build]`
    #[serde(default)]
    pub build: BuildOptions,
    /// `[bundle]`
    #[serde(default)]
    pub bundle: BundleOptions,
    /// `[status]`
    #[serde(default)]
    pub status: Status,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Compiler recipe; missing or empty means the default `latexmk` run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Recipe>,
    /// Cleanup strategy; missing means no cleanup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<CleanupOptions>,
}

/// `[status]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Number of the current assignment
    #[serde(default)]
    pub assignment: u32,
}

impl Configuration {
    /// Validated cleanup strategy of the build section.
    pub fn cleanup_strategy(&self) -> Result<CleanupStrategy> {
        CleanupOptions::strategy_of(self.build.cleanup.as_ref())
    }
}
