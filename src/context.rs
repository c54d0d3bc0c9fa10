//! Application context shared by the runner and the bundler.

use crate::config::{self, Configuration, Defaults};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Root paths, configuration and defaults of one invocation.
///
/// Built once and passed by reference into [`Runner::new`](crate::runner::Runner::new)
/// and [`Bundler::new`](crate::bundler::Bundler::new); each of them copies what it
/// needs, so no mutable state is shared between passes.
#[derive(Debug, Clone)]
pub struct AppContext {
    root: PathBuf,
    cwd: PathBuf,
    configuration: Configuration,
    defaults: Defaults,
}

impl AppContext {
    /// Creates a context from explicit parts.
    pub fn new(root: impl Into<PathBuf>, configuration: Configuration) -> Self {
        let root = root.into();
        Self {
            cwd: root.clone(),
            root,
            configuration,
            defaults: Defaults::default(),
        }
    }

    /// Locates `.assignments.toml` from `cwd` upwards and loads it.
    pub fn discover(cwd: &Path) -> Result<Self> {
        let root = config::find_root(cwd)?;
        let configuration = config::load(&root.join(config::CONFIG_FILE))?;
        log::debug!("Using workspace root {}", root.display());
        Ok(Self {
            root,
            cwd: cwd.to_path_buf(),
            configuration,
            defaults: Defaults::default(),
        })
    }

    /// Replaces the defaults.
    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Overrides the working directory.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    /// Workspace root, the directory holding the configuration file.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory the invocation started in.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Loaded configuration.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Built-in defaults.
    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Absolute artifacts directory, `<root>/dist` by default.
    pub fn artifacts_directory(&self) -> PathBuf {
        self.root.join(&self.defaults.artifacts_directory)
    }
}
