//! Locating and reading the workspace configuration file.

use super::Configuration;
use crate::error::{CliError, Error, ErrorExt, Result};
use std::path::{Path, PathBuf};

/// File name of the workspace configuration.
pub const CONFIG_FILE: &str = ".assignments.toml";

/// Walks from `start` upwards and returns the first directory holding [`CONFIG_FILE`].
pub fn find_root(start: &Path) -> Result<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE).is_file())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            Error::Cli(CliError::ConfigNotFound {
                file: CONFIG_FILE,
                start: start.to_path_buf(),
            })
        })
}

/// Reads and parses a configuration file.
pub fn load(path: &Path) -> Result<Configuration> {
    let content = std::fs::read_to_string(path).fs_context("reading configuration", path)?;
    parse(&content).map_err(|reason| Error::Config {
        path: path.to_path_buf(),
        reason,
    })
}

/// Parses configuration text.
pub fn parse(content: &str) -> std::result::Result<Configuration, String> {
    toml::from_str(content).map_err(|e| e.to_string())
}
