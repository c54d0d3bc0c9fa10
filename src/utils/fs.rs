//! File system utilities.
//!
//! Idempotent directory creation and removal, plus path relativization that
//! never fails.

use crate::error::{ErrorExt, Result};
use std::{
    io,
    path::{Component, Path, PathBuf},
};

/// Creates all of the directories of the specified path.
///
/// Succeeds without changes when the directory already exists.
pub fn create_dir_all(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).fs_context("creating directory", path)
}

/// Removes a file, treating an already missing file as success.
///
/// Returns whether a file was actually removed.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).fs_context("removing file", path),
    }
}

/// Makes `path` absolute against `base` without touching the file system.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Expresses `path` relative to `base`, walking up with `..` where needed.
///
/// Falls back to `path` itself when no relative form exists, e.g. for paths
/// on different Windows drives or when only one of them is absolute.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() != base.is_absolute() {
        return path.to_path_buf();
    }

    let path_parts: Vec<Component<'_>> = normalized(path);
    let base_parts: Vec<Component<'_>> = normalized(base);

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let prefix_differs = matches!(
        (path_parts.first(), base_parts.first()),
        (Some(Component::Prefix(a)), Some(Component::Prefix(b))) if a != b
    );
    if prefix_differs || base_parts[common..].contains(&Component::ParentDir) {
        return path.to_path_buf();
    }

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push(Component::ParentDir);
    }
    for part in &path_parts[common..] {
        relative.push(part);
    }

    if relative.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        relative
    }
}

fn normalized(path: &Path) -> Vec<Component<'_>> {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
