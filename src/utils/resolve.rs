//! Expansion of literal paths and glob patterns into file lists.
//!
//! Used by glob cleanup and by bundle includes. Each pattern is resolved against a
//! base directory:
//!
//! 1. If `base/pattern` exists, it is taken literally.
//! 2. Otherwise the pattern is a glob relative to `base`. With `recursive` set, it
//!    additionally matches in every sub-directory (`base/**/pattern`).
//!
//! Matched directories are walked. Without `recursive` only the files directly
//! inside a matched directory are returned, its sub-directories are skipped.

use crate::error::{Error, ErrorExt, Result};
use std::collections::HashSet;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// A file found by [`expand_paths`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Location on disk
    pub path: PathBuf,
    /// Location relative to the base directory, or the file name for files outside of it.
    ///
    /// Never contains `..` or `.` components.
    pub relative: PathBuf,
}

impl ResolvedFile {
    fn new(base: &Path, path: PathBuf) -> Self {
        let normalized = normalize(&path);
        let relative = match normalized.strip_prefix(normalize(base)) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
            _ => {
                log::debug!(
                    "{} is outside of {}, using its file name",
                    path.display(),
                    base.display()
                );
                normalized
                    .file_name()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| normalized.clone())
            }
        };
        Self { path, relative }
    }

    /// Relative path with `/` separators, as used for archive entry names.
    pub fn archive_name(&self) -> String {
        self.relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Expands `patterns` against `base` into a de-duplicated list of files.
///
/// Patterns matching nothing contribute nothing. Invalid patterns fail with
/// [`Error::InvalidPattern`], unreadable directories with [`Error::Fs`].
pub fn expand_paths(base: &Path, patterns: &[String], recursive: bool) -> Result<Vec<ResolvedFile>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        for matched in matches(base, pattern, recursive)? {
            for path in walk(&matched, recursive)? {
                if seen.insert(normalize(&path)) {
                    files.push(ResolvedFile::new(base, path));
                }
            }
        }
    }

    log::debug!(
        "Resolved {} file(s) from {} pattern(s) in {}",
        files.len(),
        patterns.len(),
        base.display()
    );
    Ok(files)
}

/// Resolves `.` and `..` components without touching the filesystem.
///
/// `..` at the root is dropped; leading `..` of a relative path are kept.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other),
        }
    }
    normalized
}

fn matches(base: &Path, pattern: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let literal = base.join(pattern);
    if literal.symlink_metadata().is_ok() {
        return Ok(vec![literal]);
    }

    let escaped_base = PathBuf::from(glob::Pattern::escape(&base.to_string_lossy()));
    let mut globs = vec![escaped_base.join(pattern)];
    if recursive && Path::new(pattern).is_relative() {
        globs.push(escaped_base.join("**").join(pattern));
    }

    let mut found = Vec::new();
    for glob_pattern in globs {
        let entries = glob::glob(&glob_pattern.to_string_lossy()).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.msg.to_string(),
        })?;
        for entry in entries {
            match entry {
                Ok(path) => found.push(path),
                Err(e) => {
                    let path = e.path().to_path_buf();
                    return Err(io::Error::from(e)).fs_context("reading", &path);
                }
            }
        }
    }

    if found.is_empty() {
        log::debug!("Pattern {pattern:?} matched nothing in {}", base.display());
    }
    Ok(found)
}

fn walk(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
            Error::Fs {
                action: "walking",
                path,
                source: io::Error::from(e),
            }
        })?;
        if !entry.file_type().is_dir() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    fn names(files: &[ResolvedFile]) -> Vec<String> {
        let mut names: Vec<_> = files.iter().map(ResolvedFile::archive_name).collect();
        names.sort();
        names
    }

    #[test]
    fn globs_are_relative_to_base() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("code/a.go"));
        touch(&dir.path().join("code/b.go"));
        touch(&dir.path().join("code/readme.md"));

        let files = expand_paths(dir.path(), &["code/*.go".into()], false).unwrap();
        assert_eq!(names(&files), vec!["code/a.go", "code/b.go"]);
        assert!(files.iter().all(|f| f.path.starts_with(dir.path())));
    }

    #[test]
    fn non_recursive_ignores_sub_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.aux"));
        touch(&dir.path().join("sub/b.aux"));

        let files = expand_paths(dir.path(), &["*.aux".into()], false).unwrap();
        assert_eq!(names(&files), vec!["a.aux"]);
    }

    #[test]
    fn recursive_matches_in_sub_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.aux"));
        touch(&dir.path().join("sub/b.aux"));
        touch(&dir.path().join("sub/deeper/c.aux"));

        let files = expand_paths(dir.path(), &["*.aux".into()], true).unwrap();
        assert_eq!(names(&files), vec!["a.aux", "sub/b.aux", "sub/deeper/c.aux"]);
    }

    #[test]
    fn literal_directories_are_walked_one_level_unless_recursive() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("code/main.rs"));
        touch(&dir.path().join("code/nested/lib.rs"));

        let flat = expand_paths(dir.path(), &["code".into()], false).unwrap();
        assert_eq!(names(&flat), vec!["code/main.rs"]);

        let deep = expand_paths(dir.path(), &["code".into()], true).unwrap();
        assert_eq!(names(&deep), vec!["code/main.rs", "code/nested/lib.rs"]);
    }

    #[test]
    fn duplicates_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.log"));

        let files =
            expand_paths(dir.path(), &["a.log".into(), "*.log".into()], false).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn unmatched_patterns_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let files = expand_paths(dir.path(), &["*.nav".into()], true).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn normalize_resolves_dots_lexically() {
        assert_eq!(normalize(Path::new("/w/a/../b/./c.sty")), Path::new("/w/b/c.sty"));
        assert_eq!(normalize(Path::new("/../x")), Path::new("/x"));
        assert_eq!(normalize(Path::new("../../x")), Path::new("../../x"));
        assert_eq!(normalize(Path::new("./a/..")), Path::new(""));
    }

    #[test]
    fn files_above_base_are_named_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("assignment-01");
        touch(&base.join("code/main.go"));
        touch(&dir.path().join("shared/macros.sty"));

        let files = expand_paths(
            &base,
            &[
                "../shared/*.sty".into(),
                "code/../code/main.go".into(),
                "code/*.go".into(),
            ],
            false,
        )
        .unwrap();
        assert_eq!(names(&files), vec!["code/main.go", "macros.sty"]);
        assert!(files.iter().all(|f| f.path.exists()));
    }

    #[test]
    fn invalid_patterns_fail() {
        let dir = tempfile::tempdir().unwrap();
        let err = expand_paths(dir.path(), &["[".into()], false).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }
}
