//! Placeholders available in recipe arguments.
//!
//! | Placeholder | Value |
//! |---|---|
//! | `DOC` | absolute document path without extension |
//! | `DOCEXT` | absolute document path with extension |
//! | `DIR` | directory of the document |
//! | `TMPDIR` | temporary directory of the OS |
//! | `WORKSPACE_FOLDER` | directory the recipe runs in |
//! | `RELATIVE_DIR` | `DIR` relative to `WORKSPACE_FOLDER` |
//! | `RELATIVE_DOC` | `DOC` relative to `WORKSPACE_FOLDER` |
//! | `OUTDIR` | output directory, the document's directory |

use crate::template::Renderer;
use crate::utils::fs::{absolutize, relative_to};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static DOCUMENT_REFERENCE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\{\{[^}]*\b(?:DOC|DOCEXT|RELATIVE_DOC)\b[^}]*\}\}").ok()
});

/// Values substituted into recipe arguments for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(non_snake_case)]
pub struct SubstitutionContext {
    pub DOC: String,
    pub DOCEXT: String,
    pub DIR: String,
    pub TMPDIR: String,
    pub WORKSPACE_FOLDER: String,
    pub RELATIVE_DIR: String,
    pub RELATIVE_DOC: String,
    pub OUTDIR: String,
}

impl SubstitutionContext {
    /// Derives the placeholders for `target_file` built inside `working_directory`.
    ///
    /// A relative `target_file` is taken relative to `working_directory`.
    pub fn new(working_directory: &Path, target_file: &Path) -> Self {
        let file = absolutize(working_directory, target_file);
        let dir = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| working_directory.to_path_buf());
        let stem = file.file_stem().map(PathBuf::from).unwrap_or_default();
        let doc = dir.join(stem);

        Self {
            DOC: display(&doc),
            DOCEXT: display(&file),
            DIR: display(&dir),
            TMPDIR: display(&std::env::temp_dir()),
            WORKSPACE_FOLDER: display(working_directory),
            RELATIVE_DIR: display(&relative_to(&dir, working_directory)),
            RELATIVE_DOC: display(&relative_to(&doc, working_directory)),
            OUTDIR: display(&dir),
        }
    }

    /// Substitutes placeholders in `arg`.
    ///
    /// Arguments that fail to render are logged and returned unchanged.
    pub fn substitute(&self, renderer: &Renderer, arg: &str) -> String {
        if !arg.contains("{{") {
            return arg.to_string();
        }
        match renderer.render(arg, self) {
            Ok(rendered) => rendered,
            Err(e) => {
                log::warn!("Leaving argument {arg:?} unsubstituted: {e}");
                arg.to_string()
            }
        }
    }
}

/// Whether an argument references the document through a placeholder.
pub fn references_document(arg: &str) -> bool {
    DOCUMENT_REFERENCE
        .as_ref()
        .is_some_and(|re| re.is_match(arg))
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
