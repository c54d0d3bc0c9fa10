//! Built-in defaults for recipes, cleanup and naming.

use super::{Recipe, Tool};

/// Program used when a recipe is missing or empty.
pub const DEFAULT_PROGRAM: &str = "latexmk";

/// Arguments of the default build tool. The target file is appended.
pub const DEFAULT_BUILD_ARGS: &[&str] = &[
    "-pdf",
    "-interaction=nonstopmode",
    "-file-line-error",
    "-shell-escape",
    "-outdir={{OUTDIR}}",
];

/// Arguments of the default clean tool.
pub const DEFAULT_CLEAN_ARGS: &[&str] = &["-C"];

/// Intermediate files removed by glob cleanup when no patterns are configured.
pub const DEFAULT_CLEANUP_PATTERNS: &[&str] = &[
    "*.aux",
    "*.bbl",
    "*.blg",
    "*.idx",
    "*.ind",
    "*.lof",
    "*.lot",
    "*.out",
    "*.toc",
    "*.acn",
    "*.acr",
    "*.alg",
    "*.glg",
    "*.glo",
    "*.gls",
    "*.fls",
    "*.log",
    "*.fdb_latexmk",
    "*.snm",
    "*.synctex(busy)",
    "*.synctex.gz(busy)",
    "*.nav",
    "*.vrb",
];

/// Source file compiled inside each assignment directory.
pub const DEFAULT_FILENAME: &str = "assignment.tex";

/// Directory below the root that receives exported PDFs and archives.
pub const ARTIFACTS_DIRECTORY: &str = "dist";

/// Archive name template. `_id` and `format` are always bound.
pub const DEFAULT_ARCHIVE_TEMPLATE: &str = "assignment-{{_id}}.{{format}}";

/// Defaults handed to the executor, cleaners and namer.
///
/// Constructed once per application context and never mutated, so tests can
/// swap in their own values without touching global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    /// Program of the default build and clean tools
    pub program: String,
    /// Arguments of the default build tool
    pub build_args: Vec<String>,
    /// Arguments of the default clean tool
    pub clean_args: Vec<String>,
    /// Patterns of the glob cleaner when none are configured
    pub cleanup_patterns: Vec<String>,
    /// Source file name inside an assignment directory
    pub filename: String,
    /// Artifacts directory, relative to the root unless absolute
    pub artifacts_directory: String,
    /// Archive name template
    pub archive_template: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            build_args: to_owned(DEFAULT_BUILD_ARGS),
            clean_args: to_owned(DEFAULT_CLEAN_ARGS),
            cleanup_patterns: to_owned(DEFAULT_CLEANUP_PATTERNS),
            filename: DEFAULT_FILENAME.to_string(),
            artifacts_directory: ARTIFACTS_DIRECTORY.to_string(),
            archive_template: DEFAULT_ARCHIVE_TEMPLATE.to_string(),
        }
    }
}

impl Defaults {
    /// Single-tool recipe replacing an empty build recipe.
    pub fn build_recipe(&self) -> Recipe {
        Recipe::from(vec![Tool::new(&self.program, self.build_args.clone())])
    }

    /// Single-tool recipe replacing an empty clean recipe.
    pub fn clean_recipe(&self) -> Recipe {
        Recipe::from(vec![Tool::new(&self.program, self.clean_args.clone())])
    }
}

fn to_owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
