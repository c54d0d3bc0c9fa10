//! Build and clean runs for assignment directories.
//!
//! A [`Runner`] owns one pass over one target: it compiles the document with the
//! configured recipe, exports the PDF to the artifacts directory and removes
//! intermediate files with the configured cleanup strategy. Its progress is
//! tracked as a [`Stage`]:
//!
//! ```text
//! Idle -> Building -> Exporting -> CleaningUp -> Done
//!             \           \            \
//!              +-----------+------------+--> Failed
//! ```
//!
//! Cleaning up is skipped when intermediate files are kept. A failed build
//! leaves the target directory as it is for inspection.
//!
//! [`run_all`] runs several targets strictly one after another and stops at the
//! first failure.

mod build;
pub mod clean;
pub mod export;
pub mod recipe;
pub mod substitution;

pub use recipe::PreparedCommand;
pub use substitution::SubstitutionContext;

use crate::assignment::PREFIX;
use crate::config::{CleanupStrategy, Defaults, Recipe};
use crate::context::AppContext;
use crate::error::{ErrorExt, Result};
use crate::utils::fs::absolutize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Progress of a [`Runner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing has run yet
    Idle,
    /// Recipe commands are running
    Building,
    /// The compiled PDF is being copied
    Exporting,
    /// Intermediate files are being removed
    CleaningUp,
    /// The pass completed
    Done,
    /// The pass stopped at an error
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Building => "building",
            Stage::Exporting => "exporting",
            Stage::CleaningUp => "cleaning up",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Options of a single build pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerOptions {
    /// Directory to build in; relative paths are taken from the root, missing means the current directory
    pub target_directory: Option<PathBuf>,
    /// Source file inside the target directory; missing means `assignment.tex`
    pub filename: Option<PathBuf>,
    /// Capture the output of recipe commands
    pub quiet: bool,
    /// Overwrite an existing exported PDF
    pub override_artifacts: bool,
    /// Skip cleaning up intermediate files
    pub keep: bool,
}

/// One build pass over one target directory.
///
/// Cloning a runner yields an independent pass with its own copy of the
/// prepared commands.
#[derive(Debug, Clone)]
pub struct Runner {
    target_directory: PathBuf,
    filename: PathBuf,
    artifacts_directory: PathBuf,
    quiet: bool,
    override_artifacts: bool,
    keep: bool,
    recipe: Option<Recipe>,
    cleanup: CleanupStrategy,
    defaults: Defaults,
    stage: Stage,
    commands: Vec<PreparedCommand>,
}

impl Runner {
    /// Creates a runner for `options` in the application context.
    ///
    /// Fails with [`Error::AmbiguousCleanup`](crate::error::Error::AmbiguousCleanup) when both cleanup strategies are
    /// configured, before anything runs.
    pub fn new(ctx: &AppContext, options: RunnerOptions) -> Result<Self> {
        let cleanup = ctx.configuration().cleanup_strategy()?;
        let target_directory = match options.target_directory {
            Some(dir) => absolutize(ctx.root(), &dir),
            None => ctx.cwd().to_path_buf(),
        };
        let filename = options
            .filename
            .unwrap_or_else(|| PathBuf::from(&ctx.defaults().filename));
        if filename.file_name() != Some(filename.as_os_str()) {
            crate::bail!(
                "source file {} must be a file name inside the target directory",
                filename.display()
            );
        }

        Ok(Self {
            target_directory,
            filename,
            artifacts_directory: ctx.artifacts_directory(),
            quiet: options.quiet,
            override_artifacts: options.override_artifacts,
            keep: options.keep,
            recipe: ctx.configuration().build.recipe.clone(),
            cleanup,
            defaults: ctx.defaults().clone(),
            stage: Stage::Idle,
            commands: Vec::new(),
        })
    }

    /// Current stage of the pass.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Directory the recipe runs in.
    pub fn target_directory(&self) -> &Path {
        &self.target_directory
    }

    /// Source file, relative to the target directory.
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// Directory receiving the exported PDF.
    pub fn artifacts_directory(&self) -> &Path {
        &self.artifacts_directory
    }

    /// Commands prepared by the last build.
    pub fn commands(&self) -> &[PreparedCommand] {
        &self.commands
    }

    /// Selected cleanup strategy.
    pub fn cleanup_strategy(&self) -> &CleanupStrategy {
        &self.cleanup
    }

    /// Target directory and file, for messages.
    pub fn label(&self) -> String {
        self.target_directory.join(&self.filename).display().to_string()
    }

    fn transition(&mut self, stage: Stage) {
        log::debug!("{}: {} -> {}", self.label(), self.stage, stage);
        self.stage = stage;
    }
}

/// Runs every pass in order and returns the exported artifacts.
///
/// The cleanup configuration is validated once before the first pass. The batch
/// stops at the first failing target; the error names it.
pub fn run_all(ctx: &AppContext, runs: Vec<RunnerOptions>) -> Result<Vec<PathBuf>> {
    ctx.configuration().cleanup_strategy()?;

    let start = Instant::now();
    let count = runs.len();
    let mut artifacts = Vec::with_capacity(count);

    for options in runs {
        let mut runner = Runner::new(ctx, options)?;
        let label = runner.label();
        let artifact = runner.run().map_err(|e| e.for_target(&label))?;
        artifacts.push(artifact);
    }

    log::debug!(
        "Finished {} build job(s) in {:?}",
        count,
        start.elapsed()
    );
    Ok(artifacts)
}

/// Finds the assignment source directories below `root`, sorted by name.
pub fn discover_targets(root: &Path) -> Result<Vec<PathBuf>> {
    let mut targets = Vec::new();
    for entry in std::fs::read_dir(root).fs_context("reading directory", root)? {
        let entry = entry.fs_context("reading directory", root)?;
        let is_target = entry.file_name().to_string_lossy().starts_with(PREFIX)
            && entry.path().is_dir();
        if is_target {
            targets.push(entry.path());
        }
    }
    targets.sort();
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CleanupOptions, CommandCleanupOptions, Configuration, GlobCleanupOptions};
    use crate::error::Error;
    use std::fs;

    #[test]
    fn new_runner_is_idle_and_resolves_paths() {
        let ctx = AppContext::new("/work", Configuration::default()).with_cwd("/work/assignment-02");

        let runner = Runner::new(&ctx, RunnerOptions::default()).unwrap();
        assert_eq!(runner.stage(), Stage::Idle);
        assert_eq!(runner.target_directory(), Path::new("/work/assignment-02"));
        assert_eq!(runner.filename(), Path::new("assignment.tex"));
        assert_eq!(runner.artifacts_directory(), Path::new("/work/dist"));

        let runner = Runner::new(
            &ctx,
            RunnerOptions {
                target_directory: Some("assignment-05".into()),
                ..RunnerOptions::default()
            },
        )
        .unwrap();
        assert_eq!(runner.target_directory(), Path::new("/work/assignment-05"));
    }

    #[test]
    fn source_file_must_be_a_plain_name() {
        let ctx = AppContext::new("/work", Configuration::default());
        let err = Runner::new(
            &ctx,
            RunnerOptions {
                filename: Some("sub/assignment.tex".into()),
                ..RunnerOptions::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::GenericError(_)));
    }

    #[test]
    fn ambiguous_cleanup_is_rejected_up_front() {
        let mut configuration = Configuration::default();
        configuration.build.cleanup = Some(CleanupOptions {
            glob: Some(GlobCleanupOptions::default()),
            command: Some(CommandCleanupOptions::default()),
        });
        let ctx = AppContext::new("/work", configuration);

        assert!(matches!(
            Runner::new(&ctx, RunnerOptions::default()),
            Err(Error::AmbiguousCleanup)
        ));
        assert!(matches!(
            run_all(&ctx, vec![RunnerOptions::default()]),
            Err(Error::AmbiguousCleanup)
        ));
    }

    #[test]
    fn discovers_assignment_directories_in_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["assignment-10", "assignment-02", "notes"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        fs::write(dir.path().join("assignment-03"), "not a directory").unwrap();

        let targets = discover_targets(dir.path()).unwrap();
        assert_eq!(
            targets,
            vec![
                dir.path().join("assignment-02"),
                dir.path().join("assignment-10")
            ]
        );
    }
}
