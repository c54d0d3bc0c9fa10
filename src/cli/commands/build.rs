//! `assignmentctl build`

use crate::assignment;
use crate::cli::args::BuildArgs;
use crate::context::AppContext;
use crate::runner::{self, RunnerOptions};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Builds the assignments selected by `args`.
pub fn execute(ctx: &AppContext, args: &BuildArgs) -> Result<()> {
    args.validate()?;

    let runs = plan(ctx, args)?;
    if runs.is_empty() {
        log::warn!("No assignment directories found in {}", ctx.root().display());
        return Ok(());
    }

    let artifacts = runner::run_all(ctx, runs).context("build failed")?;
    log::debug!("Exported {} artifact(s)", artifacts.len());
    Ok(())
}

/// Runner options for every target selected by `args`.
pub fn plan(ctx: &AppContext, args: &BuildArgs) -> Result<Vec<RunnerOptions>> {
    let run = |target_directory: PathBuf, filename: Option<PathBuf>| RunnerOptions {
        target_directory: Some(target_directory),
        filename,
        quiet: args.quiet,
        override_artifacts: args.force,
        keep: args.keep,
    };

    if args.all {
        let targets = runner::discover_targets(ctx.root())
            .with_context(|| format!("failed to list assignments in {}", ctx.root().display()))?;
        return Ok(targets.into_iter().map(|dir| run(dir, None)).collect());
    }

    if let Some(file) = &args.file {
        let (directory, filename) = target_from_file(ctx.cwd(), file)?;
        return Ok(vec![run(directory, filename)]);
    }

    let number = args
        .assignment
        .unwrap_or(ctx.configuration().status.assignment);
    let directory = ctx.root().join(assignment::directory_name(number));
    Ok(vec![run(directory, None)])
}

/// Splits `--file` into target directory and file name.
///
/// A directory builds its default source file, a file builds itself.
fn target_from_file(cwd: &Path, file: &Path) -> Result<(PathBuf, Option<PathBuf>)> {
    let path = crate::utils::fs::absolutize(cwd, file);
    let metadata =
        std::fs::metadata(&path).with_context(|| format!("cannot access {}", path.display()))?;

    if metadata.is_dir() {
        return Ok((path, None));
    }
    let directory = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.to_path_buf());
    let filename = path.file_name().map(PathBuf::from);
    Ok((directory, filename))
}
