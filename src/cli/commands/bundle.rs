//! `assignmentctl bundle`

use crate::assignment;
use crate::bundler::{self, BundleOutcome, BundlerOptions};
use crate::cli::args::BundleArgs;
use crate::context::AppContext;
use anyhow::{Context, Result};

/// Bundles the assignments selected by `args`.
pub fn execute(ctx: &AppContext, args: &BundleArgs) -> Result<()> {
    args.validate()?;

    let targets = targets(ctx, args)?;
    if targets.is_empty() {
        log::warn!(
            "No exported assignments found in {}",
            ctx.artifacts_directory().display()
        );
        return Ok(());
    }

    let options = options(ctx, args);
    let outcomes = bundler::bundle_all(ctx, &options, &targets).context("bundle failed")?;

    let skipped = outcomes
        .iter()
        .filter(|o| matches!(o, BundleOutcome::Skipped(_)))
        .count();
    log::debug!(
        "Bundled {} of {} assignment(s), {} skipped",
        outcomes.len() - skipped,
        targets.len(),
        skipped
    );
    Ok(())
}

/// Shared bundler options from the configuration and flags.
pub fn options(ctx: &AppContext, args: &BundleArgs) -> BundlerOptions {
    let bundle = &ctx.configuration().bundle;
    BundlerOptions {
        backend: args.backend(),
        template: bundle.template.clone(),
        data: bundle.data.clone(),
        target: String::new(),
        includes: bundle.include.clone(),
        force: args.force,
        source_directory: None,
    }
}

/// Exported PDFs selected by `args`.
pub fn targets(ctx: &AppContext, args: &BundleArgs) -> Result<Vec<String>> {
    if args.all {
        let artifacts = ctx.artifacts_directory();
        return bundler::discover_artifacts(&artifacts)
            .with_context(|| format!("failed to list artifacts in {}", artifacts.display()));
    }

    let number = args
        .assignment
        .unwrap_or(ctx.configuration().status.assignment);
    Ok(vec![assignment::artifact_name(&assignment::format_number(
        number,
    ))])
}
