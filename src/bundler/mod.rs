//! Bundling exported assignments into submission archives.
//!
//! A bundle pass for one exported PDF:
//!
//! 1. derive the assignment id from the PDF name and render the archive name
//! 2. refuse to continue if the archive exists, unless forced
//! 3. resolve the include patterns against the assignment source directory
//! 4. stream the PDF and the included files into the selected backend
//!
//! Rendering happens before any file is touched, so a broken template never
//! leaves anything behind. A pass that fails while writing removes its partial
//! archive. [`bundle_all`] skips targets whose archive exists.

pub mod archive;
pub mod naming;

use crate::assignment::{self, PREFIX};
use crate::config::Bindings;
use crate::context::AppContext;
use crate::error::{Error, ErrorExt, Result};
use crate::runner::discover_targets;
use crate::utils::fs::remove_file_if_exists;
use crate::utils::{ResolvedFile, expand_paths};
use archive::ArchiveLayout;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Archive format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Zip with deflate compression
    #[default]
    Zip,
    /// Uncompressed tar
    Tar,
    /// Tar compressed with gzip
    TarGz,
}

impl Backend {
    /// File extension of the format, without leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Backend::Zip => "zip",
            Backend::Tar => "tar",
            Backend::TarGz => "tar.gz",
        }
    }

    /// Backend selected by the `--tar` and `--gzip` switches.
    pub fn from_flags(tar: bool, gzip: bool) -> Self {
        match (tar, gzip) {
            (true, true) => Backend::TarGz,
            (true, false) => Backend::Tar,
            _ => Backend::Zip,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Options of one bundle pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundlerOptions {
    /// Archive format
    pub backend: Backend,
    /// Archive name template; missing or blank means the default template
    pub template: Option<String>,
    /// Template data; `_id` and `format` are added
    pub data: Bindings,
    /// File name of the exported PDF, e.g. `assignment-01.pdf`
    pub target: String,
    /// Files and patterns relative to the assignment source directory
    pub includes: Vec<String>,
    /// Replace an existing archive
    pub force: bool,
    /// Source directory of the includes; missing means the matching `assignment-*` directory
    pub source_directory: Option<PathBuf>,
}

/// A file that went into an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Entry name inside the archive
    pub name: String,
    /// File on disk
    pub path: PathBuf,
}

/// Result of a successful bundle pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledArchive {
    /// Created archive
    pub path: PathBuf,
    /// Format of the archive
    pub backend: Backend,
    /// Bundled files in archive order
    pub assets: Vec<Asset>,
}

/// A prepared bundle pass.
#[derive(Debug, Clone)]
pub struct Bundler {
    backend: Backend,
    archive_name: String,
    layout: ArchiveLayout,
    source_directory: PathBuf,
    files: Vec<ResolvedFile>,
}

impl Bundler {
    /// Prepares bundling `options.target`.
    ///
    /// Fails with [`Error::Template`] if the name cannot be rendered and with
    /// [`Error::ArchiveExists`] if the archive exists and `force` is not set.
    pub fn new(ctx: &AppContext, options: &BundlerOptions) -> Result<Self> {
        let id = assignment::number_from_filename(&options.target)?;
        let base = options
            .target
            .strip_suffix(".pdf")
            .unwrap_or(&options.target)
            .to_string();

        let template = options
            .template
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(ctx.defaults().archive_template.as_str());
        let data = naming::bindings(&options.data, &id, options.backend);
        let archive_name = naming::render(template, &data, options.backend)?;

        let artifacts_directory = ctx.artifacts_directory();
        let archive = artifacts_directory.join(&archive_name);
        if !options.force && archive.exists() {
            return Err(Error::ArchiveExists { path: archive });
        }

        let source_directory = match &options.source_directory {
            Some(dir) => dir.clone(),
            None => source_directory_for(ctx.root(), &base, &id)?,
        };
        let files = expand_paths(&source_directory, &options.includes, false)?;

        Ok(Self {
            backend: options.backend,
            archive_name,
            layout: ArchiveLayout {
                archive,
                artifacts_directory,
                base,
            },
            source_directory,
            files,
        })
    }

    /// Rendered archive file name.
    pub fn archive_name(&self) -> &str {
        &self.archive_name
    }

    /// Full path of the archive.
    pub fn archive_path(&self) -> &Path {
        &self.layout.archive
    }

    /// Directory the includes were resolved in.
    pub fn source_directory(&self) -> &Path {
        &self.source_directory
    }

    /// Resolved auxiliary files.
    pub fn files(&self) -> &[ResolvedFile] {
        &self.files
    }

    /// Writes the archive.
    ///
    /// The first file that cannot be added aborts the pass and the partially
    /// written archive is removed.
    pub fn bundle(&self) -> Result<BundledArchive> {
        let start = Instant::now();
        if let Err(e) = self.write() {
            if let Err(cleanup) = self.discard() {
                log::warn!("{cleanup}");
            }
            return Err(e);
        }

        let mut assets = vec![Asset {
            name: self.layout.assignment_entry(),
            path: self.layout.assignment_pdf(),
        }];
        assets.extend(self.files.iter().map(|f| Asset {
            name: f.archive_name(),
            path: f.path.clone(),
        }));

        log::debug!(
            "Wrote {} with {} entries in {:?}",
            self.layout.archive.display(),
            assets.len(),
            start.elapsed()
        );
        Ok(BundledArchive {
            path: self.layout.archive.clone(),
            backend: self.backend,
            assets,
        })
    }

    fn write(&self) -> Result<()> {
        let mut writer = archive::create(self.backend, self.layout.clone())?;
        writer.add_assignment()?;
        log::debug!(
            "Adding {} auxiliary file(s) to {} archive",
            self.files.len(),
            writer.backend()
        );
        writer.add_auxiliary_files(&self.files)?;
        writer.close()
    }

    fn discard(&self) -> Result<()> {
        if remove_file_if_exists(&self.layout.archive)? {
            log::debug!("Removed partial archive {}", self.layout.archive.display());
        }
        Ok(())
    }
}

/// Outcome of one target of [`bundle_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleOutcome {
    /// The archive was written
    Bundled(BundledArchive),
    /// The archive already existed and was left alone
    Skipped(PathBuf),
}

/// Bundles every target with the shared `options`, in order.
///
/// Targets whose archive exists are skipped unless `force` is set. Any other
/// failure stops the batch.
pub fn bundle_all(
    ctx: &AppContext,
    options: &BundlerOptions,
    targets: &[String],
) -> Result<Vec<BundleOutcome>> {
    let mut outcomes = Vec::with_capacity(targets.len());

    for target in targets {
        let target_options = BundlerOptions {
            target: target.clone(),
            ..options.clone()
        };

        let bundler = match Bundler::new(ctx, &target_options) {
            Ok(bundler) => bundler,
            Err(Error::ArchiveExists { path }) => {
                log::warn!(
                    "Archive {} already exists and --force is not specified, skipping...",
                    path.display()
                );
                outcomes.push(BundleOutcome::Skipped(path));
                continue;
            }
            Err(e) => return Err(e.for_target(target)),
        };

        match bundler.bundle() {
            Ok(archive) => {
                log::info!(
                    "Finished bundling {} to {}",
                    target,
                    archive.path.display()
                );
                outcomes.push(BundleOutcome::Bundled(archive));
            }
            Err(e) => return Err(e.for_target(target)),
        }
    }
    Ok(outcomes)
}

/// Exported PDFs in `artifacts_directory`, sorted by name.
pub fn discover_artifacts(artifacts_directory: &Path) -> Result<Vec<String>> {
    if !artifacts_directory.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(artifacts_directory)
        .fs_context("reading directory", artifacts_directory)?
    {
        let entry = entry.fs_context("reading directory", artifacts_directory)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(PREFIX) && name.ends_with(".pdf") && entry.path().is_file() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Source directory of an assignment: `<root>/<base>` if present, otherwise the
/// `assignment-*` directory with the same number, e.g. `assignment-1` for `01`.
fn source_directory_for(root: &Path, base: &str, id: &str) -> Result<PathBuf> {
    let exact = root.join(base);
    if exact.is_dir() {
        return Ok(exact);
    }

    let matching = discover_targets(root)?.into_iter().find(|dir| {
        dir.file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| assignment::number_from_directory(n).ok())
            .is_some_and(|n| n == id)
    });
    Ok(matching.unwrap_or(exact))
}
