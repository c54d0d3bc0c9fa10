//! Archive writers.
//!
//! Every backend implements [`ArchiveWriter`]. The assignment PDF goes to the
//! archive root as `<base>.pdf`, auxiliary files keep their path relative to the
//! assignment source directory. Entry names always use `/` as separator.

mod gzip;
mod tar;
mod zip;

pub use self::gzip::GzipArchiveWriter;
pub use self::tar::TarArchiveWriter;
pub use self::zip::ZipArchiveWriter;

use super::Backend;
use crate::error::{ErrorExt, Result};
use crate::utils::ResolvedFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Where an archive is written and where its assignment PDF is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    /// Archive file to create
    pub archive: PathBuf,
    /// Directory holding the exported PDF
    pub artifacts_directory: PathBuf,
    /// Base name of the assignment, e.g. `assignment-01`
    pub base: String,
}

impl ArchiveLayout {
    /// Exported PDF of the assignment.
    pub fn assignment_pdf(&self) -> PathBuf {
        self.artifacts_directory.join(self.assignment_entry())
    }

    /// Entry name of the PDF inside the archive.
    pub fn assignment_entry(&self) -> String {
        format!("{}.pdf", self.base)
    }
}

/// A format-specific archive being written.
pub trait ArchiveWriter {
    /// Adds the assignment PDF at the archive root.
    fn add_assignment(&mut self) -> Result<()>;

    /// Adds auxiliary files under their relative paths.
    ///
    /// Stops at the first file that cannot be added; the partially written
    /// archive should be discarded.
    fn add_auxiliary_files(&mut self, files: &[ResolvedFile]) -> Result<()>;

    /// Finishes the archive, flushing and closing writers innermost first.
    fn close(self: Box<Self>) -> Result<()>;

    /// Backend of this writer.
    fn backend(&self) -> Backend;
}

/// Creates the writer for `backend`, truncating any existing archive file.
pub fn create(backend: Backend, layout: ArchiveLayout) -> Result<Box<dyn ArchiveWriter>> {
    let file = File::create(&layout.archive).fs_context("creating archive", &layout.archive)?;
    log::debug!("Writing {} archive {}", backend, layout.archive.display());

    Ok(match backend {
        Backend::Zip => Box::new(ZipArchiveWriter::new(file, layout)),
        Backend::Tar => Box::new(TarArchiveWriter::new(file, layout)),
        Backend::TarGz => Box::new(GzipArchiveWriter::new(file, layout)),
    })
}

fn open_source(path: &Path) -> Result<File> {
    File::open(path).fs_context("opening file for archive", path)
}
