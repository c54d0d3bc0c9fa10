use super::{ArchiveLayout, ArchiveWriter, open_source};
use crate::bundler::Backend;
use crate::error::{ErrorExt, Result};
use crate::utils::ResolvedFile;
use std::fs::File;
use std::io;
use std::path::Path;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Zip archive with deflated entries.
pub struct ZipArchiveWriter {
    writer: ZipWriter<File>,
    layout: ArchiveLayout,
}

impl ZipArchiveWriter {
    /// Starts a zip archive in `file`.
    pub fn new(file: File, layout: ArchiveLayout) -> Self {
        Self {
            writer: ZipWriter::new(file),
            layout,
        }
    }

    fn add_file(&mut self, path: &Path, name: String) -> Result<()> {
        let mut source = open_source(path)?;
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        self.writer.start_file(name, options)?;
        io::copy(&mut source, &mut self.writer).fs_context("adding file to archive", path)?;
        Ok(())
    }
}

impl ArchiveWriter for ZipArchiveWriter {
    fn add_assignment(&mut self) -> Result<()> {
        let pdf = self.layout.assignment_pdf();
        let entry = self.layout.assignment_entry();
        self.add_file(&pdf, entry)
    }

    fn add_auxiliary_files(&mut self, files: &[ResolvedFile]) -> Result<()> {
        for file in files {
            self.add_file(&file.path, file.archive_name())?;
        }
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        let Self { writer, layout } = *self;
        let file = writer.finish()?;
        file.sync_all().fs_context("syncing archive", &layout.archive)
    }

    fn backend(&self) -> Backend {
        Backend::Zip
    }
}
