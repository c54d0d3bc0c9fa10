use super::tar::TarStream;
use super::{ArchiveLayout, ArchiveWriter};
use crate::bundler::Backend;
use crate::error::{ErrorExt, Result};
use crate::utils::ResolvedFile;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;

/// Tar archive compressed with gzip.
pub struct GzipArchiveWriter {
    stream: TarStream<GzEncoder<File>>,
}

impl GzipArchiveWriter {
    /// Starts a gzip-compressed tar archive in `file`.
    pub fn new(file: File, layout: ArchiveLayout) -> Self {
        let encoder = GzEncoder::new(file, Compression::default());
        Self {
            stream: TarStream::new(encoder, layout),
        }
    }
}

impl ArchiveWriter for GzipArchiveWriter {
    fn add_assignment(&mut self) -> Result<()> {
        self.stream.add_assignment()
    }

    fn add_auxiliary_files(&mut self, files: &[ResolvedFile]) -> Result<()> {
        self.stream.add_auxiliary_files(files)
    }

    /// Closes the tar stream, then the gzip encoder, then the file.
    fn close(self: Box<Self>) -> Result<()> {
        let archive = self.stream.layout().archive.clone();
        let encoder = self.stream.finish()?;
        let file = encoder
            .finish()
            .fs_context("writing gzip trailer", &archive)?;
        file.sync_all().fs_context("syncing archive", &archive)
    }

    fn backend(&self) -> Backend {
        Backend::TarGz
    }
}
