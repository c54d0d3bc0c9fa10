use super::{ArchiveLayout, ArchiveWriter, open_source};
use crate::bundler::Backend;
use crate::error::{ErrorExt, Result};
use crate::utils::ResolvedFile;
use std::fs::{File, Metadata};
use std::io::Write;
use std::path::Path;
use std::time::UNIX_EPOCH;
use tar::{Builder, EntryType, Header};

/// Linear tar stream over any writer, shared by the tar and tar.gz backends.
pub(super) struct TarStream<W: Write> {
    builder: Builder<W>,
    layout: ArchiveLayout,
}

impl<W: Write> TarStream<W> {
    pub(super) fn new(writer: W, layout: ArchiveLayout) -> Self {
        Self {
            builder: Builder::new(writer),
            layout,
        }
    }

    pub(super) fn layout(&self) -> &ArchiveLayout {
        &self.layout
    }

    /// Appends `path` as `name` with a header built from its metadata.
    fn append_file(&mut self, path: &Path, name: &str) -> Result<()> {
        let mut source = open_source(path)?;
        let metadata = source.metadata().fs_context("reading metadata", path)?;

        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_size(metadata.len());
        header.set_mode(mode(&metadata));
        header.set_mtime(mtime(&metadata));

        self.builder
            .append_data(&mut header, name, &mut source)
            .fs_context("adding file to archive", path)
    }

    pub(super) fn add_assignment(&mut self) -> Result<()> {
        let pdf = self.layout.assignment_pdf();
        let entry = self.layout.assignment_entry();
        self.append_file(&pdf, &entry)
    }

    pub(super) fn add_auxiliary_files(&mut self, files: &[ResolvedFile]) -> Result<()> {
        for file in files {
            self.append_file(&file.path, &file.archive_name())?;
        }
        Ok(())
    }

    /// Writes the end-of-archive marker and returns the inner writer.
    pub(super) fn finish(self) -> Result<W> {
        let archive = self.layout.archive;
        self.builder
            .into_inner()
            .fs_context("finishing archive", &archive)
    }
}

#[cfg(unix)]
fn mode(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn mode(_metadata: &Metadata) -> u32 {
    0o644
}

fn mtime(metadata: &Metadata) -> u64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Uncompressed tar archive.
pub struct TarArchiveWriter {
    stream: TarStream<File>,
}

impl TarArchiveWriter {
    /// Starts a tar archive in `file`.
    pub fn new(file: File, layout: ArchiveLayout) -> Self {
        Self {
            stream: TarStream::new(file, layout),
        }
    }
}

impl ArchiveWriter for TarArchiveWriter {
    fn add_assignment(&mut self) -> Result<()> {
        self.stream.add_assignment()
    }

    fn add_auxiliary_files(&mut self, files: &[ResolvedFile]) -> Result<()> {
        self.stream.add_auxiliary_files(files)
    }

    fn close(self: Box<Self>) -> Result<()> {
        let archive = self.stream.layout().archive.clone();
        let file = self.stream.finish()?;
        file.sync_all().fs_context("syncing archive", &archive)
    }

    fn backend(&self) -> Backend {
        Backend::Tar
    }
}
