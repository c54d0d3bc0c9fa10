//! Copying the compiled PDF into the artifacts directory.

use crate::error::{Error, ErrorExt, Result};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Copies `source` to `destination`.
///
/// Without `override_existing` an existing destination fails with
/// [`Error::ArtifactExists`] and nothing is written. The destination is then
/// opened with `create_new`, so a file appearing between the check and the copy
/// is not clobbered either. With `override_existing` the destination is
/// truncated.
pub fn export_artifact(source: &Path, destination: &Path, override_existing: bool) -> Result<()> {
    let mut reader = File::open(source).fs_context("opening compiled document", source)?;

    if !override_existing && destination.exists() {
        return Err(Error::ArtifactExists {
            path: destination.to_path_buf(),
        });
    }

    let mut options = OpenOptions::new();
    options.write(true);
    if override_existing {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut writer = match options.open(destination) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(Error::ArtifactExists {
                path: destination.to_path_buf(),
            });
        }
        Err(e) => return Err(e).fs_context("creating artifact", destination),
    };

    let bytes = io::copy(&mut reader, &mut writer).fs_context("writing artifact", destination)?;
    writer.sync_all().fs_context("syncing artifact", destination)?;

    log::debug!(
        "Copied {} bytes from {} to {}",
        bytes,
        source.display(),
        destination.display()
    );
    Ok(())
}
