//! External program detection.

use std::path::PathBuf;

/// Looks `program` up on `PATH`.
///
/// A missing program is only logged; spawning the process decides whether the
/// step fails, so programs given as relative or absolute paths keep working.
pub fn find_program(program: &str) -> Option<PathBuf> {
    match which::which(program) {
        Ok(path) => {
            log::debug!("Found {} at: {}", program, path.display());
            Some(path)
        }
        Err(e) => {
            log::warn!("{} not found in PATH: {}", program, e);
            None
        }
    }
}
