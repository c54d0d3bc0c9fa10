//! Utility modules shared by the runner and the bundler.

pub mod fs;
pub mod resolve;
pub mod tools;

pub use resolve::{ResolvedFile, expand_paths};
