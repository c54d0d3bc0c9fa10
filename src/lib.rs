//! Build LaTeX assignments and bundle them for submission
//!
//! This library provides the building blocks of the `assignmentctl` tool:
//! - recipe execution with placeholder substitution ([`runner`])
//! - cleanup of intermediate files by glob or by command ([`runner::clean`])
//! - archive naming and zip, tar and tar.gz backends ([`bundler`])
//! - the `assignment-<NN>` naming convention ([`assignment`])
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod assignment;
pub mod bundler;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod runner;
pub mod template;
pub mod utils;

// Re-export commonly used types
pub use context::AppContext;
pub use error::{CliError, Error, Result};
