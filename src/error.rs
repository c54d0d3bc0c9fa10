//! Error types for build, cleanup and bundling operations.
//!
//! Every fallible operation in the library returns [`Result`]. Variants are grouped
//! the way failures surface to the user: configuration problems are detected before
//! anything runs, precondition failures before the conflicting write, and process or
//! filesystem failures propagate as soon as they happen.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for all build, cleanup and bundling operations
#[derive(Error, Debug)]
pub enum Error {
    /// Both cleanup strategies are configured at the same time
    #[error("found ambiguous cleanup mode, only use either glob or command")]
    AmbiguousCleanup,

    /// A recipe step has no program to run
    #[error("failed to make commands, missing program in recipe step {step}")]
    MissingProgram {
        /// 1-based position of the step in the recipe
        step: usize,
    },

    /// A glob pattern could not be compiled
    #[error("pattern {pattern:?} is not valid: {reason}")]
    InvalidPattern {
        /// Offending pattern
        pattern: String,
        /// Parser message
        reason: String,
    },

    /// Template registration or rendering failed
    #[error("failed to render template: {reason}")]
    Template {
        /// Renderer message
        reason: String,
    },

    /// A name does not follow the `assignment-<digits>` convention
    #[error("{name:?} does not match the pattern assignment-<number>")]
    InvalidAssignmentName {
        /// Rejected directory or file name
        name: String,
    },

    /// Configuration file could not be parsed
    #[error("failed to parse configuration {path}: {reason}")]
    Config {
        /// Configuration file
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Exported artifact exists and overriding was not requested
    #[error("not overwriting existing file {path}, use --force")]
    ArtifactExists {
        /// Existing artifact
        path: PathBuf,
    },

    /// Archive exists and force was not requested
    #[error("archive {path} already exists")]
    ArchiveExists {
        /// Existing archive
        path: PathBuf,
    },

    /// External program exited unsuccessfully
    #[error("command `{command}` failed with {status}")]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Exit status of the process
        status: ExitStatus,
        /// Captured standard output (quiet mode only)
        stdout: Option<String>,
    },

    /// External program could not be started
    #[error("failed to start `{command}`")]
    SpawnFailed {
        /// Rendered command line
        command: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Filesystem operation with the path it was applied to
    #[error("{action} {path}")]
    Fs {
        /// What was being done
        action: &'static str,
        /// Path the action was applied to
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// IO errors without a known path
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// Zip writer errors
    #[error("zip error")]
    Zip(#[from] zip::result::ZipError),

    /// A single target of a batch failed
    #[error("run failed for {target}")]
    Target {
        /// Target directory or artifact name
        target: String,
        /// Failure of that target
        #[source]
        source: Box<Error>,
    },

    /// Cleanup failed after the artifact had been exported
    #[error("failed to clean up after exporting {artifact}")]
    Cleanup {
        /// The already exported artifact, still valid
        artifact: PathBuf,
        /// Failure of the cleanup strategy
        #[source]
        source: Box<Error>,
    },

    /// CLI argument errors
    #[error(transparent)]
    Cli(#[from] CliError),

    /// Everything else
    #[error("{0}")]
    GenericError(String),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Conflicting arguments
    #[error("cannot use {first} together with {second}")]
    ConflictingArguments {
        /// First flag or argument
        first: String,
        /// Second flag or argument
        second: String,
    },

    /// Flag that only works in combination with another
    #[error("cannot use {flag} without {requires}")]
    MissingDependency {
        /// Flag given
        flag: String,
        /// Flag it depends on
        requires: String,
    },

    /// No configuration file in the current directory or above
    #[error("failed to find {file} in {start} or above, is the directory initialized?")]
    ConfigNotFound {
        /// Configuration file name searched for
        file: &'static str,
        /// Directory the search started in
        start: PathBuf,
    },
}

impl Error {
    /// Wraps `self` as the failure of a batch target.
    pub fn for_target(self, target: impl Display) -> Self {
        Error::Target {
            target: target.to_string(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, unwrapping batch and cleanup wrappers.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Target { source, .. } | Error::Cleanup { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Actionable suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self.root_cause() {
            Error::AmbiguousCleanup => vec![
                "Remove either build.cleanup.glob or build.cleanup.command from .assignments.toml"
                    .to_string(),
            ],
            Error::ArtifactExists { .. } => {
                vec!["Pass --force to override the exported PDF".to_string()]
            }
            Error::ArchiveExists { .. } => {
                vec!["Pass --force to override the existing archive".to_string()]
            }
            Error::CommandFailed { .. } => vec![
                "Rerun without --quiet to see the full compiler output".to_string(),
                "Pass --keep to inspect the intermediate files".to_string(),
            ],
            Error::SpawnFailed { .. } | Error::MissingProgram { .. } => {
                vec!["Check build.recipe in .assignments.toml and that the tool is on PATH".to_string()]
            }
            Error::Cli(CliError::ConfigNotFound { .. }) => {
                vec!["Create .assignments.toml in the workspace root".to_string()]
            }
            _ => Vec::new(),
        }
    }
}

/// Attaches the attempted filesystem action and path to IO errors.
pub trait ErrorExt<T> {
    /// Maps an IO error into [`Error::Fs`].
    fn fs_context(self, action: &'static str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, action: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Fs {
            action,
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Converts missing values into [`Error::GenericError`].
pub trait Context<T> {
    /// Error message used when the value is missing.
    fn context<C: Display>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

/// Returns early with an [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::error::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_cause_unwraps_nested_wrappers() {
        let err = Error::ArchiveExists {
            path: PathBuf::from("dist/assignment-01.zip"),
        }
        .for_target("assignment-01.pdf");

        assert!(matches!(err.root_cause(), Error::ArchiveExists { .. }));
        assert_eq!(
            err.recovery_suggestions(),
            vec!["Pass --force to override the existing archive".to_string()]
        );
        assert!(err.to_string().contains("assignment-01.pdf"));
    }

    #[test]
    fn fs_context_keeps_path_and_action() {
        let io: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = io
            .fs_context("opening artifact", Path::new("dist/x.pdf"))
            .unwrap_err();

        assert_eq!(err.to_string(), "opening artifact dist/x.pdf");
        assert_eq!(std::error::Error::source(&err).unwrap().to_string(), "gone");
    }

    #[test]
    fn missing_program_reports_step() {
        let err = Error::MissingProgram { step: 2 };
        assert!(err.to_string().ends_with("recipe step 2"));
    }
}
