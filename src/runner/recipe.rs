//! Turning recipes into runnable commands.

use super::substitution::{SubstitutionContext, references_document};
use crate::config::Recipe;
use crate::error::{Error, Result};
use crate::template::Renderer;
use crate::utils::tools::find_program;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A fully substituted program invocation, not yet started.
///
/// This is plain data: cloning it yields an independent descriptor and a fresh
/// [`Command`] is built for every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCommand {
    /// Program to execute
    pub program: String,
    /// Substituted arguments
    pub args: Vec<String>,
    /// Directory the program runs in
    pub working_directory: PathBuf,
    /// Capture standard output instead of passing it through
    pub quiet: bool,
}

impl PreparedCommand {
    /// Builds the [`Command`] for this descriptor.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .current_dir(&self.working_directory)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit());
        if self.quiet {
            command.stdout(Stdio::piped());
        } else {
            command.stdout(Stdio::inherit());
        }
        command
    }

    /// Runs the program to completion.
    ///
    /// Fails with [`Error::SpawnFailed`] when the program cannot be started and
    /// with [`Error::CommandFailed`] on a non-zero exit. In quiet mode the captured
    /// output is attached to the failure.
    pub fn run(&self) -> Result<()> {
        log::debug!("Running `{}` in {}", self, self.working_directory.display());
        let mut command = self.to_command();

        let spawn_failed = |source| Error::SpawnFailed {
            command: self.to_string(),
            source,
        };

        let (status, stdout) = if self.quiet {
            let output = command.output().map_err(spawn_failed)?;
            let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            (output.status, Some(stdout))
        } else {
            (command.status().map_err(spawn_failed)?, None)
        };

        if status.success() {
            Ok(())
        } else {
            Err(Error::CommandFailed {
                command: self.to_string(),
                status,
                stdout,
            })
        }
    }
}

impl fmt::Display for PreparedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Builds the commands of `recipe` for `target_file` inside `working_directory`.
///
/// A missing or empty recipe is replaced by `fallback`. Every argument is
/// substituted against the [`SubstitutionContext`] of the target; the target
/// file itself is appended as the last argument unless one of the tool's
/// arguments already references the document (`DOC`, `DOCEXT`, `RELATIVE_DOC`).
///
/// A step without a program fails the whole recipe with
/// [`Error::MissingProgram`] and no commands are returned.
pub fn build_commands(
    recipe: Option<&Recipe>,
    fallback: Recipe,
    working_directory: &Path,
    target_file: &Path,
    quiet: bool,
) -> Result<Vec<PreparedCommand>> {
    let recipe = Recipe::or_default_to(recipe, fallback);
    let context = SubstitutionContext::new(working_directory, target_file);
    let renderer = Renderer::strict();
    let target = target_argument(target_file);

    let mut commands = Vec::with_capacity(recipe.len());
    for (index, tool) in recipe.tools().iter().enumerate() {
        let program = tool.command.trim();
        if program.is_empty() {
            return Err(Error::MissingProgram { step: index + 1 });
        }
        find_program(program);

        let mut args: Vec<String> = tool
            .args
            .iter()
            .map(|arg| context.substitute(&renderer, arg))
            .collect();
        if !tool.args.iter().any(|arg| references_document(arg)) {
            args.push(target.clone());
        }

        commands.push(PreparedCommand {
            program: program.to_string(),
            args,
            working_directory: working_directory.to_path_buf(),
            quiet,
        });
    }

    log::debug!(
        "Prepared {} command(s) for {}",
        commands.len(),
        target_file.display()
    );
    Ok(commands)
}

/// Runs `commands` in order, stopping at the first failure.
pub fn run_commands(commands: &[PreparedCommand]) -> Result<()> {
    commands.iter().try_for_each(PreparedCommand::run)
}

fn target_argument(target_file: &Path) -> String {
    target_file
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Defaults, Tool};

    fn tool(command: &str, args: &[&str]) -> Tool {
        Tool::new(command, args.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn empty_recipe_uses_default_tool() {
        let defaults = Defaults::default();
        let dir = Path::new("work");

        for recipe in [None, Some(Recipe::default())] {
            let cmds = build_commands(
                recipe.as_ref(),
                defaults.build_recipe(),
                dir,
                Path::new("assignment.tex"),
                false,
            )
            .unwrap();

            assert_eq!(cmds.len(), 1);
            assert_eq!(cmds[0].program, "latexmk");
            assert_eq!(cmds[0].args.len(), defaults.build_args.len() + 1);
            assert_eq!(cmds[0].args[..4], defaults.build_args[..4]);
            assert!(cmds[0].args[4].starts_with("-outdir="));
            assert_eq!(cmds[0].args.last().unwrap(), "assignment.tex");
        }
    }

    #[test]
    fn recipe_steps_keep_their_order() {
        let recipe = Recipe::from(vec![
            tool("pdflatex", &["-interaction=nonstopmode"]),
            tool("bibtex", &["{{RELATIVE_DOC}}"]),
            tool("pdflatex", &["-interaction=nonstopmode"]),
        ]);

        let cmds = build_commands(
            Some(&recipe),
            Defaults::default().build_recipe(),
            Path::new("work"),
            Path::new("assignment.tex"),
            true,
        )
        .unwrap();

        assert_eq!(cmds.len(), 3);
        assert_eq!(cmds[0].program, "pdflatex");
        assert_eq!(cmds[1].program, "bibtex");
        assert_eq!(cmds[1].args, vec!["assignment".to_string()]);
        assert_eq!(
            cmds[2].args,
            vec!["-interaction=nonstopmode".to_string(), "assignment.tex".to_string()]
        );
        assert!(cmds.iter().all(|c| c.quiet && c.working_directory == Path::new("work")));
    }

    #[test]
    fn missing_program_fails_the_whole_recipe() {
        let recipe = Recipe::from(vec![tool("pdflatex", &[]), tool("  ", &[])]);

        let err = build_commands(
            Some(&recipe),
            Defaults::default().build_recipe(),
            Path::new("work"),
            Path::new("assignment.tex"),
            false,
        )
        .unwrap_err();

        assert!(matches!(err, Error::MissingProgram { step: 2 }));
    }

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let cmd = PreparedCommand {
            program: "latexmk".into(),
            args: vec!["-pdf".into(), "my file.tex".into()],
            working_directory: PathBuf::from("."),
            quiet: false,
        };
        assert_eq!(cmd.to_string(), r#"latexmk -pdf "my file.tex""#);
    }

    #[cfg(unix)]
    #[test]
    fn quiet_failure_keeps_captured_output() {
        let cmd = PreparedCommand {
            program: "sh".into(),
            args: vec!["-c".into(), "echo compiling; exit 3".into()],
            working_directory: PathBuf::from("."),
            quiet: true,
        };

        match cmd.run() {
            Err(Error::CommandFailed { status, stdout, .. }) => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stdout.as_deref(), Some("compiling\n"));
            }
            other => panic!("expected command failure, got {other:?}"),
        }
    }

    #[test]
    fn unknown_program_fails_to_spawn() {
        let cmd = PreparedCommand {
            program: "assignmentctl-no-such-program-4711".into(),
            args: vec![],
            working_directory: PathBuf::from("."),
            quiet: true,
        };
        assert!(matches!(cmd.run(), Err(Error::SpawnFailed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn run_commands_stops_at_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let sh = |script: &str| PreparedCommand {
            program: "sh".into(),
            args: vec!["-c".into(), script.into()],
            working_directory: dir.path().to_path_buf(),
            quiet: true,
        };

        let err = run_commands(&[sh("touch one"), sh("exit 1"), sh("touch two")]).unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
        assert!(dir.path().join("one").exists());
        assert!(!dir.path().join("two").exists());
    }
}
