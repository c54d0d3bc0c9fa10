//! The build pass: compile, export, clean up.

use super::clean::{self, Cleaner};
use super::export::export_artifact;
use super::recipe::{PreparedCommand, build_commands, run_commands};
use super::{Runner, Stage};
use crate::assignment;
use crate::error::{Context, Error, Result};
use crate::utils::fs::create_dir_all;
use std::path::PathBuf;
use std::time::Instant;

impl Runner {
    /// Prepares the build commands for the target and keeps them on the runner.
    pub fn make_build_commands(&mut self) -> Result<&[PreparedCommand]> {
        self.commands = build_commands(
            self.recipe.as_ref(),
            self.defaults.build_recipe(),
            &self.target_directory,
            &self.filename,
            self.quiet,
        )?;
        Ok(&self.commands)
    }

    /// Creates the artifacts directory if it does not exist yet.
    pub fn make_artifacts_directory(&self) -> Result<()> {
        if self.artifacts_directory.is_dir() {
            log::debug!(
                "Artifacts directory {} already exists",
                self.artifacts_directory.display()
            );
            return Ok(());
        }
        create_dir_all(&self.artifacts_directory)?;
        log::debug!(
            "Created artifacts directory {}",
            self.artifacts_directory.display()
        );
        Ok(())
    }

    /// PDF produced by the recipe, next to the source file.
    pub fn compiled_document(&self) -> PathBuf {
        self.target_directory
            .join(&self.filename)
            .with_extension("pdf")
    }

    /// Destination of the exported PDF, `assignment-<NN>.pdf` in the artifacts directory.
    ///
    /// The number is taken from the name of the target directory.
    pub fn artifact_path(&self) -> Result<PathBuf> {
        let name = self
            .target_directory
            .file_name()
            .map(|n| n.to_string_lossy())
            .context(format!(
                "target directory {} has no name",
                self.target_directory.display()
            ))?;
        let id = assignment::number_from_directory(&name)?;
        Ok(self.artifacts_directory.join(assignment::artifact_name(&id)))
    }

    /// Copies the compiled PDF into the artifacts directory and returns its new path.
    pub fn export(&self) -> Result<PathBuf> {
        let start = Instant::now();
        let destination = self.artifact_path()?;
        self.make_artifacts_directory()?;
        export_artifact(
            &self.compiled_document(),
            &destination,
            self.override_artifacts,
        )?;
        log::debug!(
            "Exported {} in {:?}",
            destination.display(),
            start.elapsed()
        );
        Ok(destination)
    }

    /// Cleaner for the configured strategy.
    pub fn cleaner(&self) -> Box<dyn Cleaner> {
        clean::select(
            &self.cleanup,
            &self.target_directory,
            &self.filename,
            self.quiet,
            &self.defaults,
        )
    }

    /// Runs the configured cleanup strategy on the target directory.
    pub fn clean(&self) -> Result<()> {
        let cleaner = self.cleaner();
        log::debug!(
            "Cleaning up {} ({})",
            self.target_directory.display(),
            cleaner.name()
        );
        cleaner.run()
    }

    /// Runs the whole pass and returns the exported PDF.
    ///
    /// A failing command stops the recipe and leaves the target directory
    /// untouched. A cleanup failure is reported as [`Error::Cleanup`]; the
    /// exported PDF stays valid in that case.
    pub fn run(&mut self) -> Result<PathBuf> {
        let start = Instant::now();

        self.transition(Stage::Building);
        if let Err(e) = self.compile() {
            self.fail();
            return Err(e);
        }
        log::debug!("Compiled {} in {:?}", self.label(), start.elapsed());

        self.transition(Stage::Exporting);
        let artifact = match self.export() {
            Ok(artifact) => artifact,
            Err(e) => {
                self.fail();
                return Err(e);
            }
        };

        if !self.keep {
            self.transition(Stage::CleaningUp);
            if let Err(e) = self.clean() {
                self.fail();
                return Err(Error::Cleanup {
                    artifact,
                    source: Box::new(e),
                });
            }
        }

        self.transition(Stage::Done);
        log::info!(
            "Built {} in {:?}",
            artifact.display(),
            start.elapsed()
        );
        Ok(artifact)
    }

    fn compile(&mut self) -> Result<()> {
        self.make_build_commands()?;
        run_commands(&self.commands)
    }

    fn fail(&mut self) {
        self.transition(Stage::Failed);
        log::warn!(
            "Leaving working directory {} dirty, might require manual cleanup",
            self.target_directory.display()
        );
    }
}
