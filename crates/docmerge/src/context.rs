//! Global context for CLI commands

use anyhow::Result;
use std::env;
use std::path::PathBuf;
use docmerge_core::DocmergeError;
use docmerge_core::config::Config;
use docmerge_core::project::Project;

/// Global context containing project and config
pub struct Context {
    pub project: Project,
    pub config: Config,
    pub verbose: bool,
}

impl Context {
    /// Create a new context by locating the project and loading its config
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Not inside a docmerge project
    /// - docmerge.toml cannot be read or parsed
    pub fn new(verbose: bool) -> Result<Self> {
        let current_dir = env::current_dir()?;
        let project =
            Project::find_root(&current_dir).ok_or(DocmergeError::ProjectNotFound)?;

        let config = Config::from_file(project.config_path())?;

        Ok(Self {
            project,
            config,
            verbose,
        })
    }

    pub fn workbook_path(&self) -> PathBuf {
        self.project.resolve(&self.config.source.workbook)
    }

    pub fn template_path(&self) -> PathBuf {
        self.project.resolve(&self.config.template.path)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.project.resolve(&self.config.output.dir)
    }

    pub fn pdf_dir(&self) -> PathBuf {
        self.project.resolve(&self.config.output.pdf_dir)
    }
}
