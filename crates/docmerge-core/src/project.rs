//! Project detection

use crate::config::consts::CONFIG_FILE_NAME;
use std::path::{Path, PathBuf};

/// Represents a docmerge project, rooted at the directory holding docmerge.toml
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
}

impl Project {
    /// Find the project root by searching for docmerge.toml in `start`
    /// and its ancestors.
    pub fn find_root(start: &Path) -> Option<Self> {
        let mut dir = Some(start);
        while let Some(current) = dir {
            if current.join(CONFIG_FILE_NAME).is_file() {
                return Some(Self {
                    root: current.to_path_buf(),
                });
            }
            dir = current.parent();
        }
        None
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// Resolve a config-relative path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
