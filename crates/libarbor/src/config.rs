use std::{fs, path::Path};

use serde::Deserialize;

use crate::error::{ArborError, Result};

/// Name of the per-repository configuration file.
const CONFIG_FILE: &str = ".arbor.toml";

/// Scratch directory used when the configuration does not override it.
const DEFAULT_WORKTREE_DIR: &str = ".worktrees";

/// Per-repository configuration, read from `.arbor.toml` at the repository
/// root when the file exists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Name of the scratch subdirectory new worktrees are created under.
    /// Also the entry the pre-flight adds to `.gitignore`.
    worktree_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worktree_dir: DEFAULT_WORKTREE_DIR.to_string(),
        }
    }
}

impl Config {
    /// Load the repository's configuration. A missing file means defaults; a
    /// malformed one is an error rather than a silent fallback.
    pub fn load(repo_dir: &Path) -> Result<Self> {
        let path = repo_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)?;
        toml::from_str(&contents)
            .map_err(|err| ArborError::Config(format!("{}: {err}", path.display())))
    }

    /// Name of the scratch subdirectory for new worktrees.
    pub fn worktree_dir(&self) -> &str {
        &self.worktree_dir
    }
}
