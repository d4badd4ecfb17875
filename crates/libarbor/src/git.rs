use std::{
    path::{Path, PathBuf},
    process::Command,
    result::Result as StdResult,
};

/// Outcome of an external tool invocation: the captured stdout on success,
/// or the tool's failure message verbatim.
pub type GitResult<T> = StdResult<T, String>;

/// Run a git command in `repo_dir`, capturing stdout. On failure the trimmed
/// stderr is returned untouched so callers can surface it as-is.
pub(crate) fn run_git(repo_dir: &Path, args: &[&str]) -> GitResult<String> {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .map_err(|err| format!("failed to execute git {}: {err}", args.join(" ")))?;

    if !output.status.success() {
        return Err(String::from_utf8_lossy(&output.stderr).trim().to_string());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// The external `git worktree` operations the registry depends on.
///
/// The registry treats these as opaque calls reporting success or a failure
/// message; the only structured contract is the porcelain text returned by
/// [`WorktreeCommands::list_porcelain`]. Implementations other than
/// [`SystemGit`] exist only in tests.
pub trait WorktreeCommands {
    /// Return the raw porcelain listing text.
    fn list_porcelain(&self) -> GitResult<String>;

    /// Create a new worktree checkout at `path`.
    fn add(&self, path: &Path) -> GitResult<()>;

    /// Remove the worktree identified by `name`.
    fn remove(&self, name: &str) -> GitResult<()>;

    /// Protect the worktree identified by `name` from removal.
    fn lock(&self, name: &str) -> GitResult<()>;

    /// Lift the removal protection of the worktree identified by `name`.
    fn unlock(&self, name: &str) -> GitResult<()>;

    /// Drop stale administrative entries for worktree directories that were
    /// deleted externally.
    fn prune(&self) -> GitResult<()>;
}

/// [`WorktreeCommands`] implementation that spawns the `git` binary.
#[derive(Debug, Clone)]
pub struct SystemGit {
    /// Repository the commands run against.
    repo_dir: PathBuf,
}

impl SystemGit {
    /// Create a runner for the repository at `repo_dir`.
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    /// Run a `git worktree` subcommand, discarding stdout.
    fn worktree(&self, args: &[&str]) -> GitResult<()> {
        let mut full = vec!["worktree"];
        full.extend_from_slice(args);
        run_git(&self.repo_dir, &full).map(|_| ())
    }
}

impl WorktreeCommands for SystemGit {
    fn list_porcelain(&self) -> GitResult<String> {
        run_git(&self.repo_dir, &["worktree", "list", "--porcelain"])
    }

    fn add(&self, path: &Path) -> GitResult<()> {
        let path = path
            .to_str()
            .ok_or_else(|| format!("invalid worktree path: {}", path.display()))?;
        self.worktree(&["add", path])
    }

    fn remove(&self, name: &str) -> GitResult<()> {
        self.worktree(&["remove", name])
    }

    fn lock(&self, name: &str) -> GitResult<()> {
        self.worktree(&["lock", name])
    }

    fn unlock(&self, name: &str) -> GitResult<()> {
        self.worktree(&["unlock", name])
    }

    fn prune(&self) -> GitResult<()> {
        self.worktree(&["prune"])
    }
}
