use std::{fs, io::Write, path::Path};

use tracing::info;

use crate::{
    config::Config,
    error::{ArborError, Result},
    git::run_git,
};

/// Comment written above the ignore entry for the scratch directory.
const IGNORE_COMMENT: &str = "# Ignore worktree checkouts";

/// Run the one-time startup checks and repairs: the directory is a Git work
/// tree, it is the primary checkout, `.gitignore` hides the scratch
/// directory, and the scratch directory exists.
///
/// A failure here is descriptive, not fatal: the caller starts the session
/// anyway and displays the message.
pub fn preflight(repo_dir: &Path, config: &Config) -> Result<()> {
    if !is_work_tree(repo_dir) {
        return Err(ArborError::Preflight(
            "this is not a git repository. please run arbor in a git repository".to_string(),
        ));
    }

    if !is_primary_checkout(repo_dir)? {
        return Err(ArborError::Preflight(
            "this is not the primary checkout. please run arbor in the main worktree".to_string(),
        ));
    }

    ensure_ignore_entry(repo_dir, config.worktree_dir())?;
    ensure_scratch_dir(repo_dir, config.worktree_dir())?;

    Ok(())
}

/// True when `git` recognizes the directory as part of a work tree.
fn is_work_tree(repo_dir: &Path) -> bool {
    run_git(repo_dir, &["rev-parse", "--is-inside-work-tree"]).is_ok()
}

/// True when the directory is the primary checkout rather than a linked
/// worktree. The primary checkout's git dir is a plain `.git`.
fn is_primary_checkout(repo_dir: &Path) -> Result<bool> {
    let stdout = run_git(repo_dir, &["rev-parse", "--git-dir"]).map_err(ArborError::Preflight)?;
    Ok(stdout.trim() == ".git")
}

/// Make sure `.gitignore` hides the scratch directory: create the file when
/// missing, append the entry when absent, leave an existing entry alone.
fn ensure_ignore_entry(repo_dir: &Path, worktree_dir: &str) -> Result<()> {
    let path = repo_dir.join(".gitignore");

    if path.exists() {
        let contents = fs::read_to_string(&path)?;
        if contents.lines().any(|line| line.contains(worktree_dir)) {
            return Ok(());
        }
        let mut file = fs::OpenOptions::new().append(true).open(&path)?;
        writeln!(file, "\n{IGNORE_COMMENT}\n{worktree_dir}")?;
        info!(entry = worktree_dir, "appended ignore entry");
    } else {
        fs::write(&path, format!("{IGNORE_COMMENT}\n{worktree_dir}\n"))?;
        info!(entry = worktree_dir, "created .gitignore");
    }

    Ok(())
}

/// Create the scratch directory for new worktrees when missing.
fn ensure_scratch_dir(repo_dir: &Path, worktree_dir: &str) -> Result<()> {
    let dir = repo_dir.join(worktree_dir);
    if !dir.is_dir() {
        fs::create_dir_all(&dir)?;
        info!(dir = %dir.display(), "created scratch directory");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    /// Initialise a repository with a single commit.
    fn setup_repo() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path();

        run_git(repo, &["init", "-b", "main"]).unwrap();
        run_git(repo, &["config", "user.email", "test@example.com"]).unwrap();
        run_git(repo, &["config", "user.name", "Test User"]).unwrap();
        fs::write(repo.join("README.md"), "# Test Repo").unwrap();
        run_git(repo, &["add", "README.md"]).unwrap();
        run_git(repo, &["commit", "-m", "Initial commit"]).unwrap();

        tmp
    }

    #[test]
    fn preflight_sets_up_a_fresh_repository() {
        let tmp = setup_repo();

        preflight(tmp.path(), &Config::default()).unwrap();

        let ignore = fs::read_to_string(tmp.path().join(".gitignore")).unwrap();
        assert!(ignore.contains(".worktrees"));
        assert!(tmp.path().join(".worktrees").is_dir());
    }

    #[test]
    fn preflight_fails_outside_a_repository() {
        let tmp = TempDir::new().unwrap();

        let err = preflight(tmp.path(), &Config::default()).unwrap_err();

        assert!(matches!(err, ArborError::Preflight(_)));
    }

    #[test]
    fn preflight_fails_in_a_secondary_worktree() {
        let tmp = setup_repo();
        let secondary = tmp.path().join(".worktrees").join("side");
        run_git(
            tmp.path(),
            &["worktree", "add", secondary.to_str().unwrap()],
        )
        .unwrap();

        let err = preflight(&secondary, &Config::default()).unwrap_err();

        assert!(matches!(err, ArborError::Preflight(message) if message.contains("primary")));
    }

    #[test]
    fn existing_ignore_file_is_appended_not_replaced() {
        let tmp = setup_repo();
        fs::write(tmp.path().join(".gitignore"), "target/\n").unwrap();

        preflight(tmp.path(), &Config::default()).unwrap();

        let ignore = fs::read_to_string(tmp.path().join(".gitignore")).unwrap();
        assert!(ignore.starts_with("target/\n"));
        assert!(ignore.contains(".worktrees"));
    }

    #[test]
    fn preflight_is_idempotent() {
        let tmp = setup_repo();

        preflight(tmp.path(), &Config::default()).unwrap();
        let first = fs::read_to_string(tmp.path().join(".gitignore")).unwrap();
        preflight(tmp.path(), &Config::default()).unwrap();
        let second = fs::read_to_string(tmp.path().join(".gitignore")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn configured_scratch_dir_is_respected() {
        let tmp = setup_repo();
        fs::write(tmp.path().join(".arbor.toml"), "worktree_dir = \"wt\"\n").unwrap();
        let config = Config::load(tmp.path()).unwrap();

        preflight(tmp.path(), &config).unwrap();

        assert!(tmp.path().join("wt").is_dir());
        let ignore = fs::read_to_string(tmp.path().join(".gitignore")).unwrap();
        assert!(ignore.contains("wt"));
    }
}
