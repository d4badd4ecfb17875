use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Result, ensure};
use tempfile::TempDir;

/// Return the path to the compiled `arbor` binary for integration tests.
pub fn arbor_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_arbor"))
}

/// Run a git command inside `repo_path`, ensuring it succeeds.
pub fn git(repo_path: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new("git")
        .current_dir(repo_path)
        .args(args)
        .output()
        .with_context(|| format!("failed to run git {}", args.join(" ")))?;

    ensure!(
        output.status.success(),
        "git command failed: git {}\nstdout: {}\nstderr: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(output)
}

/// Initialise a new repository at `repo_path` with a README commit.
pub fn init_repository(repo_path: &Path) -> Result<()> {
    if !repo_path.exists() {
        fs::create_dir_all(repo_path)?;
    }

    git(repo_path, &["init", "-b", "main"])?;
    git(repo_path, &["config", "user.email", "test@example.com"])?;
    git(repo_path, &["config", "user.name", "Test User"])?;

    fs::write(repo_path.join("README.md"), "# Test Project")?;
    git(repo_path, &["add", "README.md"])?;
    git(repo_path, &["commit", "-m", "Initial commit"])?;

    Ok(())
}

/// Create a temporary repository with the provided name under a temp dir.
pub fn create_repo(repo_name: &str) -> Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let repo_path = temp_dir.path().join(repo_name);
    init_repository(&repo_path)?;
    Ok((temp_dir, repo_path))
}

/// Run `arbor` inside `repo_path` with the provided arguments.
pub fn run_arbor(repo_path: &Path, args: &[&str]) -> Result<Output> {
    let mut cmd = Command::new(arbor_binary());
    cmd.current_dir(repo_path);
    cmd.args(args);
    cmd.output()
        .with_context(|| format!("failed to run arbor {}", args.join(" ")))
}
