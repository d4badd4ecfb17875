#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
//! Interactive terminal front-end for managing Git worktrees via the
//! libarbor crate.

use std::{env, fs, path::PathBuf, process, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use libarbor::{ArborError, Config, Registry, Session, SystemGit, preflight};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line argument definitions.
mod args;
/// Terminal lifecycle and the interactive event loop.
mod tui;
/// Frame rendering from the session view model.
mod ui;

use args::{Cli, Commands};

/// CLI entrypoint.
fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        let code = err
            .downcast_ref::<ArborError>()
            .map_or(1, ArborError::exit_code);
        process::exit(code);
    }
}

/// Dispatch the parsed command line.
fn run(cli: Cli) -> Result<()> {
    // Logging is best-effort; a read-only home directory must not take the
    // whole tool down.
    if let Err(err) = init_logging() {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let repo_dir = match cli.repo_dir {
        Some(dir) => PathBuf::from(dir),
        None => env::current_dir().context("failed to determine the current directory")?,
    };

    let config = Config::load(&repo_dir)?;
    let git = SystemGit::new(&repo_dir);
    let scratch_dir = repo_dir.join(config.worktree_dir());
    let mut registry = Registry::new(git, scratch_dir);

    match cli.command {
        Some(Commands::List) => list(&mut registry),
        Some(Commands::Prune) => prune(&mut registry),
        None => {
            info!(repo_dir = %repo_dir.display(), "starting interactive session");
            let checks = preflight(&repo_dir, &config);
            tui::run(Session::new(registry, checks))
        }
    }
}

/// Run `arbor list`: print the current listing to stdout.
fn list(registry: &mut Registry<SystemGit>) -> Result<()> {
    registry.refresh()?;

    if registry.items().is_empty() {
        println!("No worktrees found.");
        return Ok(());
    }

    for record in registry.items() {
        let commit: String = record.commit.chars().take(7).collect();
        let lock_marker = if record.locked { "  [locked]" } else { "" };
        println!("{:7}  {}{}", commit, record.name(), lock_marker);
    }

    Ok(())
}

/// Run `arbor prune`: drop stale administrative entries once.
fn prune(registry: &mut Registry<SystemGit>) -> Result<()> {
    registry
        .prune()
        .map_err(|failure| anyhow::Error::new(failure.into_error()))?;
    println!("Pruned stale worktree entries.");
    Ok(())
}

/// Route tracing output to `~/.arbor/arbor.log`, filtered by `ARBOR_LOG`.
/// The terminal belongs to the UI, so nothing is written to stderr.
fn init_logging() -> Result<()> {
    let log_dir = env::var("HOME")
        .map(|home| PathBuf::from(home).join(".arbor"))
        .unwrap_or_else(|_| PathBuf::from(".arbor"));
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_path = log_dir.join("arbor.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ARBOR_LOG")
                .unwrap_or_else(|_| EnvFilter::new("arbor=info,libarbor=info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
