use clap::{Parser, Subcommand};

/// Top-level CLI options for arbor.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Override the repository directory (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub repo_dir: Option<String>,

    /// The command to execute; the interactive UI starts when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Non-interactive subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Print the worktree listing and exit
    #[command(alias = "ls")]
    List,

    /// Drop stale entries for worktree directories deleted externally
    Prune,
}
