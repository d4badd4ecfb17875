use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Custom Result type for arbor operations.
pub type Result<T> = StdResult<T, ArborError>;

/// Arbor-specific error types.
///
/// Mutating variants carry the external tool's message verbatim; arbor does
/// not interpret it beyond success or failure.
#[derive(Error, Debug)]
pub enum ArborError {
    /// A startup repository check failed. Non-fatal: the session still runs,
    /// inert, so the message can be displayed.
    #[error("repository check failed: {0}")]
    Preflight(String),

    /// Listing worktrees failed. The previous listing is kept.
    #[error("can't list worktrees: {0}")]
    List(String),

    /// Creating a worktree failed.
    #[error("can't create worktree '{name}': {message}")]
    Create {
        /// Name the worktree would have been created under.
        name: String,
        /// The tool's failure message.
        message: String,
    },

    /// Deleting a worktree failed.
    #[error("can't delete worktree '{name}': {message}")]
    Delete {
        /// Name of the worktree that was being deleted.
        name: String,
        /// The tool's failure message.
        message: String,
    },

    /// Locking a worktree failed.
    #[error("can't lock worktree '{name}': {message}")]
    Lock {
        /// Name of the worktree that was being locked.
        name: String,
        /// The tool's failure message.
        message: String,
    },

    /// Unlocking a worktree failed.
    #[error("can't unlock worktree '{name}': {message}")]
    Unlock {
        /// Name of the worktree that was being unlocked.
        name: String,
        /// The tool's failure message.
        message: String,
    },

    /// Pruning stale worktree entries failed.
    #[error("can't prune worktrees: {0}")]
    Prune(String),

    /// The target worktree is lock-protected. Raised locally, before any
    /// external call is made.
    #[error("can't delete locked worktree '{name}', unlock it first")]
    WorktreeLocked {
        /// Name of the lock-protected worktree.
        name: String,
    },

    /// The configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An underlying I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ArborError {
    /// Return the recommended process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Preflight(_) | Self::Config(_) => 2,
            Self::List(_) => 3,
            Self::Create { .. }
            | Self::Delete { .. }
            | Self::Lock { .. }
            | Self::Unlock { .. }
            | Self::Prune(_)
            | Self::WorktreeLocked { .. } => 4,
            Self::Io(_) => 1,
        }
    }
}
