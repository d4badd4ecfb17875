use std::{path::PathBuf, result::Result as StdResult};

use tracing::{info, warn};

use crate::{
    error::{ArborError, Result},
    git::WorktreeCommands,
    porcelain::{self, WorktreeRecord},
};

/// Error surfaced by a mutating operation, together with any refresh failure
/// that occurred while re-synchronizing afterwards.
///
/// When both the mutation and the follow-up refresh fail, the mutation's own
/// error is the one to display; the refresh failure is retained here so it
/// stays distinguishable instead of being silently overwritten.
#[derive(Debug)]
pub struct Failure {
    /// The error to display.
    pub error: ArborError,
    /// Refresh failure masked by the more actionable primary error.
    pub suppressed: Option<ArborError>,
}

impl Failure {
    /// Wrap a lone error with no masked refresh failure.
    pub(crate) fn new(error: ArborError) -> Self {
        Self {
            error,
            suppressed: None,
        }
    }

    /// Discard the suppressed secondary and keep the displayable error.
    pub fn into_error(self) -> ArborError {
        self.error
    }
}

/// Owns the current ordered worktree listing and the mutating operations
/// that keep it synchronized with on-disk state.
///
/// The listing is never patched in place: every successful refresh replaces
/// it wholesale with a fresh parse, so the in-memory view cannot drift from
/// what the tool reports. Every mutating operation is followed by a refresh
/// regardless of its own outcome.
pub struct Registry<G> {
    /// External collaborator executing the actual tool calls.
    git: G,
    /// Directory new worktrees are created under.
    scratch_dir: PathBuf,
    /// Current records, in the order reported by the listing tool.
    items: Vec<WorktreeRecord>,
}

impl<G: WorktreeCommands> Registry<G> {
    /// Create an empty registry; call [`Registry::refresh`] to populate it.
    pub fn new(git: G, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            git,
            scratch_dir: scratch_dir.into(),
            items: Vec::new(),
        }
    }

    /// Current records, in listing order.
    pub fn items(&self) -> &[WorktreeRecord] {
        &self.items
    }

    /// Re-list and replace the records wholesale. On failure the previous
    /// records are kept: a stale listing beats an empty one.
    pub fn refresh(&mut self) -> Result<()> {
        match self.git.list_porcelain() {
            Ok(raw) => {
                self.items = porcelain::parse(&raw);
                info!(count = self.items.len(), "refreshed worktree listing");
                Ok(())
            }
            Err(message) => Err(ArborError::List(message)),
        }
    }

    /// Create a new worktree named `name` under the scratch directory, then
    /// refresh. The refresh runs even when creation fails so the listing
    /// reflects best-known reality.
    pub fn add(&mut self, name: &str) -> StdResult<(), Failure> {
        let path = self.scratch_dir.join(name);
        info!(name, path = %path.display(), "creating worktree");
        let created = self.git.add(&path).map_err(|message| ArborError::Create {
            name: name.to_string(),
            message,
        });
        self.finish_mutation(created)
    }

    /// Delete the worktree identified by `name`, then refresh. A
    /// lock-protected worktree is rejected here without reaching the
    /// external tool.
    pub fn remove(&mut self, name: &str) -> StdResult<(), Failure> {
        if self.find(name).is_some_and(|record| record.locked) {
            return Err(Failure::new(ArborError::WorktreeLocked {
                name: name.to_string(),
            }));
        }
        info!(name, "deleting worktree");
        let removed = self.git.remove(name).map_err(|message| ArborError::Delete {
            name: name.to_string(),
            message,
        });
        self.finish_mutation(removed)
    }

    /// Protect the worktree identified by `name` from removal, then refresh.
    /// A no-op when the record is already locked, so the tool is not invoked
    /// just to fail.
    pub fn lock(&mut self, name: &str) -> StdResult<(), Failure> {
        if self.find(name).is_some_and(|record| record.locked) {
            return Ok(());
        }
        info!(name, "locking worktree");
        let locked = self.git.lock(name).map_err(|message| ArborError::Lock {
            name: name.to_string(),
            message,
        });
        self.finish_mutation(locked)
    }

    /// Lift the removal protection of the worktree identified by `name`,
    /// then refresh. A no-op when the record is not locked.
    pub fn unlock(&mut self, name: &str) -> StdResult<(), Failure> {
        if self.find(name).is_some_and(|record| !record.locked) {
            return Ok(());
        }
        info!(name, "unlocking worktree");
        let unlocked = self.git.unlock(name).map_err(|message| ArborError::Unlock {
            name: name.to_string(),
            message,
        });
        self.finish_mutation(unlocked)
    }

    /// Drop stale administrative entries for worktree directories deleted
    /// externally, then refresh.
    pub fn prune(&mut self) -> StdResult<(), Failure> {
        info!("pruning stale worktree entries");
        let pruned = self.git.prune().map_err(ArborError::Prune);
        self.finish_mutation(pruned)
    }

    /// Run the refresh that follows every mutation and fold the two
    /// outcomes. The mutation's own error takes display precedence; a
    /// refresh failure behind it is kept as a suppressed secondary.
    fn finish_mutation(&mut self, outcome: Result<()>) -> StdResult<(), Failure> {
        let refreshed = self.refresh();
        match (outcome, refreshed) {
            (Ok(()), Ok(())) => Ok(()),
            (Ok(()), Err(refresh_error)) => Err(Failure::new(refresh_error)),
            (Err(error), Ok(())) => Err(Failure::new(error)),
            (Err(error), Err(refresh_error)) => {
                warn!(suppressed = %refresh_error, "refresh failed after a failed mutation");
                Err(Failure {
                    error,
                    suppressed: Some(refresh_error),
                })
            }
        }
    }

    /// Look up a record by its derived identifier.
    fn find(&self, name: &str) -> Option<&WorktreeRecord> {
        self.items.iter().find(|record| record.name() == name)
    }
}
