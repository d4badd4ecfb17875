//! In-memory double of the external git collaborator, shared by the unit
//! tests that must observe calls without spawning processes.

use std::{cell::RefCell, path::Path, rc::Rc};

use crate::git::{GitResult, WorktreeCommands};

/// Scriptable [`WorktreeCommands`] implementation that records every call.
#[derive(Default)]
pub(crate) struct FakeGit {
    /// Chronological log of calls, one compact entry per call.
    pub(crate) calls: RefCell<Vec<String>>,
    /// Porcelain text returned by listing calls.
    pub(crate) listing: RefCell<String>,
    /// When set, listing calls fail with this message.
    pub(crate) list_error: RefCell<Option<String>>,
    /// When set, mutating calls fail with this message.
    pub(crate) mutation_error: RefCell<Option<String>>,
}

impl FakeGit {
    /// A fake whose listing calls return `raw`, wrapped for sharing between
    /// the test and the registry under test.
    pub(crate) fn with_listing(raw: &str) -> Rc<Self> {
        let fake = Self::default();
        *fake.listing.borrow_mut() = raw.to_string();
        Rc::new(fake)
    }

    /// Drain and return the recorded calls.
    pub(crate) fn take_calls(&self) -> Vec<String> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    /// Record a call entry.
    fn log(&self, entry: String) {
        self.calls.borrow_mut().push(entry);
    }

    /// Record a mutating call and apply the scripted failure, if any.
    fn mutate(&self, entry: String) -> GitResult<()> {
        self.log(entry);
        match self.mutation_error.borrow().clone() {
            Some(message) => Err(message),
            None => Ok(()),
        }
    }
}

impl WorktreeCommands for Rc<FakeGit> {
    fn list_porcelain(&self) -> GitResult<String> {
        self.log("list".to_string());
        match self.list_error.borrow().clone() {
            Some(message) => Err(message),
            None => Ok(self.listing.borrow().clone()),
        }
    }

    fn add(&self, path: &Path) -> GitResult<()> {
        self.mutate(format!("add {}", path.display()))
    }

    fn remove(&self, name: &str) -> GitResult<()> {
        self.mutate(format!("remove {name}"))
    }

    fn lock(&self, name: &str) -> GitResult<()> {
        self.mutate(format!("lock {name}"))
    }

    fn unlock(&self, name: &str) -> GitResult<()> {
        self.mutate(format!("unlock {name}"))
    }

    fn prune(&self) -> GitResult<()> {
        self.mutate("prune".to_string())
    }
}

/// Porcelain fixture with a primary checkout and two secondary worktrees,
/// one of them locked.
pub(crate) const THREE_WORKTREES: &str = "worktree /r\nHEAD abc123\nbranch refs/heads/main\n\nworktree /r/.worktrees/feature\nHEAD def456\nbranch refs/heads/feature\n\nworktree /r/.worktrees/pinned\nHEAD 789abc\nbranch refs/heads/pinned\nlocked\n";
