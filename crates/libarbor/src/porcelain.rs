use std::{mem, path::PathBuf};

/// A single worktree entry as reported by the porcelain listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorktreeRecord {
    /// Absolute path of the checkout. Non-empty for every parsed record.
    pub path: PathBuf,
    /// Commit currently checked out. Empty for an unborn or bare entry.
    pub commit: String,
    /// Full ref name checked out, e.g. `refs/heads/feature-x`. Empty when
    /// the checkout is detached.
    pub branch_ref: String,
    /// Whether the entry is lock-protected.
    pub locked: bool,
}

impl WorktreeRecord {
    /// Human-facing identifier of the worktree: the final segment of the
    /// branch ref when one is checked out, otherwise the final segment of
    /// the checkout path.
    ///
    /// This is the name the listing tool recognizes as the target of the
    /// mutating calls, so a listed record can always be fed back to them.
    pub fn name(&self) -> String {
        if self.branch_ref.is_empty() {
            self.path
                .file_name()
                .map(|segment| segment.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            self.branch_ref
                .rsplit('/')
                .next()
                .unwrap_or(&self.branch_ref)
                .to_string()
        }
    }
}

/// Parse the porcelain listing text into ordered worktree records.
///
/// The input is a sequence of blank-separated line groups, one group per
/// worktree. A `worktree` line begins a record and carries its path; `HEAD`
/// and `branch` lines fill in the commit and ref; a `locked` marker line
/// flags the record as lock-protected. Remainders are trimmed.
///
/// Parsing is deliberately lenient and never fails: unrecognized lines are
/// skipped, missing fields stay empty, and a record is only emitted once a
/// non-empty path has been seen for it. Order is preserved exactly as
/// encountered. The first record of a well-formed listing is the primary
/// checkout.
pub fn parse(raw: &str) -> Vec<WorktreeRecord> {
    let mut records = Vec::new();
    let mut current = WorktreeRecord::default();

    for line in raw.lines() {
        if let Some(rest) = line.strip_prefix("worktree") {
            let started = WorktreeRecord {
                path: PathBuf::from(rest.trim()),
                ..WorktreeRecord::default()
            };
            let finished = mem::replace(&mut current, started);
            if !finished.path.as_os_str().is_empty() {
                records.push(finished);
            }
        } else if let Some(rest) = line.strip_prefix("HEAD") {
            current.commit = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("branch") {
            current.branch_ref = rest.trim().to_string();
        } else if line.starts_with("locked") {
            current.locked = true;
        }
    }

    if !current.path.as_os_str().is_empty() {
        records.push(current);
    }

    records
}
