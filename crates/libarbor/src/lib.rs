#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
//! Core library for arbor, an interactive manager for Git worktrees.
//!
//! This crate holds everything that is not a terminal concern: parsing the
//! porcelain listing format, the registry that keeps an in-memory listing
//! synchronized with on-disk state, the modal session state machine, and the
//! pure projection the renderer consumes. The TUI binary in `crates/arbor`
//! builds on top of it.

/// Per-repository configuration loading.
mod config;
/// Error taxonomy shared across the crate.
mod error;
/// External `git worktree` collaborator trait and its process-spawning
/// implementation.
mod git;
/// Parser for the porcelain worktree listing format.
mod porcelain;
/// Ordered worktree listing and the mutating operations over it.
mod registry;
/// One-time repository checks run before a session starts.
mod repo;
/// Modal interaction state machine and its driver.
mod session;
/// Projection from session state to a renderable view model.
mod view;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::Config;
pub use error::{ArborError, Result};
pub use git::{GitResult, SystemGit, WorktreeCommands};
pub use porcelain::{WorktreeRecord, parse};
pub use registry::{Failure, Registry};
pub use repo::preflight;
pub use session::{InputEvent, Mode, Session, SessionState};
pub use view::{ViewModel, WorktreeRow, view};
