use std::{mem, result::Result as StdResult};

use crate::{
    error::ArborError,
    git::WorktreeCommands,
    porcelain::WorktreeRecord,
    registry::{Failure, Registry},
};

/// Interaction mode of the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Navigating the worktree listing.
    #[default]
    Browse,
    /// Typing the name for a new worktree.
    NameEntry,
}

/// A single input event, abstracted away from any terminal backend.
///
/// The terminal layer translates raw key events into this alphabet without
/// interpreting bindings; the mode-dependent dispatch table lives entirely
/// in [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A printable character.
    Char(char),
    /// A character pressed together with Control.
    Ctrl(char),
    /// Cursor up.
    Up,
    /// Cursor down.
    Down,
    /// Return.
    Enter,
    /// Escape.
    Escape,
    /// Backspace.
    Backspace,
}

/// External operation the dispatch table asks the driver to run.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Create a worktree with the entered name.
    Create(String),
    /// Delete the identified worktree.
    Remove(String),
    /// Lock the identified worktree.
    Lock(String),
    /// Unlock the identified worktree.
    Unlock(String),
}

/// Modal interaction state: mode, cursor, pending input, and the last error.
///
/// Dispatching an event only mutates this state and decides which external
/// operation, if any, should run; performing the operation is the driver's
/// job. That keeps the whole transition table testable without spawning a
/// single process.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Current interaction mode.
    mode: Mode,
    /// Index of the highlighted record; clamped into the listing bounds, 0
    /// when the listing is empty.
    cursor: usize,
    /// In-progress worktree name while in name-entry mode.
    input: String,
    /// Most recent failure; replaced or cleared by the next operation, never
    /// accumulated.
    last_error: Option<Failure>,
    /// Whether the user asked to leave the session.
    should_quit: bool,
}

impl SessionState {
    /// Current interaction mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Index of the highlighted record.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// In-progress worktree name while in name-entry mode.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Most recent failure, if one is pending display.
    pub fn last_error(&self) -> Option<&Failure> {
        self.last_error.as_ref()
    }

    /// Whether the user asked to leave the session.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Feed one event through the mode-dependent dispatch table.
    fn dispatch(&mut self, event: InputEvent, items: &[WorktreeRecord]) -> Option<Command> {
        match self.mode {
            Mode::Browse => self.dispatch_browse(event, items),
            Mode::NameEntry => self.dispatch_name_entry(event),
        }
    }

    /// Browse-mode transitions: quit, navigation, and the mutating chords.
    /// On an empty listing the mutating chords do nothing and the cursor
    /// stays at 0.
    fn dispatch_browse(&mut self, event: InputEvent, items: &[WorktreeRecord]) -> Option<Command> {
        match event {
            InputEvent::Escape | InputEvent::Char('q') => {
                self.should_quit = true;
                None
            }
            InputEvent::Up | InputEvent::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            InputEvent::Down | InputEvent::Char('j') => {
                if self.cursor + 1 < items.len() {
                    self.cursor += 1;
                }
                None
            }
            InputEvent::Ctrl('a') => {
                self.mode = Mode::NameEntry;
                self.input.clear();
                None
            }
            InputEvent::Ctrl('d') => {
                let record = items.get(self.cursor)?;
                if record.locked {
                    self.last_error = Some(Failure::new(ArborError::WorktreeLocked {
                        name: record.name(),
                    }));
                    None
                } else {
                    Some(Command::Remove(record.name()))
                }
            }
            InputEvent::Ctrl('l') => {
                let record = items.get(self.cursor)?;
                (!record.locked).then(|| Command::Lock(record.name()))
            }
            InputEvent::Ctrl('u') => {
                let record = items.get(self.cursor)?;
                record.locked.then(|| Command::Unlock(record.name()))
            }
            _ => None,
        }
    }

    /// Name-entry transitions: cancel, confirm, and line editing. Navigation
    /// keys fall through to the buffer or are ignored.
    fn dispatch_name_entry(&mut self, event: InputEvent) -> Option<Command> {
        match event {
            InputEvent::Escape => {
                self.input.clear();
                self.mode = Mode::Browse;
                None
            }
            InputEvent::Enter => {
                let name = mem::take(&mut self.input);
                self.mode = Mode::Browse;
                Some(Command::Create(name))
            }
            InputEvent::Char(character) => {
                self.input.push(character);
                None
            }
            InputEvent::Backspace => {
                self.input.pop();
                None
            }
            _ => None,
        }
    }

    /// Clamp the cursor into the bounds of a listing of `len` records.
    fn clamp_cursor(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }
}

/// Session driver: owns the interaction state and the registry, executes the
/// operations the dispatch table produces, and records failures for display.
pub struct Session<G> {
    /// Interaction state consumed by the view projection.
    state: SessionState,
    /// The listing and its mutating operations.
    registry: Registry<G>,
}

impl<G: WorktreeCommands> Session<G> {
    /// Start a session over the registry, performing the initial listing.
    ///
    /// A pre-flight failure is attached as the first displayed error; the
    /// session still starts so the message is visible. A failed initial
    /// listing likewise surfaces instead of aborting, leaving the listing
    /// empty until a later operation refreshes it.
    pub fn new(mut registry: Registry<G>, checks: StdResult<(), ArborError>) -> Self {
        let last_error = match (checks.err(), registry.refresh().err()) {
            (None, None) => None,
            (None, Some(list_error)) => Some(Failure::new(list_error)),
            (Some(check_error), None) => Some(Failure::new(check_error)),
            (Some(check_error), Some(list_error)) => Some(Failure {
                error: check_error,
                suppressed: Some(list_error),
            }),
        };
        let state = SessionState {
            last_error,
            ..SessionState::default()
        };
        Self { state, registry }
    }

    /// Interaction state, for the view projection.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current records, in listing order.
    pub fn items(&self) -> &[WorktreeRecord] {
        self.registry.items()
    }

    /// Whether the user asked to leave the session.
    pub fn should_quit(&self) -> bool {
        self.state.should_quit
    }

    /// Handle one input event to completion, including any external tool
    /// invocation and the refresh that follows it. Returns once the listing
    /// and the displayed error reflect the outcome.
    pub fn handle(&mut self, event: InputEvent) {
        let Some(command) = self.state.dispatch(event, self.registry.items()) else {
            return;
        };

        let outcome = match command {
            Command::Create(name) => self.registry.add(&name),
            Command::Remove(name) => {
                let outcome = self.registry.remove(&name);
                self.state.cursor = 0;
                outcome
            }
            Command::Lock(name) => self.registry.lock(&name),
            Command::Unlock(name) => self.registry.unlock(&name),
        };

        self.state.last_error = outcome.err();
        self.state.clamp_cursor(self.registry.items().len());
    }
}
