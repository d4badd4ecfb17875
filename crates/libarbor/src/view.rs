use crate::{
    porcelain::WorktreeRecord,
    session::{Mode, SessionState},
};

/// One row of the rendered worktree listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeRow {
    /// Display name: the final segment of the checkout path.
    pub name: String,
    /// Whether the cursor is on this row.
    pub selected: bool,
    /// Whether the entry is lock-protected.
    pub locked: bool,
}

/// Renderable projection of a session. The renderer needs nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    /// Rows in listing order.
    pub rows: Vec<WorktreeRow>,
    /// Current interaction mode.
    pub mode: Mode,
    /// Name buffer, present only while naming a new worktree.
    pub input: Option<String>,
    /// Message for the pending error, if any.
    pub error: Option<String>,
}

/// Project session state and the current listing into a view model. Pure;
/// mutates nothing.
pub fn view(state: &SessionState, items: &[WorktreeRecord]) -> ViewModel {
    let rows = items
        .iter()
        .enumerate()
        .map(|(index, record)| WorktreeRow {
            name: display_name(record),
            selected: index == state.cursor(),
            locked: record.locked,
        })
        .collect();

    ViewModel {
        rows,
        mode: state.mode(),
        input: (state.mode() == Mode::NameEntry).then(|| state.input().to_string()),
        error: state.last_error().map(|failure| failure.error.to_string()),
    }
}

/// Display name for a record: the final segment of its checkout path.
fn display_name(record: &WorktreeRecord) -> String {
    record
        .path
        .file_name()
        .map(|segment| segment.to_string_lossy().into_owned())
        .unwrap_or_else(|| record.path.display().to_string())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{
        registry::Registry,
        session::{InputEvent, Session},
        testutil::{FakeGit, THREE_WORKTREES},
    };

    fn session(git: &Rc<FakeGit>) -> Session<Rc<FakeGit>> {
        Session::new(Registry::new(Rc::clone(git), "/r/.worktrees"), Ok(()))
    }

    #[test]
    fn rows_use_path_segments_and_carry_lock_state() {
        let git = FakeGit::with_listing(THREE_WORKTREES);
        let session = session(&git);

        let model = view(session.state(), session.items());

        assert_eq!(model.rows.len(), 3);
        assert_eq!(model.rows[0].name, "r");
        assert_eq!(model.rows[1].name, "feature");
        assert_eq!(model.rows[2].name, "pinned");
        assert!(model.rows[0].selected);
        assert!(!model.rows[1].selected);
        assert!(model.rows[2].locked);
        assert_eq!(model.mode, Mode::Browse);
        assert!(model.input.is_none());
        assert!(model.error.is_none());
    }

    #[test]
    fn selection_follows_the_cursor() {
        let git = FakeGit::with_listing(THREE_WORKTREES);
        let mut session = session(&git);

        session.handle(InputEvent::Down);
        let model = view(session.state(), session.items());

        assert!(!model.rows[0].selected);
        assert!(model.rows[1].selected);
    }

    #[test]
    fn name_entry_exposes_the_buffer() {
        let git = FakeGit::with_listing(THREE_WORKTREES);
        let mut session = session(&git);

        session.handle(InputEvent::Ctrl('a'));
        session.handle(InputEvent::Char('n'));
        session.handle(InputEvent::Char('u'));
        let model = view(session.state(), session.items());

        assert_eq!(model.mode, Mode::NameEntry);
        assert_eq!(model.input.as_deref(), Some("nu"));
    }

    #[test]
    fn the_displayed_error_is_the_primary_one() {
        let git = FakeGit::with_listing(THREE_WORKTREES);
        let mut session = session(&git);

        session.handle(InputEvent::Down);
        session.handle(InputEvent::Down);
        session.handle(InputEvent::Ctrl('d'));
        let model = view(session.state(), session.items());

        let message = model.error.unwrap();
        assert!(message.contains("locked"));
        assert!(message.contains("pinned"));
    }
}
