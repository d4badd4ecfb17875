use libarbor::{Mode, ViewModel};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

/// Heading shown above the listing.
const TITLE: &str = "arbor - create and delete git worktrees";

/// Key hints shown in browse mode.
const BROWSE_HINTS: &str = "q/esc: quit | j/down: next | k/up: previous | ctrl+a: add | ctrl+d: delete | ctrl+l: lock | ctrl+u: unlock";

/// Key hints shown while naming a new worktree.
const NAME_ENTRY_HINTS: &str = "esc: cancel | enter: create worktree";

/// Prompt prefix for the name-entry line.
const INPUT_PROMPT: &str = "New worktree name: ";

/// Draw one frame from the view model.
pub fn render(frame: &mut Frame<'_>, model: &ViewModel) {
    let [title_area, list_area, input_area, error_area, hints_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let title = Paragraph::new(TITLE).style(
        Style::default()
            .fg(Color::Indexed(200))
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(title, title_area);

    frame.render_widget(listing(model), list_area);

    if let Some(input) = &model.input {
        render_input(frame, input_area, input);
    }

    if let Some(message) = &model.error {
        let error = Paragraph::new(format!("Error: {message}"))
            .style(Style::default().fg(Color::Indexed(196)));
        frame.render_widget(error, error_area);
    }

    let hints = match model.mode {
        Mode::Browse => BROWSE_HINTS,
        Mode::NameEntry => NAME_ENTRY_HINTS,
    };
    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(Color::Indexed(241))),
        hints_area,
    );
}

/// Build the worktree listing widget: a cursor marker for the selected row
/// and a lock marker for protected entries.
fn listing(model: &ViewModel) -> List<'static> {
    let items: Vec<ListItem<'static>> = model
        .rows
        .iter()
        .map(|row| {
            let marker = if row.selected { "> " } else { "  " };
            let style = if row.selected {
                Style::default().fg(Color::Indexed(204))
            } else {
                Style::default().fg(Color::Indexed(252))
            };
            let mut spans = vec![Span::raw(marker), Span::styled(row.name.clone(), style)];
            if row.locked {
                spans.push(Span::raw(" \u{1f512}"));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    List::new(items)
}

/// Draw the name-entry line and park the terminal cursor at the end of the
/// typed text.
fn render_input(frame: &mut Frame<'_>, area: Rect, input: &str) {
    frame.render_widget(Paragraph::new(format!("{INPUT_PROMPT}{input}")), area);

    let cursor_x = area.x + (INPUT_PROMPT.len() + input.chars().count()) as u16;
    frame.set_cursor_position(Position::new(cursor_x.min(area.right()), area.y));
}
