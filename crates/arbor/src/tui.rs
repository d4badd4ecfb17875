use std::{io, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use libarbor::{InputEvent, Session, SystemGit, view};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::ui;

/// Poll timeout for input; keeps the loop responsive to terminal resizes.
const TICK: Duration = Duration::from_millis(250);

/// Terminal type the session runs on.
type Tty = Terminal<CrosstermBackend<io::Stdout>>;

/// Run the interactive session until the user quits, restoring the terminal
/// on every exit path.
pub fn run(mut session: Session<SystemGit>) -> Result<()> {
    install_panic_hook();

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter the alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut session, &mut terminal);

    if let Err(err) = restore_terminal(&mut terminal) {
        tracing::error!(error = %err, "failed to restore the terminal");
    }

    result
}

/// Pump input events through the session, one at a time, until it quits.
fn event_loop(session: &mut Session<SystemGit>, terminal: &mut Tty) -> Result<()> {
    loop {
        let model = view(session.state(), session.items());
        terminal.draw(|frame| ui::render(frame, &model))?;

        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(input) = translate(key.code, key.modifiers)
        {
            session.handle(input);
        }

        if session.should_quit() {
            return Ok(());
        }
    }
}

/// Translate a crossterm key event into the session's input alphabet.
/// Bindings are not interpreted here; the session owns the dispatch table.
fn translate(code: KeyCode, modifiers: KeyModifiers) -> Option<InputEvent> {
    match code {
        KeyCode::Char(character) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputEvent::Ctrl(character))
        }
        KeyCode::Char(character) => Some(InputEvent::Char(character)),
        KeyCode::Up => Some(InputEvent::Up),
        KeyCode::Down => Some(InputEvent::Down),
        KeyCode::Enter => Some(InputEvent::Enter),
        KeyCode::Esc => Some(InputEvent::Escape),
        KeyCode::Backspace => Some(InputEvent::Backspace),
        _ => None,
    }
}

/// Restore the terminal to cooked mode on the main screen.
fn restore_terminal(terminal: &mut Tty) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Leave the alternate screen before the default panic output runs, so the
/// message lands on a readable terminal.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_and_control_characters_are_distinguished() {
        assert_eq!(
            translate(KeyCode::Char('a'), KeyModifiers::NONE),
            Some(InputEvent::Char('a'))
        );
        assert_eq!(
            translate(KeyCode::Char('a'), KeyModifiers::CONTROL),
            Some(InputEvent::Ctrl('a'))
        );
    }

    #[test]
    fn special_keys_map_onto_the_input_alphabet() {
        assert_eq!(translate(KeyCode::Up, KeyModifiers::NONE), Some(InputEvent::Up));
        assert_eq!(
            translate(KeyCode::Down, KeyModifiers::NONE),
            Some(InputEvent::Down)
        );
        assert_eq!(
            translate(KeyCode::Enter, KeyModifiers::NONE),
            Some(InputEvent::Enter)
        );
        assert_eq!(
            translate(KeyCode::Esc, KeyModifiers::NONE),
            Some(InputEvent::Escape)
        );
        assert_eq!(
            translate(KeyCode::Backspace, KeyModifiers::NONE),
            Some(InputEvent::Backspace)
        );
    }

    #[test]
    fn unbound_keys_are_dropped() {
        assert_eq!(translate(KeyCode::Tab, KeyModifiers::NONE), None);
        assert_eq!(translate(KeyCode::F(1), KeyModifiers::NONE), None);
    }
}
