use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io;

use super::actions::{ApplyResult, apply_action, handle_command_text, handle_edit_text};
use super::app::{App, Mode};
use super::keymap::translate;
use super::ui;

/// Set up the terminal, run the event loop, and restore the terminal on the
/// way out (including the error paths).
pub fn run(app: &mut App) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.map_err(Into::into)
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            // Only process key press events (Windows reports Press + Release)
            if key.kind != KeyEventKind::Press {
                continue;
            }

            // Help modal takes over input
            if app.help_modal {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter
                ) {
                    app.help_modal = false;
                }
                continue;
            }

            if let Some(action) = translate(&app.keymap, app.mode, key) {
                if apply_action(app, action) == ApplyResult::Quit {
                    return Ok(());
                }
                continue;
            }

            // Text entry fallbacks (not bound in keymaps).
            match app.mode {
                Mode::Edit => handle_edit_text(app, key),
                Mode::Command => handle_command_text(app, key),
                Mode::Normal => {}
            }
        }
    }
}
