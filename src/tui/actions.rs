use crossterm::event::{self, KeyCode, KeyModifiers};

use super::app::{App, Mode};
use super::keymap::Action;

/// Handle text editing operations on a buffer with UTF-8 aware cursor
/// movement.
fn handle_text_input(buffer: &mut String, cursor: &mut usize, key: event::KeyEvent) {
    match key.code {
        KeyCode::Left => {
            if *cursor > 0 {
                let mut new_pos = *cursor - 1;
                while new_pos > 0 && !buffer.is_char_boundary(new_pos) {
                    new_pos -= 1;
                }
                *cursor = new_pos;
            }
        }
        KeyCode::Right => {
            if *cursor < buffer.len() {
                let mut new_pos = *cursor + 1;
                while new_pos < buffer.len() && !buffer.is_char_boundary(new_pos) {
                    new_pos += 1;
                }
                *cursor = new_pos;
            }
        }
        KeyCode::Home => {
            *cursor = 0;
        }
        KeyCode::End => {
            *cursor = buffer.len();
        }
        KeyCode::Backspace => {
            if *cursor > 0 {
                let mut del_start = *cursor - 1;
                while del_start > 0 && !buffer.is_char_boundary(del_start) {
                    del_start -= 1;
                }
                buffer.drain(del_start..*cursor);
                *cursor = del_start;
            }
        }
        KeyCode::Delete => {
            if *cursor < buffer.len() {
                let mut del_end = *cursor + 1;
                while del_end < buffer.len() && !buffer.is_char_boundary(del_end) {
                    del_end += 1;
                }
                buffer.drain(*cursor..del_end);
            }
        }
        KeyCode::Char(c) => {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                buffer.insert(*cursor, c);
                *cursor += c.len_utf8();
            }
        }
        _ => {}
    }
}

/// Result of applying an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyResult {
    Continue,
    Quit,
}

/// Apply an action to the application state.
///
/// Returns `ApplyResult::Quit` if the application should exit.
pub fn apply_action(app: &mut App, action: Action) -> ApplyResult {
    match action {
        Action::Cancel => match app.mode {
            Mode::Edit => {
                app.mode = Mode::Normal;
                app.edit_buffer.clear();
                app.edit_cursor = 0;
            }
            Mode::Command => {
                app.mode = Mode::Normal;
                app.command_buffer.clear();
                app.command_cursor = 0;
            }
            Mode::Normal => {}
        },

        Action::EnterEdit => app.enter_edit_mode(),
        Action::CommitEdit => app.commit_edit(),
        Action::EnterCommand => {
            app.mode = Mode::Command;
            app.command_buffer.clear();
            app.command_cursor = 0;
        }
        Action::ExecuteCommand => {
            if app.execute_command() {
                return ApplyResult::Quit;
            }
        }

        Action::ToggleView => app.toggle_view(),
        Action::Move(dx, dy) => app.move_cursor(dx, dy),
        Action::Copy(dx, dy) => app.copy_to(dx, dy),
        Action::Page(dir) => {
            let delta = app.visible_rows as i32 * dir;
            app.move_cursor(0, delta);
        }
        Action::GotoFirst => {
            app.cursor_row = 0;
            app.cursor_col = 0;
            app.update_viewport();
        }
        Action::GotoLast => app.goto_last(),

        Action::Save => app.save(),
        Action::Help => app.help_modal = true,
        Action::Quit => {
            if app.request_quit() {
                return ApplyResult::Quit;
            }
        }
    }
    ApplyResult::Continue
}

pub fn handle_edit_text(app: &mut App, key: event::KeyEvent) {
    handle_text_input(&mut app.edit_buffer, &mut app.edit_cursor, key);
}

pub fn handle_command_text(app: &mut App, key: event::KeyEvent) {
    handle_text_input(&mut app.command_buffer, &mut app.command_cursor, key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn text_input_inserts_at_cursor() {
        let mut buffer = "ac".to_string();
        let mut cursor = 1;
        handle_text_input(&mut buffer, &mut cursor, press(KeyCode::Char('b')));
        assert_eq!(buffer, "abc");
        assert_eq!(cursor, 2);
    }

    #[test]
    fn backspace_removes_a_whole_char() {
        let mut buffer = "aé".to_string();
        let mut cursor = buffer.len();
        handle_text_input(&mut buffer, &mut cursor, press(KeyCode::Backspace));
        assert_eq!(buffer, "a");
        assert_eq!(cursor, 1);
    }

    #[test]
    fn arrows_respect_char_boundaries() {
        let mut buffer = "é".to_string();
        let mut cursor = buffer.len();
        handle_text_input(&mut buffer, &mut cursor, press(KeyCode::Left));
        assert_eq!(cursor, 0);
        handle_text_input(&mut buffer, &mut cursor, press(KeyCode::Right));
        assert_eq!(cursor, buffer.len());
    }

    #[test]
    fn quit_action_respects_confirmation() {
        let mut app = App::new();
        app.core.set_cell_text(0, 0, "x").expect("in range");
        assert_eq!(apply_action(&mut app, Action::Quit), ApplyResult::Continue);
        assert_eq!(apply_action(&mut app, Action::Quit), ApplyResult::Quit);
    }

    #[test]
    fn cancel_leaves_edit_mode_without_committing() {
        let mut app = App::new();
        app.enter_edit_mode();
        app.edit_buffer = "discarded".to_string();
        apply_action(&mut app, Action::Cancel);
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.core.sheet.text(0, 0), Some(""));
    }
}
