//! Application state and logic.
//!
//! [`App`] holds all interactive state: the document, cursor and viewport,
//! the active view (values or formulas), editing buffers, and modal UI
//! flags. The app operates in different [`Mode`]s (Normal, Edit, Command).

use gridcalc_core::{Document, Result, View};
use std::path::PathBuf;

use super::keymap::Keymap;

/// Modal editing state for the application.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigate the grid, execute single-key commands.
    Normal,
    /// Edit the contents of the current cell.
    Edit,
    /// Enter ex-style commands (`:w`, `:q`, `:goto`, ...).
    Command,
}

/// Main application state container.
pub struct App {
    /// The document (sheet + file binding).
    pub core: Document,
    /// Current cursor position (row).
    pub cursor_row: usize,
    /// Current cursor position (column).
    pub cursor_col: usize,
    /// First visible row.
    pub viewport_row: usize,
    /// Number of visible rows (updated from the terminal size each frame).
    pub visible_rows: usize,
    /// Which rendering of the sheet is shown.
    pub view: View,
    /// Current mode.
    pub mode: Mode,
    /// Edit buffer for cell editing.
    pub edit_buffer: String,
    /// Cursor position within the edit buffer (byte offset).
    pub edit_cursor: usize,
    /// Command buffer for command mode.
    pub command_buffer: String,
    /// Cursor position within the command buffer (byte offset).
    pub command_cursor: usize,
    /// Status message to display.
    pub status_message: String,
    /// Set after a refused quit, so a second `q` goes through.
    pub confirm_quit: bool,
    /// Help modal state.
    pub help_modal: bool,
    /// Active keymap.
    pub keymap: Keymap,
}

impl App {
    /// Create a new application.
    pub fn new() -> Self {
        App {
            core: Document::new(),
            cursor_row: 0,
            cursor_col: 0,
            viewport_row: 0,
            visible_rows: 16,
            view: View::Values,
            mode: Mode::Normal,
            edit_buffer: String::new(),
            edit_cursor: 0,
            command_buffer: String::new(),
            command_cursor: 0,
            status_message: String::new(),
            confirm_quit: false,
            help_modal: false,
            keymap: Keymap::Default,
        }
    }

    /// Create the app and load a file if provided.
    pub fn with_file(path: Option<PathBuf>, keymap: Keymap) -> Result<Self> {
        let mut app = Self::new();
        app.keymap = keymap;
        app.core = Document::with_file(path)?;
        Ok(app)
    }

    pub fn rows(&self) -> usize {
        self.core.sheet.rows()
    }

    pub fn cols(&self) -> usize {
        self.core.sheet.cols()
    }

    /// Move the cursor by (dx, dy), clamped to the sheet.
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        self.cursor_col = step(self.cursor_col, dx, self.cols());
        self.cursor_row = step(self.cursor_row, dy, self.rows());
        self.update_viewport();
        self.confirm_quit = false;
    }

    /// Scroll so the cursor row is visible.
    pub fn update_viewport(&mut self) {
        if self.cursor_row < self.viewport_row {
            self.viewport_row = self.cursor_row;
        }
        let visible = self.visible_rows.max(1);
        if self.cursor_row >= self.viewport_row + visible {
            self.viewport_row = self.cursor_row + 1 - visible;
        }
    }

    pub fn toggle_view(&mut self) {
        self.view = self.view.toggle();
    }

    /// Start editing the current cell with its raw text in the buffer.
    pub fn enter_edit_mode(&mut self) {
        self.edit_buffer = self
            .core
            .sheet
            .text(self.cursor_row, self.cursor_col)
            .unwrap_or_default()
            .to_string();
        self.edit_cursor = self.edit_buffer.len();
        self.mode = Mode::Edit;
        self.status_message.clear();
    }

    /// Commit the edit buffer into the current cell.
    pub fn commit_edit(&mut self) {
        let text = std::mem::take(&mut self.edit_buffer);
        self.edit_cursor = 0;
        self.mode = Mode::Normal;
        if let Err(e) = self.core.set_cell_text(self.cursor_row, self.cursor_col, &text) {
            self.status_message = format!("Error: {}", e);
        }
    }

    /// Copy the current cell's text to the adjacent cell at (dx, dy) and
    /// move the cursor onto the copy.
    pub fn copy_to(&mut self, dx: i32, dy: i32) {
        let to_col = step(self.cursor_col, dx, self.cols());
        let to_row = step(self.cursor_row, dy, self.rows());
        if (to_row, to_col) == (self.cursor_row, self.cursor_col) {
            return;
        }
        if let Err(e) = self
            .core
            .copy_cell(self.cursor_row, self.cursor_col, to_row, to_col)
        {
            self.status_message = format!("Error: {}", e);
            return;
        }
        self.cursor_row = to_row;
        self.cursor_col = to_col;
        self.update_viewport();
    }

    /// Jump to the last row that has any non-blank cell.
    pub fn goto_last(&mut self) {
        let mut last = 0;
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                if let Some(text) = self.core.sheet.text(row, col)
                    && !text.trim().is_empty()
                {
                    last = row;
                }
            }
        }
        self.cursor_row = last;
        self.update_viewport();
    }

    /// Save to the bound file, or open a `:w ` prompt when there is none.
    pub fn save(&mut self) {
        if self.core.file_path.is_none() {
            self.mode = Mode::Command;
            self.command_buffer = "w ".to_string();
            self.command_cursor = self.command_buffer.len();
            return;
        }
        match self.core.save_file() {
            Ok(path) => self.status_message = format!("Wrote {}", path.display()),
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }

    /// Handle a quit request from the keymap. Returns true if the app
    /// should exit; a modified document needs a second request.
    pub fn request_quit(&mut self) -> bool {
        if self.core.modified && !self.confirm_quit {
            self.confirm_quit = true;
            self.status_message =
                "Unsaved changes: press q again to quit, or w to save".to_string();
            return false;
        }
        true
    }

    /// Execute the command buffer. Returns true if the app should exit.
    pub fn execute_command(&mut self) -> bool {
        let command = std::mem::take(&mut self.command_buffer);
        self.command_cursor = 0;
        self.mode = Mode::Normal;

        let mut parts = command.split_whitespace();
        let Some(name) = parts.next() else {
            return false;
        };
        let args: Vec<&str> = parts.collect();

        match name {
            "q" => {
                if self.core.modified {
                    self.status_message =
                        "Unsaved changes: use :q! to discard, or :w to save".to_string();
                    false
                } else {
                    true
                }
            }
            "q!" => true,
            "w" | "wq" => {
                let result = match args.first() {
                    Some(path) => self.core.save_file_as(std::path::Path::new(path)),
                    None => self.core.save_file(),
                };
                match result {
                    Ok(path) => {
                        self.status_message = format!("Wrote {}", path.display());
                        name == "wq"
                    }
                    Err(e) => {
                        self.status_message = format!("Error: {}", e);
                        false
                    }
                }
            }
            "goto" => {
                self.execute_goto(&args);
                false
            }
            "help" => {
                self.help_modal = true;
                false
            }
            _ => {
                self.status_message = format!("Unknown command: {}", name);
                false
            }
        }
    }

    fn execute_goto(&mut self, args: &[&str]) {
        let coords: Option<(usize, usize)> = match args {
            [row, col] => row.parse().ok().zip(col.parse().ok()),
            _ => None,
        };
        match coords {
            Some((row, col)) if self.core.sheet.in_range(row, col) => {
                self.cursor_row = row;
                self.cursor_col = col;
                self.update_viewport();
                self.status_message.clear();
            }
            Some(_) => self.status_message = "Error: cell out of range".to_string(),
            None => self.status_message = "Usage: goto ROW COL".to_string(),
        }
    }
}

/// Clamp-step an index by a signed delta within [0, limit).
fn step(index: usize, delta: i32, limit: usize) -> usize {
    let moved = index as i64 + delta as i64;
    moved.clamp(0, limit.saturating_sub(1) as i64) as usize
}
