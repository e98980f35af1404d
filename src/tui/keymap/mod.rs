//! Keymap translation layer.
//!
//! Keeps key handling separate from app behavior: the keymap turns key
//! events into [`Action`]s, which `actions::apply_action` executes.

mod defaults;
mod parse;
mod types;

pub use parse::load_keymap;
pub use types::{Action, Binding, CustomKeymap, KeyCombo, Keymap, KeymapBindings};

use crate::tui::app::Mode;
use crossterm::event::KeyEvent;

/// Translate a key event to an action based on the current keymap and mode.
///
/// Returns `None` if the key has no binding in the current context.
pub fn translate(keymap: &Keymap, mode: Mode, key: KeyEvent) -> Option<Action> {
    match keymap {
        Keymap::Default => defaults::translate_default(mode, key),
        Keymap::Custom(custom) => custom.translate(mode, key),
    }
}
