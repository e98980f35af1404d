//! Terminal UI.

mod actions;
mod app;
mod help;
mod input;
mod keymap;
mod ui;

pub use app::App;
pub use input::run;
pub use keymap::load_keymap;
