//! Game module - session state and save scheduling

mod state;
mod autosave;

pub use state::{Game, GameStatus};
pub use autosave::{AutoSave, AUTOSAVE_INTERVAL};
