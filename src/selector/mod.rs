//! Full-screen fuzzy selector.
//!
//! Uses `ratatui` + `crossterm` to draw a filter prompt, the ranked candidate
//! list and a preview of the focused candidate. The UI is drawn on stderr so
//! that stdout stays free for the caller's output.

mod matcher;
mod state;
mod ui;

use std::io;
use thiserror::Error;

pub use ui::select;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Exactly one candidate is returned
    Single,
    /// Tab marks candidates; all marks are returned in marking order
    Multi,
}

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("selection cancelled")]
    Cancelled,

    #[error("no candidates to select from")]
    Empty,

    #[error("nothing was selected")]
    NothingSelected,

    #[error("no terminal available")]
    NoTerminal,

    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}
