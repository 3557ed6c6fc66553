//! Helpers for runa-ls.
//!
//! Provides the home directory lookup used by the config loader and terminal width
//! detection for the column layout.

use std::io::IsTerminal;
use std::path::PathBuf;

/// Width assumed when it cannot be detected.
pub const DEFAULT_TERMINAL_WIDTH: usize = 80;

/// The user's home directory, if known.
pub fn get_home() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Parses a `COLUMNS` style value. Empty, negative or malformed values are rejected.
pub fn parse_columns(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}

/// Get terminal width, defaulting to 80 if detection fails
///
/// Checks the COLUMNS environment variable first, then asks the terminal when stdout is one.
pub fn terminal_width() -> usize {
    if let Ok(cols) = std::env::var("COLUMNS")
        && let Some(width) = parse_columns(&cols)
    {
        return width;
    }

    if std::io::stdout().is_terminal()
        && let Ok((cols, _)) = crossterm::terminal::size()
        && cols > 0
    {
        return usize::from(cols);
    }
    DEFAULT_TERMINAL_WIDTH
}
