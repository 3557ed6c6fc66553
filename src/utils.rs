//! Miscellaneous utility functions for runa-ls.
//!
//! - [cli]: command-line parsing and resolution into [ListOptions](crate::app::ListOptions).
//! - [helpers]: home directory lookup and terminal width detection.

pub mod cli;
pub mod helpers;

pub use helpers::{DEFAULT_TERMINAL_WIDTH, get_home, parse_columns, terminal_width};
