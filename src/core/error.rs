//! Error types for the listing engine.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A name could not be compared under locale collation.
///
/// Raised by [Comparator](crate::core::Comparator) in collate mode when a name is not valid
/// UTF-8. [sort_listing](crate::core::sort_listing) recovers from it by switching to byte
/// comparison, so it never escapes a sort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot collate '{name}': invalid encoding for the current locale")]
pub struct CollationError {
    name: String,
}

impl CollationError {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// I/O failures while gathering entries, tagged with the path that failed.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("cannot access '{}': {source}", .path.display())]
    Access { path: PathBuf, source: io::Error },

    #[error("cannot open directory '{}': {source}", .path.display())]
    OpenDir { path: PathBuf, source: io::Error },

    #[error("reading directory '{}': {source}", .path.display())]
    ReadDir { path: PathBuf, source: io::Error },

    /// A directory reached twice during a recursive listing.
    #[error("{}: not listing already-listed directory", .path.display())]
    Loop { path: PathBuf },
}
