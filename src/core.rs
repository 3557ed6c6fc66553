//! Core listing engine for runa-ls.
//!
//! This module contains the non-output "engine" pieces used by the lister:
//! - [fm]: the entry model ([FileEntry], [Listing]) and directory reading (see [browse_dir]).
//! - [sort]: the comparator engine that orders a [Listing] under every sort key.
//! - [version]: natural ordering of names with embedded version numbers.
//! - [layout]: the column layout engine that packs names into terminal columns.
//! - [render]: the glue that walks a computed [Layout] and drives a [GridSink].
//! - [formatter]: name escaping, indicators, permission strings and timestamps.
//! - [error]: the error types shared by the modules above.
//!
//! Most callers will import [browse_dir], [FileEntry], [Listing], [sort_listing] and
//! [LayoutEngine] from this module.

pub mod error;
pub mod fm;
pub mod formatter;
pub mod layout;
pub mod render;
pub mod sort;
pub mod version;

pub use error::{CollationError, ListError};
pub use fm::{
    FileEntry, Hidden, Listing, ReadOptions, Stat, Times, browse_dir, read_listing,
    stat_operand,
};
pub use formatter::{
    block_kib, escape_name, format_attributes, format_file_time, indicator, text_width,
};
pub use layout::{COLUMN_PADDING, FillOrder, Layout, LayoutEngine, MIN_COLUMN_WIDTH};
pub use render::{GridSink, render, render_lines, render_separated};
pub use sort::{CompareMode, Comparator, SortBy, SortKey, SortOptions, TimeField, sort_listing};
pub use version::filevercmp;
