//! Resolved listing options.
//!
//! [ListOptions] is what the [Lister](crate::app::Lister) runs on. It is built from the
//! command line and the config file by [resolve](crate::utils::cli::Args::resolve), or
//! directly in tests.

use crate::core::{
    CompareMode, FillOrder, Hidden, ReadOptions, SortKey, SortOptions, TimeField,
};
use crate::utils::DEFAULT_TERMINAL_WIDTH;

/// How a listing is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// One entry per line with metadata (`-l`).
    Long,
    /// One name per line (`-1`).
    OnePerLine,
    /// Columns filled top to bottom (`-C`).
    #[default]
    Columns,
    /// Columns filled left to right (`-x`).
    Across,
    /// Comma separated, wrapped at the width (`-m`).
    Commas,
}

impl Format {
    /// Fill order of the grid formats.
    pub fn fill_order(self) -> Option<FillOrder> {
        match self {
            Format::Columns => Some(FillOrder::Down),
            Format::Across => Some(FillOrder::Across),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub format: Format,
    pub sort: SortOptions,
    pub compare_mode: CompareMode,
    /// Timestamp shown by the long format.
    pub time: TimeField,
    pub hidden: Hidden,
    pub recursive: bool,
    /// List directory operands as entries instead of their contents.
    pub directory: bool,
    /// Describe symlinks by their targets everywhere.
    pub dereference: bool,
    pub classify: bool,
    pub inode: bool,
    pub blocks: bool,
    /// Line width for the grid and comma formats. 0 means no limit.
    pub width: usize,
    /// Tab stop distance used when padding. 0 pads with spaces only.
    pub tabsize: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        ListOptions {
            format: Format::Columns,
            sort: SortOptions::default(),
            compare_mode: CompareMode::Collate,
            time: TimeField::Modified,
            hidden: Hidden::Skip,
            recursive: false,
            directory: false,
            dereference: false,
            classify: false,
            inode: false,
            blocks: false,
            width: DEFAULT_TERMINAL_WIDTH,
            tabsize: 0,
        }
    }
}

impl ListOptions {
    #[inline]
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            hidden: self.hidden,
            dereference: self.dereference,
        }
    }

    /// Whether symlink operands are described by their targets.
    ///
    /// Operands are followed unless the output would show the link itself: the long format,
    /// `-F` indicators and `-d`. `-L` always follows.
    pub fn follow_operands(&self) -> bool {
        self.dereference || !(self.format == Format::Long || self.classify || self.directory)
    }

    /// Whether entries can be printed as soon as they are read.
    ///
    /// Only unsorted one-per-line output without recursion or a `total` line qualifies.
    pub fn streams(&self) -> bool {
        self.sort.key == SortKey::None
            && self.format == Format::OnePerLine
            && !self.recursive
            && !self.blocks
    }

    /// Whether a directory listing starts with a `total` line.
    #[inline]
    pub fn shows_total(&self) -> bool {
        self.format == Format::Long || self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operands_followed_unless_link_is_shown() {
        let mut opts = ListOptions::default();
        assert!(opts.follow_operands());

        opts.format = Format::Long;
        assert!(!opts.follow_operands());

        opts.dereference = true;
        assert!(opts.follow_operands());

        let classify = ListOptions {
            classify: true,
            ..ListOptions::default()
        };
        assert!(!classify.follow_operands());
    }

    #[test]
    fn streaming_needs_unsorted_lines() {
        let mut opts = ListOptions {
            format: Format::OnePerLine,
            ..ListOptions::default()
        };
        assert!(!opts.streams());

        opts.sort.key = SortKey::None;
        assert!(opts.streams());

        opts.recursive = true;
        assert!(!opts.streams());
    }

    #[test]
    fn fill_order_only_for_grids() {
        assert_eq!(Format::Columns.fill_order(), Some(FillOrder::Down));
        assert_eq!(Format::Across.fill_order(), Some(FillOrder::Across));
        assert_eq!(Format::Commas.fill_order(), None);
        assert_eq!(Format::Long.fill_order(), None);
    }
}
