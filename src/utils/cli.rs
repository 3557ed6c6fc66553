//! Command-line argument parsing for runa-ls.
//!
//! [Args] is the clap parser. [Args::resolve] merges it with the `[general]` config table into
//! the [ListOptions] the lister runs on. Flags always take precedence over the config file.

use crate::app::{Format, ListOptions};
use crate::config::InternalGeneral;
use crate::config::general::clamp_width;
use crate::core::{Hidden, SortBy, SortOptions, TimeField};

use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    name = "rls",
    version,
    about = "List directory contents",
    after_help = "ENVIRONMENT:\n  RLS_CONFIG    Override the default config path\n  RLS_LOG       Log filter (error, warn, info, debug, trace)\n  COLUMNS       Terminal width"
)]
pub struct Args {
    /// Do not ignore entries starting with `.`
    #[arg(short = 'a', long = "all", overrides_with = "almost_all")]
    pub all: bool,

    /// Like -a, but do not list `.` and `..`
    #[arg(short = 'A', long = "almost-all", overrides_with = "all")]
    pub almost_all: bool,

    /// Use a long listing format
    #[arg(short = 'l', overrides_with_all = ["one_per_line", "columns", "across", "commas"])]
    pub long: bool,

    /// List one file per line
    #[arg(short = '1', overrides_with_all = ["long", "columns", "across", "commas"])]
    pub one_per_line: bool,

    /// List entries by columns
    #[arg(short = 'C', overrides_with_all = ["long", "one_per_line", "across", "commas"])]
    pub columns: bool,

    /// List entries by lines instead of by columns
    #[arg(short = 'x', overrides_with_all = ["long", "one_per_line", "columns", "commas"])]
    pub across: bool,

    /// Fill width with a comma separated list of entries
    #[arg(short = 'm', overrides_with_all = ["long", "one_per_line", "columns", "across"])]
    pub commas: bool,

    /// List subdirectories recursively
    #[arg(short = 'R', long)]
    pub recursive: bool,

    /// Reverse order while sorting
    #[arg(short = 'r', long)]
    pub reverse: bool,

    /// Sort by time, newest first
    #[arg(
        short = 't',
        overrides_with_all = ["by_size", "by_extension", "by_version", "unsorted", "sort"]
    )]
    pub by_time: bool,

    /// Sort by file size, largest first
    #[arg(
        short = 'S',
        overrides_with_all = ["by_time", "by_extension", "by_version", "unsorted", "sort"]
    )]
    pub by_size: bool,

    /// Sort alphabetically by entry extension
    #[arg(
        short = 'X',
        overrides_with_all = ["by_time", "by_size", "by_version", "unsorted", "sort"]
    )]
    pub by_extension: bool,

    /// Natural sort of (version) numbers within names
    #[arg(
        short = 'v',
        overrides_with_all = ["by_time", "by_size", "by_extension", "unsorted", "sort"]
    )]
    pub by_version: bool,

    /// Do not sort; list entries in directory order
    #[arg(
        short = 'U',
        overrides_with_all = ["by_time", "by_size", "by_extension", "by_version", "sort"]
    )]
    pub unsorted: bool,

    /// Use the status change time (with -t: sort by it)
    #[arg(short = 'c', overrides_with = "atime")]
    pub ctime: bool,

    /// Use the access time (with -t: sort by it)
    #[arg(short = 'u', overrides_with = "ctime")]
    pub atime: bool,

    /// Select which timestamp to show and sort by
    #[arg(long, value_enum, value_name = "WORD")]
    pub time: Option<TimeField>,

    /// Sort by WORD instead of name
    #[arg(
        long,
        value_enum,
        value_name = "WORD",
        overrides_with_all = ["by_time", "by_size", "by_extension", "by_version", "unsorted"]
    )]
    pub sort: Option<SortBy>,

    /// Group directories before files
    #[arg(long = "group-directories-first")]
    pub dirs_first: bool,

    /// Append an indicator (one of */=@|) to entries
    #[arg(short = 'F', long)]
    pub classify: bool,

    /// Print the index number of each file
    #[arg(short = 'i', long)]
    pub inode: bool,

    /// Print the allocated size of each file, in blocks
    #[arg(short = 's', long)]
    pub size: bool,

    /// Set output width to COLS. 0 means no limit
    #[arg(short = 'w', long, value_name = "COLS")]
    pub width: Option<usize>,

    /// Assume tab stops at each COLS instead of spaces only
    #[arg(short = 'T', long, value_name = "COLS")]
    pub tabsize: Option<usize>,

    /// List directories themselves, not their contents
    #[arg(short = 'd', long)]
    pub directory: bool,

    /// Show information for the file symlinks point to
    #[arg(short = 'L', long)]
    pub dereference: bool,

    /// Generate a default configuration file and exit
    #[arg(long)]
    pub init: bool,

    #[arg(value_name = "FILE")]
    pub paths: Vec<PathBuf>,
}

impl Args {
    /// Merges the flags with the config defaults.
    ///
    /// `tty` tells whether stdout is a terminal and `detected_width` is the width to use when
    /// neither `-w` nor the config sets one.
    pub fn resolve(
        &self,
        general: &InternalGeneral,
        tty: bool,
        detected_width: usize,
    ) -> ListOptions {
        let format = if self.long {
            Format::Long
        } else if self.one_per_line {
            Format::OnePerLine
        } else if self.columns {
            Format::Columns
        } else if self.across {
            Format::Across
        } else if self.commas {
            Format::Commas
        } else if tty {
            Format::Columns
        } else {
            Format::OnePerLine
        };

        let explicit_time = if self.time.is_some() {
            self.time
        } else if self.ctime {
            Some(TimeField::Changed)
        } else if self.atime {
            Some(TimeField::Accessed)
        } else {
            None
        };
        let time = explicit_time.unwrap_or(general.time());

        let sort_by = if self.unsorted {
            SortBy::None
        } else if let Some(sort) = self.sort {
            sort
        } else if self.by_time {
            SortBy::Time
        } else if self.by_size {
            SortBy::Size
        } else if self.by_extension {
            SortBy::Extension
        } else if self.by_version {
            SortBy::Version
        } else if explicit_time.is_some() && format != Format::Long {
            // -c/-u without -l sort by the chosen time.
            SortBy::Time
        } else {
            general.sort()
        };

        let hidden = if self.all {
            Hidden::All
        } else if self.almost_all || general.show_hidden() {
            Hidden::AlmostAll
        } else {
            Hidden::Skip
        };

        let width = self
            .width
            .map(clamp_width)
            .or(general.width())
            .unwrap_or(detected_width);

        ListOptions {
            format,
            sort: SortOptions {
                key: sort_by.key(time),
                reverse: self.reverse || general.reverse(),
                dirs_first: self.dirs_first || general.dirs_first(),
            },
            compare_mode: general.compare_mode(),
            time,
            hidden,
            recursive: self.recursive,
            directory: self.directory,
            dereference: self.dereference,
            classify: self.classify || general.classify(),
            inode: self.inode,
            blocks: self.size,
            width,
            tabsize: self.tabsize.unwrap_or(general.tabsize()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::SortKey;

    fn resolve(args: &[&str]) -> Result<ListOptions, clap::Error> {
        let args = Args::try_parse_from(std::iter::once("rls").chain(args.iter().copied()))?;
        Ok(args.resolve(Config::default().general(), true, 80))
    }

    #[test]
    fn defaults_depend_on_tty() -> Result<(), Box<dyn std::error::Error>> {
        let args = Args::try_parse_from(["rls"])?;
        let config = Config::default();
        assert_eq!(args.resolve(config.general(), true, 80).format, Format::Columns);
        assert_eq!(args.resolve(config.general(), false, 80).format, Format::OnePerLine);
        Ok(())
    }

    #[test]
    fn last_format_flag_wins() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(resolve(&["-l", "-1"])?.format, Format::OnePerLine);
        assert_eq!(resolve(&["-1", "-l"])?.format, Format::Long);
        assert_eq!(resolve(&["-lx"])?.format, Format::Across);
        Ok(())
    }

    #[test]
    fn time_flags_pick_sort_key() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(resolve(&["-t"])?.sort.key, SortKey::Time(TimeField::Modified));
        assert_eq!(resolve(&["-c"])?.sort.key, SortKey::Time(TimeField::Changed));
        assert_eq!(resolve(&["-lu"])?.sort.key, SortKey::Name);
        assert_eq!(resolve(&["-lu"])?.time, TimeField::Accessed);
        assert_eq!(
            resolve(&["-t", "--time", "birth"])?.sort.key,
            SortKey::Time(TimeField::Birth)
        );
        Ok(())
    }

    #[test]
    fn sort_flags() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(resolve(&["-S"])?.sort.key, SortKey::Size);
        assert_eq!(resolve(&["-X"])?.sort.key, SortKey::Extension);
        assert_eq!(resolve(&["-v"])?.sort.key, SortKey::Version);
        assert_eq!(resolve(&["-U"])?.sort.key, SortKey::None);
        assert_eq!(resolve(&["--sort", "width"])?.sort.key, SortKey::Width);
        assert_eq!(resolve(&["-S", "-t"])?.sort.key, SortKey::Time(TimeField::Modified));

        let opts = resolve(&["-r", "--group-directories-first"])?;
        assert!(opts.sort.reverse);
        assert!(opts.sort.dirs_first);
        Ok(())
    }

    #[test]
    fn sort_word_and_sort_flags_last_one_wins() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(
            resolve(&["--sort", "size", "-t"])?.sort.key,
            SortKey::Time(TimeField::Modified)
        );
        assert_eq!(resolve(&["-t", "--sort", "size"])?.sort.key, SortKey::Size);
        assert_eq!(resolve(&["-U", "--sort", "name"])?.sort.key, SortKey::Name);
        assert_eq!(resolve(&["--sort", "name", "-U"])?.sort.key, SortKey::None);
        Ok(())
    }

    #[test]
    fn hidden_and_width() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(resolve(&[])?.hidden, Hidden::Skip);
        assert_eq!(resolve(&["-a"])?.hidden, Hidden::All);
        assert_eq!(resolve(&["-a", "-A"])?.hidden, Hidden::AlmostAll);
        assert_eq!(resolve(&[])?.width, 80);
        assert_eq!(resolve(&["-w", "0"])?.width, 0);
        assert_eq!(resolve(&["-w", "132"])?.width, 132);
        assert_eq!(resolve(&["-T", "8"])?.tabsize, 8);
        Ok(())
    }

    #[test]
    fn operands_collected() -> Result<(), Box<dyn std::error::Error>> {
        let args = Args::try_parse_from(["rls", "-R", "src", "tests"])?;
        assert!(args.recursive);
        assert_eq!(args.paths, [PathBuf::from("src"), PathBuf::from("tests")]);
        assert!(Args::try_parse_from(["rls", "--sort", "bogus"]).is_err());
        Ok(())
    }
}
