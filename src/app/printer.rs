//! Entry printing for runa-ls.
//!
//! [EntryPrinter] is the [GridSink] behind every short format: it writes the optional inode
//! and block prefixes, the escaped name and the `-F` indicator, and pads between columns with
//! spaces or tabs. [write_long] prints the `-l` format.

use crate::app::options::ListOptions;
use crate::core::{
    FileEntry, GridSink, Listing, block_kib, format_file_time, indicator, text_width,
};

use std::io::{self, Write};
use std::time::SystemTime;

/// Widths of the right-aligned number columns in front of each name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Prefixes {
    inode: Option<usize>,
    blocks: Option<usize>,
}

impl Prefixes {
    fn measure(listing: &Listing, opts: &ListOptions) -> Self {
        let widest = |value: fn(&FileEntry) -> u64| {
            listing
                .entries()
                .iter()
                .map(|e| digits(value(e)))
                .max()
                .unwrap_or(1)
        };
        Prefixes {
            inode: opts.inode.then(|| widest(|e| e.stat().inode)),
            blocks: opts.blocks.then(|| widest(|e| block_kib(e.stat().blocks))),
        }
    }

    /// Columns taken by the prefixes, separators included.
    fn width(&self) -> usize {
        self.inode.map_or(0, |w| w + 1) + self.blocks.map_or(0, |w| w + 1)
    }

    fn write<W: Write>(&self, out: &mut W, entry: &FileEntry) -> io::Result<()> {
        if let Some(w) = self.inode {
            write!(out, "{:>w$} ", entry.stat().inode)?;
        }
        if let Some(w) = self.blocks {
            write!(out, "{:>w$} ", block_kib(entry.stat().blocks))?;
        }
        Ok(())
    }
}

fn digits(n: u64) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// Writes entries of one listing to `out`.
pub struct EntryPrinter<'a, W: Write> {
    out: &'a mut W,
    prefixes: Prefixes,
    classify: bool,
    tabsize: usize,
}

impl<'a, W: Write> EntryPrinter<'a, W> {
    /// A printer sized for `listing`. Prefix columns are as wide as the widest value in it.
    pub fn new(out: &'a mut W, opts: &ListOptions, listing: &Listing) -> Self {
        EntryPrinter {
            out,
            prefixes: Prefixes::measure(listing, opts),
            classify: opts.classify,
            tabsize: opts.tabsize,
        }
    }

    fn indicator(&self, entry: &FileEntry) -> Option<char> {
        if self.classify { indicator(entry) } else { None }
    }
}

impl<W: Write> GridSink for EntryPrinter<'_, W> {
    fn cell_width(&self, entry: &FileEntry) -> usize {
        self.prefixes.width()
            + entry.display_width()
            + usize::from(self.indicator(entry).is_some())
    }

    fn print_entry(&mut self, entry: &FileEntry, _start: usize) -> io::Result<()> {
        self.prefixes.write(self.out, entry)?;
        self.out.write_all(entry.display_name().as_bytes())?;
        if let Some(c) = self.indicator(entry) {
            write!(self.out, "{c}")?;
        }
        Ok(())
    }

    fn pad(&mut self, mut from: usize, to: usize) -> io::Result<()> {
        while from < to {
            if self.tabsize != 0 && to / self.tabsize > (from + 1) / self.tabsize {
                self.out.write_all(b"\t")?;
                from += self.tabsize - from % self.tabsize;
            } else {
                self.out.write_all(b" ")?;
                from += 1;
            }
        }
        Ok(())
    }

    fn separator(&mut self, sep: char, wrap: bool) -> io::Result<()> {
        write!(self.out, "{sep}{}", if wrap { '\n' } else { ' ' })
    }

    fn end_row(&mut self) -> io::Result<()> {
        self.out.write_all(b"\n")
    }
}

/// Prints `listing` in the long format, one entry per line.
///
/// Link count, owner, group and size are aligned to the widest value of the listing. Times
/// are formatted relative to `now`.
pub fn write_long<W: Write>(
    out: &mut W,
    listing: &Listing,
    opts: &ListOptions,
    now: SystemTime,
) -> io::Result<()> {
    let prefixes = Prefixes::measure(listing, opts);
    let widest = |value: &dyn Fn(&FileEntry) -> usize| {
        listing.entries().iter().map(value).max().unwrap_or(0)
    };
    let nlink_w = widest(&|e| digits(e.stat().nlink));
    let uid_w = widest(&|e| digits(u64::from(e.stat().uid)));
    let gid_w = widest(&|e| digits(u64::from(e.stat().gid)));
    let size_w = widest(&|e| digits(e.size()));
    let mode_w = widest(&|e| text_width(&e.stat().attributes));

    for entry in listing.ordered() {
        let stat = entry.stat();
        prefixes.write(out, entry)?;
        write!(
            out,
            "{:<mode_w$} {:>nlink_w$} {:<uid_w$} {:<gid_w$} {:>size_w$} {} {}",
            stat.attributes,
            stat.nlink,
            stat.uid,
            stat.gid,
            stat.size,
            format_file_time(entry.time(opts.time), now),
            entry.display_name(),
        )?;

        match entry.symlink() {
            Some(target) => write!(out, " -> {}", target.display())?,
            None if opts.classify => {
                if let Some(c) = indicator(entry) {
                    write!(out, "{c}")?;
                }
            }
            None => {}
        }
        out.write_all(b"\n")?;
    }
    Ok(())
}
