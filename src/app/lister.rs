//! The lister: walks operands and directories and prints every listing.
//!
//! One [Listing] and one [LayoutEngine] are reused for every directory. Directories still to be
//! listed wait on an explicit stack, so a recursive listing is depth-first in sorted order
//! without recursion on the call stack.

use crate::app::options::{Format, ListOptions};
use crate::app::printer::{EntryPrinter, write_long};
use crate::core::{
    GridSink, LayoutEngine, ListError, Listing, block_kib, browse_dir, escape_name,
    read_listing, render, render_lines, render_separated, sort_listing, stat_operand,
};

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Outcome of a run, ordered by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExitStatus {
    #[default]
    Success,
    /// A subdirectory or an entry could not be read.
    Minor,
    /// A command-line operand could not be accessed.
    Serious,
}

impl ExitStatus {
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Minor => 1,
            ExitStatus::Serious => 2,
        }
    }
}

#[derive(Debug)]
struct PendingDir {
    path: PathBuf,
    /// (device, inode), used to detect a directory that contains itself.
    id: (u64, u64),
    command_line: bool,
}

/// Work on the directory stack.
#[derive(Debug)]
enum Pending {
    Dir(PendingDir),
    /// Every subdirectory of this directory has been listed.
    Leave((u64, u64)),
}

pub struct Lister<W: Write> {
    opts: ListOptions,
    out: W,
    listing: Listing,
    layout: LayoutEngine,
    pending: Vec<Pending>,
    /// Directories of the recursive listing currently being descended.
    active: HashSet<(u64, u64)>,
    status: ExitStatus,
    print_dir_names: bool,
    printed_any: bool,
    now: SystemTime,
}

impl<W: Write> Lister<W> {
    pub fn new(opts: ListOptions, out: W) -> Self {
        Lister {
            opts,
            out,
            listing: Listing::new(),
            layout: LayoutEngine::new(),
            pending: Vec::new(),
            active: HashSet::new(),
            status: ExitStatus::Success,
            print_dir_names: false,
            printed_any: false,
            now: SystemTime::now(),
        }
    }

    // Accessors

    #[inline]
    pub fn status(&self) -> ExitStatus {
        self.status
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Lists every operand, or `.` when there are none.
    ///
    /// Non-directory operands are printed first as a single listing, then each directory in
    /// sorted order. Problems with individual paths are reported on stderr and reflected in
    /// the returned status. Only a failing output stream is an error.
    pub fn run(&mut self, operands: &[PathBuf]) -> io::Result<ExitStatus> {
        let default_operand = [PathBuf::from(".")];
        let operands = if operands.is_empty() {
            &default_operand[..]
        } else {
            operands
        };

        self.print_dir_names = operands.len() > 1 || self.opts.recursive;
        let follow = self.opts.follow_operands();

        let mut dirs = Listing::with_capacity(operands.len());
        self.listing.clear();
        for path in operands {
            match stat_operand(path, follow) {
                Ok(entry) if entry.is_dir() && !self.opts.directory => dirs.push(entry),
                Ok(entry) => self.listing.push(entry),
                Err(err) => report(&mut self.status, err, ExitStatus::Serious),
            }
        }

        if !self.listing.is_empty() {
            sort_listing(&mut self.listing, self.opts.sort, self.opts.compare_mode);
            self.print_listing()?;
            self.printed_any = true;
            self.listing.clear();
        }

        sort_listing(&mut dirs, self.opts.sort, self.opts.compare_mode);
        for entry in dirs.into_ordered().into_iter().rev() {
            self.pending.push(Pending::Dir(PendingDir {
                path: PathBuf::from(entry.name()),
                id: (entry.stat().dev, entry.stat().inode),
                command_line: true,
            }));
        }

        while let Some(work) = self.pending.pop() {
            match work {
                Pending::Dir(dir) => self.list_dir(&dir)?,
                Pending::Leave(id) => {
                    self.active.remove(&id);
                }
            }
        }
        self.out.flush()?;
        Ok(self.status)
    }

    fn list_dir(&mut self, dir: &PendingDir) -> io::Result<()> {
        let tracked = self.opts.recursive && dir.id.1 != 0;
        if tracked && self.active.contains(&dir.id) {
            let err = ListError::Loop {
                path: dir.path.clone(),
            };
            report(&mut self.status, err, ExitStatus::Minor);
            return Ok(());
        }

        let severity = if dir.command_line {
            ExitStatus::Serious
        } else {
            ExitStatus::Minor
        };

        if self.opts.streams() {
            let entries = match browse_dir(&dir.path, self.opts.read_options()) {
                Ok(entries) => entries,
                Err(err) => {
                    report(&mut self.status, err, severity);
                    return Ok(());
                }
            };
            self.write_header(&dir.path)?;
            for entry in entries {
                match entry {
                    Ok(entry) => {
                        self.listing.push(entry);
                        self.print_listing()?;
                        self.listing.clear();
                    }
                    Err(err) => report(&mut self.status, err, ExitStatus::Minor),
                }
            }
            return Ok(());
        }

        self.listing.clear();
        let status = &mut self.status;
        let read = read_listing(&dir.path, self.opts.read_options(), &mut self.listing, |err| {
            report(status, err, ExitStatus::Minor)
        });
        if let Err(err) = read {
            report(&mut self.status, err, severity);
            return Ok(());
        }

        log::debug!("listing {} ({} entries)", dir.path.display(), self.listing.len());
        sort_listing(&mut self.listing, self.opts.sort, self.opts.compare_mode);

        self.write_header(&dir.path)?;
        if self.opts.shows_total() {
            let blocks: u64 = self.listing.entries().iter().map(|e| e.stat().blocks).sum();
            writeln!(self.out, "total {}", block_kib(blocks))?;
        }
        self.print_listing()?;

        if self.opts.recursive {
            // The marker is popped only after the whole subtree below it.
            if tracked {
                self.active.insert(dir.id);
                self.pending.push(Pending::Leave(dir.id));
            }
            for pos in (0..self.listing.len()).rev() {
                let entry = self.listing.get(pos);
                if entry.is_dir() && !entry.is_dot_or_dotdot() {
                    self.pending.push(Pending::Dir(PendingDir {
                        path: dir.path.join(entry.name()),
                        id: (entry.stat().dev, entry.stat().inode),
                        command_line: false,
                    }));
                }
            }
        }
        self.listing.clear();
        Ok(())
    }

    fn write_header(&mut self, path: &Path) -> io::Result<()> {
        if self.printed_any {
            self.out.write_all(b"\n")?;
        }
        if self.print_dir_names {
            writeln!(self.out, "{}:", escape_name(path.as_os_str()))?;
        }
        self.printed_any = true;
        Ok(())
    }

    fn print_listing(&mut self) -> io::Result<()> {
        let opts = &self.opts;
        let listing = &self.listing;
        match opts.format {
            Format::Long => write_long(&mut self.out, listing, opts, self.now),
            Format::OnePerLine => {
                render_lines(listing, &mut EntryPrinter::new(&mut self.out, opts, listing))
            }
            Format::Commas => render_separated(
                listing,
                opts.width,
                ',',
                &mut EntryPrinter::new(&mut self.out, opts, listing),
            ),
            Format::Columns | Format::Across => {
                let mut printer = EntryPrinter::new(&mut self.out, opts, listing);
                let cells: Vec<usize> = listing.ordered().map(|e| printer.cell_width(e)).collect();
                let fill = opts.format.fill_order().unwrap_or_default();
                let layout = self.layout.compute(&cells, opts.width, fill);
                render(listing, &layout, &mut printer)
            }
        }
    }
}

/// Prints `err` and raises `status` to at least `severity`.
fn report(status: &mut ExitStatus, err: ListError, severity: ExitStatus) {
    eprintln!("rls: {err}");
    *status = (*status).max(severity);
}
