//! Entry model and directory reading for runa-ls.
//!
//! Provides the [FileEntry] struct which carries everything the sort and layout engines need,
//! the [Listing] collection with its permutable ordering view, and [browse_dir] which reads a
//! directory into entries one at a time.

use crate::core::error::ListError;
use crate::core::formatter::{escape_name, format_attributes, text_width};
use crate::core::sort::TimeField;

use once_cell::unsync::OnceCell;

use std::collections::VecDeque;
use std::ffi::{OsStr, OsString};
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Metadata fields shown by the long format and the inode/block prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stat {
    pub size: u64,
    /// Allocated size in 512-byte units.
    pub blocks: u64,
    pub dev: u64,
    pub inode: u64,
    pub nlink: u64,
    pub uid: u32,
    pub gid: u32,
    pub attributes: String,
}

/// Timestamps used by the time sort keys.
///
/// `None` means the platform or filesystem cannot provide that time. It orders below every
/// real timestamp, so unavailable times sort as the oldest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Times {
    pub modified: Option<SystemTime>,
    pub changed: Option<SystemTime>,
    pub accessed: Option<SystemTime>,
    pub birth: Option<SystemTime>,
}

impl Times {
    #[inline]
    pub fn get(&self, field: TimeField) -> Option<SystemTime> {
        match field {
            TimeField::Modified => self.modified,
            TimeField::Changed => self.changed,
            TimeField::Accessed => self.accessed,
            TimeField::Birth => self.birth,
        }
    }
}

/// Represents a single entry in a directory listing.
///
/// Holds the name, type flags, sort-relevant metadata and a lazily computed display width.
/// An entry is immutable once created, so the cached width is never invalidated.
#[derive(Debug, Clone)]
pub struct FileEntry {
    name: Box<OsStr>,
    flags: u8,
    stat: Stat,
    times: Times,
    symlink: Option<PathBuf>,
    width: OnceCell<usize>,
}

impl FileEntry {
    // Flag bit definitions
    pub const IS_DIR: u8 = 1 << 0;
    pub const IS_HIDDEN: u8 = 1 << 1;
    pub const IS_SYMLINK: u8 = 1 << 2;
    pub const IS_BROKEN_SYM: u8 = 1 << 3;
    pub const IS_EXECUTABLE: u8 = 1 << 4;
    /// Symlink whose target is a directory.
    pub const LINKS_TO_DIR: u8 = 1 << 5;
    pub const IS_FIFO: u8 = 1 << 6;
    pub const IS_SOCKET: u8 = 1 << 7;

    #[cfg(unix)]
    const EXEC_FLAG: u32 = 0o111;

    pub fn new(name: impl Into<OsString>, flags: u8) -> Self {
        let name: OsString = name.into();
        let mut flags = flags;
        if name.as_encoded_bytes().first() == Some(&b'.') {
            flags |= Self::IS_HIDDEN;
        }
        FileEntry {
            name: name.into_boxed_os_str(),
            flags,
            stat: Stat::default(),
            times: Times::default(),
            symlink: None,
            width: OnceCell::new(),
        }
    }

    pub fn with_stat(mut self, stat: Stat) -> Self {
        self.stat = stat;
        self
    }

    pub fn with_times(mut self, times: Times) -> Self {
        self.times = times;
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.stat.size = size;
        self
    }

    pub fn with_symlink(mut self, target: PathBuf) -> Self {
        self.symlink = Some(target);
        self
    }

    // Accessors

    #[inline]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    pub fn name_bytes(&self) -> &[u8] {
        self.name.as_encoded_bytes()
    }

    /// The name as it is printed, with unprintable characters escaped.
    pub fn display_name(&self) -> std::borrow::Cow<'_, str> {
        escape_name(&self.name)
    }

    /// Screen columns occupied by [FileEntry::display_name]. Computed once per entry.
    pub fn display_width(&self) -> usize {
        *self.width.get_or_init(|| text_width(&self.display_name()))
    }

    /// The substring starting at the last `.` of the name, or an empty slice.
    pub fn extension(&self) -> &[u8] {
        let bytes = self.name_bytes();
        match bytes.iter().rposition(|&b| b == b'.') {
            Some(pos) => &bytes[pos..],
            None => &[],
        }
    }

    #[inline(always)]
    pub fn flags(&self) -> u8 {
        self.flags
    }

    #[inline]
    pub fn stat(&self) -> &Stat {
        &self.stat
    }

    #[inline]
    pub fn times(&self) -> &Times {
        &self.times
    }

    #[inline]
    pub fn time(&self, field: TimeField) -> Option<SystemTime> {
        self.times.get(field)
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.stat.size
    }

    #[inline]
    pub fn symlink(&self) -> Option<&PathBuf> {
        self.symlink.as_ref()
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.flags & Self::IS_DIR != 0
    }

    /// Real directories and symlinks pointing at directories.
    #[inline]
    pub fn is_dir_like(&self) -> bool {
        self.flags & (Self::IS_DIR | Self::LINKS_TO_DIR) != 0
    }

    #[inline]
    pub fn is_symlink(&self) -> bool {
        self.flags & Self::IS_SYMLINK != 0
    }

    #[inline]
    pub fn is_executable(&self) -> bool {
        self.flags & Self::IS_EXECUTABLE != 0
    }

    #[inline]
    pub fn is_fifo(&self) -> bool {
        self.flags & Self::IS_FIFO != 0
    }

    #[inline]
    pub fn is_socket(&self) -> bool {
        self.flags & Self::IS_SOCKET != 0
    }

    /// `.` or `..`
    pub fn is_dot_or_dotdot(&self) -> bool {
        matches!(self.name_bytes(), b"." | b"..")
    }

    /// Builds an entry from already fetched metadata.
    ///
    /// `path` is used to resolve symlink targets. With `dereference`, a symlink with a
    /// reachable target is described by the target's metadata instead.
    pub fn from_metadata(name: OsString, path: &Path, md: &Metadata, dereference: bool) -> Self {
        let mut flags = 0u8;
        let mut described = None;

        if md.file_type().is_symlink() {
            match fs::metadata(path) {
                Ok(target) if dereference => described = Some(target),
                Ok(target) => {
                    flags |= Self::IS_SYMLINK;
                    if target.is_dir() {
                        flags |= Self::LINKS_TO_DIR;
                    }
                }
                Err(_) => flags |= Self::IS_SYMLINK | Self::IS_BROKEN_SYM,
            }
        }

        let md = described.as_ref().unwrap_or(md);
        if md.is_dir() {
            flags |= Self::IS_DIR;
        }
        flags |= type_flags(md);

        let symlink = if flags & Self::IS_SYMLINK != 0 {
            fs::read_link(path).ok()
        } else {
            None
        };

        let mut entry = FileEntry::new(name, flags)
            .with_stat(stat_from(md))
            .with_times(times_from(md));
        entry.symlink = symlink;
        entry
    }
}

#[cfg(unix)]
fn type_flags(md: &Metadata) -> u8 {
    use std::os::unix::fs::{FileTypeExt, PermissionsExt};

    let ft = md.file_type();
    let mut flags = 0;
    if ft.is_fifo() {
        flags |= FileEntry::IS_FIFO;
    }
    if ft.is_socket() {
        flags |= FileEntry::IS_SOCKET;
    }
    if ft.is_file() && md.permissions().mode() & FileEntry::EXEC_FLAG != 0 {
        flags |= FileEntry::IS_EXECUTABLE;
    }
    flags
}

#[cfg(not(unix))]
fn type_flags(_md: &Metadata) -> u8 {
    0
}

#[cfg(unix)]
fn stat_from(md: &Metadata) -> Stat {
    use std::os::unix::fs::MetadataExt;

    Stat {
        size: md.len(),
        blocks: md.blocks(),
        dev: md.dev(),
        inode: md.ino(),
        nlink: md.nlink(),
        uid: md.uid(),
        gid: md.gid(),
        attributes: format_attributes(md),
    }
}

#[cfg(not(unix))]
fn stat_from(md: &Metadata) -> Stat {
    Stat {
        size: md.len(),
        blocks: md.len().div_ceil(512),
        nlink: 1,
        attributes: format_attributes(md),
        ..Stat::default()
    }
}

#[cfg(unix)]
fn times_from(md: &Metadata) -> Times {
    use std::os::unix::fs::MetadataExt;

    Times {
        modified: md.modified().ok(),
        changed: unix_time(md.ctime(), md.ctime_nsec()),
        accessed: md.accessed().ok(),
        birth: md.created().ok(),
    }
}

#[cfg(not(unix))]
fn times_from(md: &Metadata) -> Times {
    Times {
        modified: md.modified().ok(),
        changed: None,
        accessed: md.accessed().ok(),
        birth: md.created().ok(),
    }
}

#[cfg(unix)]
fn unix_time(secs: i64, nsec: i64) -> Option<SystemTime> {
    use std::time::{Duration, UNIX_EPOCH};

    let nanos = Duration::from_nanos(u64::try_from(nsec).ok()?);
    if secs >= 0 {
        UNIX_EPOCH.checked_add(Duration::from_secs(secs as u64))?.checked_add(nanos)
    } else {
        UNIX_EPOCH
            .checked_sub(Duration::from_secs(secs.unsigned_abs()))?
            .checked_add(nanos)
    }
}

/// The entries of one listing plus an ordering view over them.
///
/// Entries keep their insertion (directory-read) order. Sorting permutes only the view, which
/// always holds each entry index exactly once.
#[derive(Debug, Default)]
pub struct Listing {
    entries: Vec<FileEntry>,
    order: Vec<usize>,
}

impl Listing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Listing {
            entries: Vec::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, entry: FileEntry) {
        self.order.push(self.entries.len());
        self.entries.push(entry);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry. Keeps the allocations for the next directory.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Entries in insertion order.
    #[inline]
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// The ordering view: indices into [Listing::entries].
    #[inline]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// The entry at position `pos` of the ordering view.
    #[inline]
    pub fn get(&self, pos: usize) -> &FileEntry {
        &self.entries[self.order[pos]]
    }

    /// Entries in view order.
    pub fn ordered(&self) -> impl Iterator<Item = &FileEntry> {
        self.order.iter().map(|&i| &self.entries[i])
    }

    /// Puts the view back to insertion order.
    pub fn reset_order(&mut self) {
        self.order.clear();
        self.order.extend(0..self.entries.len());
    }

    /// Consumes the listing, yielding entries in view order.
    pub fn into_ordered(self) -> Vec<FileEntry> {
        let mut slots: Vec<Option<FileEntry>> = self.entries.into_iter().map(Some).collect();
        self.order
            .iter()
            .filter_map(|&i| slots[i].take())
            .collect()
    }

    pub(crate) fn parts_mut(&mut self) -> (&[FileEntry], &mut Vec<usize>) {
        (&self.entries, &mut self.order)
    }
}

/// Which dot-files a directory read yields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Hidden {
    /// Skip every name starting with `.`
    #[default]
    Skip,
    /// Hidden files, but not `.` and `..`
    AlmostAll,
    /// Everything, including `.` and `..`
    All,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    pub hidden: Hidden,
    pub dereference: bool,
}

/// Streaming reader over one directory. Yields entries in directory-read order.
///
/// Entries whose metadata cannot be read are reported as [ListError::Access] and the read
/// continues with the next name.
pub struct DirEntries {
    dir: PathBuf,
    inner: fs::ReadDir,
    dots: VecDeque<&'static str>,
    opts: ReadOptions,
}

impl Iterator for DirEntries {
    type Item = Result<FileEntry, ListError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(dot) = self.dots.pop_front() {
            let path = self.dir.join(dot);
            return Some(read_entry(OsString::from(dot), &path, self.opts.dereference));
        }

        loop {
            let entry = match self.inner.next()? {
                Ok(e) => e,
                Err(source) => {
                    return Some(Err(ListError::ReadDir {
                        path: self.dir.clone(),
                        source,
                    }));
                }
            };

            let name = entry.file_name();
            if self.opts.hidden == Hidden::Skip && name.as_encoded_bytes().first() == Some(&b'.')
            {
                continue;
            }

            return Some(read_entry(name, &entry.path(), self.opts.dereference));
        }
    }
}

fn read_entry(name: OsString, path: &Path, dereference: bool) -> Result<FileEntry, ListError> {
    match fs::symlink_metadata(path) {
        Ok(md) => Ok(FileEntry::from_metadata(name, path, &md, dereference)),
        Err(source) => Err(ListError::Access {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Opens the provided directory for reading.
/// # Returns
/// A [DirEntries] iterator or a [ListError::OpenDir] when the directory cannot be opened.
pub fn browse_dir(path: &Path, opts: ReadOptions) -> Result<DirEntries, ListError> {
    let inner = fs::read_dir(path).map_err(|source| ListError::OpenDir {
        path: path.to_path_buf(),
        source,
    })?;

    let dots = if opts.hidden == Hidden::All {
        VecDeque::from([".", ".."])
    } else {
        VecDeque::new()
    };

    Ok(DirEntries {
        dir: path.to_path_buf(),
        inner,
        dots,
        opts,
    })
}

/// Reads the whole directory at `path` into `listing`, in directory-read order.
///
/// Entries that cannot be described are handed to `on_error` and skipped. Only failing to open
/// the directory aborts the read.
pub fn read_listing<F>(
    path: &Path,
    opts: ReadOptions,
    listing: &mut Listing,
    mut on_error: F,
) -> Result<(), ListError>
where
    F: FnMut(ListError),
{
    for entry in browse_dir(path, opts)? {
        match entry {
            Ok(entry) => listing.push(entry),
            Err(err) => on_error(err),
        }
    }
    Ok(())
}

/// Describes a command-line operand, named exactly as it was given.
///
/// With `follow`, a symlink operand is described by its target when the target exists.
pub fn stat_operand(path: &Path, follow: bool) -> Result<FileEntry, ListError> {
    let md = fs::symlink_metadata(path).map_err(|source| ListError::Access {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FileEntry::from_metadata(
        path.as_os_str().to_os_string(),
        path,
        &md,
        follow,
    ))
}
