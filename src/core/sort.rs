//! The comparator engine for runa-ls.
//!
//! A [Comparator] is composed from orthogonal settings: a [SortKey], the reverse and
//! directories-first modifiers, and a [CompareMode]. Every key breaks ties on the name, so as
//! long as names are unique the comparator is a total order.
//!
//! Name comparison under [CompareMode::Collate] can fail on names that are not valid UTF-8.
//! [sort_listing] handles that by restoring the ordering view and sorting again with
//! [CompareMode::Bytes].

use crate::core::error::CollationError;
use crate::core::fm::{FileEntry, Listing};
use crate::core::version::filevercmp;

use clap::ValueEnum;
use serde::Deserialize;

use std::cmp::Ordering;

// Runs at or below this length are insertion sorted.
const INSERTION_THRESHOLD: usize = 12;

/// Which timestamp a time sort (and the long format) uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeField {
    #[default]
    #[serde(alias = "mtime", alias = "modification")]
    #[value(alias = "mtime", alias = "modification")]
    Modified,
    #[serde(alias = "ctime", alias = "status")]
    #[value(alias = "ctime", alias = "status")]
    Changed,
    #[serde(alias = "atime", alias = "access", alias = "use")]
    #[value(alias = "atime", alias = "access", alias = "use")]
    Accessed,
    #[serde(alias = "creation")]
    #[value(alias = "creation")]
    Birth,
}

/// The primary ordering of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Directory-read order, no comparisons at all.
    None,
    #[default]
    Name,
    Extension,
    Width,
    Size,
    Version,
    Time(TimeField),
}

/// Sort key names as they appear in `--sort=WORD` and the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    None,
    #[default]
    Name,
    Extension,
    Width,
    Size,
    Version,
    Time,
}

impl SortBy {
    /// The sort key, with `time` selecting the timestamp for [SortBy::Time].
    pub fn key(self, time: TimeField) -> SortKey {
        match self {
            SortBy::None => SortKey::None,
            SortBy::Name => SortKey::Name,
            SortBy::Extension => SortKey::Extension,
            SortBy::Width => SortKey::Width,
            SortBy::Size => SortKey::Size,
            SortBy::Version => SortKey::Version,
            SortBy::Time => SortKey::Time(time),
        }
    }
}

/// How names are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompareMode {
    /// Case-folded Unicode ordering. Fails on names that are not valid UTF-8.
    #[default]
    Collate,
    /// Raw byte ordering. Never fails.
    Bytes,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOptions {
    pub key: SortKey,
    pub reverse: bool,
    pub dirs_first: bool,
}

/// A comparison function over entries, built from [SortOptions] and a [CompareMode].
#[derive(Debug, Clone, Copy)]
pub struct Comparator {
    opts: SortOptions,
    mode: CompareMode,
}

impl Comparator {
    pub fn new(opts: SortOptions, mode: CompareMode) -> Self {
        Self { opts, mode }
    }

    /// Compares two entries.
    ///
    /// Directories-first is applied outside of reverse, so directory-like entries lead in both
    /// directions. Reverse swaps the arguments of the key comparison, which reverses the name
    /// tie-break along with the primary key.
    pub fn compare(&self, a: &FileEntry, b: &FileEntry) -> Result<Ordering, CollationError> {
        if self.opts.dirs_first {
            match (a.is_dir_like(), b.is_dir_like()) {
                (true, false) => return Ok(Ordering::Less),
                (false, true) => return Ok(Ordering::Greater),
                _ => {}
            }
        }
        if self.opts.reverse {
            self.compare_key(b, a)
        } else {
            self.compare_key(a, b)
        }
    }

    fn compare_key(&self, a: &FileEntry, b: &FileEntry) -> Result<Ordering, CollationError> {
        let primary = match self.opts.key {
            SortKey::None | SortKey::Name => Ordering::Equal,
            SortKey::Extension => self.compare_text(a.extension(), b.extension())?,
            SortKey::Width => a.display_width().cmp(&b.display_width()),
            SortKey::Size => b.size().cmp(&a.size()),
            // Version order never collates.
            SortKey::Version => {
                return Ok(filevercmp(a.name_bytes(), b.name_bytes())
                    .then_with(|| a.name_bytes().cmp(b.name_bytes())));
            }
            SortKey::Time(field) => b.time(field).cmp(&a.time(field)),
        };
        if primary != Ordering::Equal {
            return Ok(primary);
        }
        self.compare_text(a.name_bytes(), b.name_bytes())
    }

    fn compare_text(&self, a: &[u8], b: &[u8]) -> Result<Ordering, CollationError> {
        match self.mode {
            CompareMode::Collate => collate(a, b),
            CompareMode::Bytes => Ok(a.cmp(b)),
        }
    }
}

/// Locale-style comparison: case-folded first, then exact text to keep the order total.
pub fn collate(a: &[u8], b: &[u8]) -> Result<Ordering, CollationError> {
    let sa = std::str::from_utf8(a).map_err(|_| CollationError::new(a))?;
    let sb = std::str::from_utf8(b).map_err(|_| CollationError::new(b))?;

    let folded = sa
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(sb.chars().flat_map(char::to_lowercase));
    Ok(folded.then_with(|| sa.cmp(sb)))
}

/// Orders the view of `listing` in place.
///
/// Starts in `mode` and returns the mode that produced the final order. A collation failure
/// aborts the sort, puts the view back to insertion order and sorts again with
/// [CompareMode::Bytes]. With [SortKey::None] the view is left untouched.
pub fn sort_listing(listing: &mut Listing, opts: SortOptions, mode: CompareMode) -> CompareMode {
    if opts.key == SortKey::None || listing.len() < 2 {
        return mode;
    }

    let mut mode = mode;
    loop {
        let comparator = Comparator::new(opts, mode);
        let (entries, order) = listing.parts_mut();
        let result = try_sort_by(order.as_mut_slice(), &mut |&a: &usize, &b: &usize| {
            comparator.compare(&entries[a], &entries[b])
        });

        match result {
            Ok(()) => return mode,
            Err(err) if mode == CompareMode::Collate => {
                log::debug!("{err}; sorting again with byte comparison");
                listing.reset_order();
                mode = CompareMode::Bytes;
            }
            Err(err) => {
                log::warn!("sort aborted: {err}");
                listing.reset_order();
                return mode;
            }
        }
    }
}

/// Stable merge sort with a fallible comparator. The first error aborts the sort.
///
/// On error the slice holds some permutation of its original elements.
pub fn try_sort_by<T, E, F>(v: &mut [T], cmp: &mut F) -> Result<(), E>
where
    T: Copy,
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    if v.len() <= INSERTION_THRESHOLD {
        return insertion_sort(v, cmp);
    }
    let mut scratch = v.to_vec();
    merge_sort(v, &mut scratch, cmp)
}

fn insertion_sort<T, E, F>(v: &mut [T], cmp: &mut F) -> Result<(), E>
where
    T: Copy,
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    for i in 1..v.len() {
        let mut j = i;
        while j > 0 && cmp(&v[j], &v[j - 1])? == Ordering::Less {
            v.swap(j, j - 1);
            j -= 1;
        }
    }
    Ok(())
}

fn merge_sort<T, E, F>(v: &mut [T], scratch: &mut [T], cmp: &mut F) -> Result<(), E>
where
    T: Copy,
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    let len = v.len();
    if len <= INSERTION_THRESHOLD {
        return insertion_sort(v, cmp);
    }

    let mid = len / 2;
    {
        let (lo, hi) = v.split_at_mut(mid);
        let (scratch_lo, scratch_hi) = scratch.split_at_mut(mid);
        merge_sort(lo, scratch_lo, cmp)?;
        merge_sort(hi, scratch_hi, cmp)?;
    }

    // Halves already in order.
    if cmp(&v[mid - 1], &v[mid])? != Ordering::Greater {
        return Ok(());
    }

    let (left, right) = v.split_at(mid);
    let out = &mut scratch[..len];
    let (mut i, mut j, mut k) = (0, 0, 0);
    while i < left.len() && j < right.len() {
        if cmp(&right[j], &left[i])? == Ordering::Less {
            out[k] = right[j];
            j += 1;
        } else {
            out[k] = left[i];
            i += 1;
        }
        k += 1;
    }
    let rest_left = left.len() - i;
    out[k..k + rest_left].copy_from_slice(&left[i..]);
    out[k + rest_left..].copy_from_slice(&right[j..]);
    v.copy_from_slice(&scratch[..len]);
    Ok(())
}
