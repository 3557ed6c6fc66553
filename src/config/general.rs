//! The general configuration settings for runa-ls.
//!
//! This module defines the [General] struct for deserializing the `[general]` table of
//! `ls.toml` and the [InternalGeneral] struct with the resolved values used by the lister.

use crate::core::{CompareMode, SortBy, TimeField};

use serde::Deserialize;

/// Widest terminal runa-ls will lay out for.
pub const MAX_WIDTH: usize = 4096;

/// How names are compared when sorting.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Collation {
    /// Locale collation unless the environment selects the C/POSIX locale.
    #[default]
    Auto,
    Locale,
    Bytes,
}

impl Collation {
    pub fn mode(self) -> CompareMode {
        match self {
            Collation::Locale => CompareMode::Collate,
            Collation::Bytes => CompareMode::Bytes,
            Collation::Auto => {
                let locale = ["LC_ALL", "LC_COLLATE", "LANG"]
                    .iter()
                    .filter_map(|var| std::env::var(var).ok())
                    .find(|value| !value.is_empty());
                mode_for_locale(locale.as_deref())
            }
        }
    }
}

/// The compare mode a locale name implies. No locale means the C locale.
pub fn mode_for_locale(locale: Option<&str>) -> CompareMode {
    match locale {
        None | Some("C") | Some("POSIX") => CompareMode::Bytes,
        Some(name) if name.starts_with("C.") => CompareMode::Bytes,
        Some(_) => CompareMode::Collate,
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct General {
    sort: SortBy,
    time: TimeField,
    reverse: bool,
    dirs_first: bool,
    classify: bool,
    show_hidden: bool,
    collation: Collation,
    tabsize: usize,
    width: Option<usize>,
}

impl Default for General {
    fn default() -> Self {
        General {
            sort: SortBy::Name,
            time: TimeField::Modified,
            reverse: false,
            dirs_first: false,
            classify: false,
            show_hidden: false,
            collation: Collation::Auto,
            tabsize: 0,
            width: None,
        }
    }
}

#[derive(Debug)]
pub struct InternalGeneral {
    sort: SortBy,
    time: TimeField,
    reverse: bool,
    dirs_first: bool,
    classify: bool,
    show_hidden: bool,
    compare_mode: CompareMode,
    tabsize: usize,
    width: Option<usize>,
}

impl From<General> for InternalGeneral {
    fn from(g: General) -> Self {
        Self {
            sort: g.sort,
            time: g.time,
            reverse: g.reverse,
            dirs_first: g.dirs_first,
            classify: g.classify,
            show_hidden: g.show_hidden,
            compare_mode: g.collation.mode(),
            tabsize: g.tabsize,
            width: g.width.map(clamp_width),
        }
    }
}

impl InternalGeneral {
    #[inline]
    pub fn sort(&self) -> SortBy {
        self.sort
    }

    #[inline]
    pub fn time(&self) -> TimeField {
        self.time
    }

    #[inline]
    pub fn reverse(&self) -> bool {
        self.reverse
    }

    #[inline]
    pub fn dirs_first(&self) -> bool {
        self.dirs_first
    }

    #[inline]
    pub fn classify(&self) -> bool {
        self.classify
    }

    #[inline]
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    #[inline]
    pub fn compare_mode(&self) -> CompareMode {
        self.compare_mode
    }

    #[inline]
    pub fn tabsize(&self) -> usize {
        self.tabsize
    }

    #[inline]
    pub fn width(&self) -> Option<usize> {
        self.width
    }
}

/// Clamps a configured width to [MAX_WIDTH]. 0 stays 0 (no limit).
pub fn clamp_width(value: usize) -> usize {
    if value > MAX_WIDTH {
        log::warn!("width={} out of range (0..={}), clamped", value, MAX_WIDTH);
        MAX_WIDTH
    } else {
        value
    }
}
