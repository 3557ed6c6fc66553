//! Display formatting helpers for file entries in runa-ls.
//!
//! Escapes names for the terminal, measures their width, picks the `-F` indicator and formats
//! the permission string and timestamp shown by the long format.

use crate::core::FileEntry;

use chrono::{DateTime, Local};
use unicode_width::UnicodeWidthStr;

use std::borrow::Cow;
use std::ffi::OsStr;
use std::fs::Metadata;
use std::time::{Duration, SystemTime};

// Timestamps older or newer than this are shown with the year instead of the time of day.
const RECENT_WINDOW: Duration = Duration::from_secs(31_556_952 / 2);

/// Returns the name as printed: lossy UTF-8 with control characters replaced by `?`.
pub fn escape_name(name: &OsStr) -> Cow<'_, str> {
    let lossy = name.to_string_lossy();
    if !lossy.chars().any(char::is_control) {
        return lossy;
    }
    Cow::Owned(
        lossy
            .chars()
            .map(|c| if c.is_control() { '?' } else { c })
            .collect(),
    )
}

/// Screen columns occupied by `text`.
#[inline]
pub fn text_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// The `-F` indicator for an entry, if it has one.
pub fn indicator(entry: &FileEntry) -> Option<char> {
    if entry.is_dir() {
        Some('/')
    } else if entry.is_symlink() {
        Some('@')
    } else if entry.is_fifo() {
        Some('|')
    } else if entry.is_socket() {
        Some('=')
    } else if entry.is_executable() {
        Some('*')
    } else {
        None
    }
}

/// Allocated size in KiB, from a count of 512-byte blocks.
#[inline]
pub fn block_kib(blocks: u64) -> u64 {
    blocks.div_ceil(2)
}

/// Formatts the file attributes like Directory, Symlink, and permissions in a unix-like format
///
/// On Unix: Returns a string like 'drwxr-xr-x' etc. for directories and files.
/// On Windows: Returns a short string showing file type and attributes like:
/// (`d`, `l`, `h` for hidden, `s` for system, `a` for archive, `r` for read-only).
pub fn format_attributes(meta: &Metadata) -> String {
    #[cfg(unix)]
    {
        use std::os::unix::fs::{FileTypeExt, PermissionsExt};

        let file_type = meta.file_type();
        let first = if file_type.is_dir() {
            'd'
        } else if file_type.is_symlink() {
            'l'
        } else if file_type.is_fifo() {
            'p'
        } else if file_type.is_socket() {
            's'
        } else if file_type.is_block_device() {
            'b'
        } else if file_type.is_char_device() {
            'c'
        } else {
            '-'
        };
        let mode = meta.permissions().mode();
        let mut chars = [first, '-', '-', '-', '-', '-', '-', '-', '-', '-'];
        let shifts = [6, 3, 0];
        for (i, &shift) in shifts.iter().enumerate() {
            let base = 1 + i * 3;
            if (mode >> (shift + 2)) & 1u32 != 0 {
                chars[base] = 'r';
            }
            if (mode >> (shift + 1)) & 1u32 != 0 {
                chars[base + 1] = 'w';
            }
            if (mode >> shift) & 1u32 != 0 {
                chars[base + 2] = 'x';
            }
        }
        // setuid, setgid, sticky
        let special = [(0o4000, 3, 's'), (0o2000, 6, 's'), (0o1000, 9, 't')];
        for (bit, idx, mark) in special {
            if mode & bit != 0 {
                chars[idx] = if chars[idx] == 'x' {
                    mark
                } else {
                    mark.to_ascii_uppercase()
                };
            }
        }
        chars.iter().collect()
    }
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        let attr = meta.file_attributes();
        let mut out = String::with_capacity(7);
        out.push(if attr & 0x10 != 0 {
            'd'
        } else if attr & 0x400 != 0 {
            'l'
        } else {
            '-'
        });
        out.push(if attr & 0x02 != 0 { 'h' } else { '-' });
        out.push(if attr & 0x04 != 0 { 's' } else { '-' });
        out.push(if attr & 0x20 != 0 { 'a' } else { '-' });
        out.push(if attr & 0x01 != 0 { 'r' } else { '-' });
        out
    }
}

/// Formats a timestamp the way `ls -l` does.
///
/// Times within half a year of `now` show the time of day, anything else shows the year.
/// # Returns
/// A fixed-width string, or `?` padded to the same width if the time is unknown.
pub fn format_file_time(time: Option<SystemTime>, now: SystemTime) -> String {
    let Some(time) = time else {
        return format!("{:>12}", "?");
    };

    let recent = match now.duration_since(time) {
        Ok(age) => age < RECENT_WINDOW,
        Err(ahead) => ahead.duration() < RECENT_WINDOW,
    };

    let dt: DateTime<Local> = DateTime::from(time);
    if recent {
        dt.format("%b %e %H:%M").to_string()
    } else {
        dt.format("%b %e  %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn escape_replaces_control_chars() {
        let name = OsString::from("bad\nname\t");
        assert_eq!(escape_name(&name), "bad?name?");
        assert!(matches!(escape_name(OsStr::new("fine")), Cow::Borrowed("fine")));
    }

    #[test]
    fn indicators_follow_type() {
        assert_eq!(indicator(&FileEntry::new("d", FileEntry::IS_DIR)), Some('/'));
        assert_eq!(
            indicator(&FileEntry::new("l", FileEntry::IS_SYMLINK)),
            Some('@')
        );
        assert_eq!(
            indicator(&FileEntry::new("x", FileEntry::IS_EXECUTABLE)),
            Some('*')
        );
        assert_eq!(indicator(&FileEntry::new("f", FileEntry::IS_FIFO)), Some('|'));
        assert_eq!(indicator(&FileEntry::new("plain", 0)), None);
    }

    #[test]
    fn blocks_round_up_to_kib() {
        assert_eq!(block_kib(0), 0);
        assert_eq!(block_kib(1), 1);
        assert_eq!(block_kib(8), 4);
    }

    #[test]
    fn file_time_switches_to_year_for_old_files() {
        let now = SystemTime::now();
        let recent = format_file_time(Some(now - Duration::from_secs(3600)), now);
        let old = format_file_time(Some(now - Duration::from_secs(400 * 86_400)), now);
        assert!(recent.contains(':'), "recent time lacks clock: {recent}");
        assert!(!old.contains(':'), "old time shows clock: {old}");
        assert_eq!(text_width(&recent), text_width(&old));
        assert_eq!(format_file_time(None, now).len(), 12);
    }

    #[cfg(unix)]
    #[test]
    fn attributes_for_dir() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let md = std::fs::metadata(tmp.path())?;
        let attrs = format_attributes(&md);
        assert!(attrs.starts_with('d'));
        assert_eq!(attrs.len(), 10);
        Ok(())
    }
}
