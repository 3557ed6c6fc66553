//! Natural ordering of file names that contain version numbers.
//!
//! Digit runs compare numerically, letters sort before other characters and `~` sorts before
//! everything, even the end of the name. A trailing run of suffixes like `.tar.gz` is ignored
//! on the first pass so `foo-1.2.tar.gz` and `foo-1.10.tar.gz` compare on their versions.

use std::cmp::Ordering;

/// Compares two names by version. Locale independent.
///
/// Returns [Ordering::Equal] only for byte-identical names or names that differ in ways this
/// ordering does not see (e.g. leading zeros). Callers break such ties themselves.
pub fn filevercmp(a: &[u8], b: &[u8]) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    // Empty names first.
    match (a.is_empty(), b.is_empty()) {
        (true, _) => return Ordering::Less,
        (_, true) => return Ordering::Greater,
        _ => {}
    }

    // "." then ".." then other dot-names, then everything else.
    match (a[0] == b'.', b[0] == b'.') {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (true, true) => {
            for special in [&b"."[..], &b".."[..]] {
                match (a == special, b == special) {
                    (true, _) => return Ordering::Less,
                    (_, true) => return Ordering::Greater,
                    _ => {}
                }
            }
        }
        (false, false) => {}
    }

    let a_prefix = prefix_len(a);
    let b_prefix = prefix_len(b);
    let one_pass = a_prefix == a.len() && b_prefix == b.len();

    match verrevcmp(&a[..a_prefix], &b[..b_prefix]) {
        Ordering::Equal if !one_pass => verrevcmp(a, b),
        result => result,
    }
}

/// Length of `s` without its trailing `(\.[A-Za-z~][A-Za-z0-9~]*)*` suffix.
/// The first byte always belongs to the prefix.
fn prefix_len(s: &[u8]) -> usize {
    let n = s.len();
    let mut prefix = 0;
    let mut i = 0;
    while i < n {
        i += 1;
        prefix = i;
        while i + 1 < n && s[i] == b'.' && (s[i + 1].is_ascii_alphabetic() || s[i + 1] == b'~') {
            i += 2;
            while i < n && (s[i].is_ascii_alphanumeric() || s[i] == b'~') {
                i += 1;
            }
        }
    }
    prefix
}

/// Weight of the byte at `pos` for the non-digit part of the comparison.
fn order(s: &[u8], pos: usize) -> i32 {
    match s.get(pos) {
        None => -1,
        Some(c) if c.is_ascii_digit() => 0,
        Some(c) if c.is_ascii_alphabetic() => i32::from(*c),
        Some(&b'~') => -2,
        Some(c) => i32::from(*c) + 256,
    }
}

fn verrevcmp(s1: &[u8], s2: &[u8]) -> Ordering {
    let (mut p1, mut p2) = (0, 0);
    let digit_at = |s: &[u8], p: usize| s.get(p).is_some_and(u8::is_ascii_digit);

    while p1 < s1.len() || p2 < s2.len() {
        while (p1 < s1.len() && !digit_at(s1, p1)) || (p2 < s2.len() && !digit_at(s2, p2)) {
            let c1 = order(s1, p1);
            let c2 = order(s2, p2);
            if c1 != c2 {
                return c1.cmp(&c2);
            }
            p1 += 1;
            p2 += 1;
        }

        while s1.get(p1) == Some(&b'0') {
            p1 += 1;
        }
        while s2.get(p2) == Some(&b'0') {
            p2 += 1;
        }

        let mut first_diff = Ordering::Equal;
        while digit_at(s1, p1) && digit_at(s2, p2) {
            if first_diff == Ordering::Equal {
                first_diff = s1[p1].cmp(&s2[p2]);
            }
            p1 += 1;
            p2 += 1;
        }

        // The longer digit run is the larger number.
        if digit_at(s1, p1) {
            return Ordering::Greater;
        }
        if digit_at(s2, p2) {
            return Ordering::Less;
        }
        if first_diff != Ordering::Equal {
            return first_diff;
        }
    }
    Ordering::Equal
}
