use runa_ls::app::{ExitStatus, Format, ListOptions, Lister};
use runa_ls::core::{CompareMode, Hidden, SortKey, SortOptions};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tempfile::tempdir;

type Output = Result<(String, ExitStatus), Box<dyn std::error::Error>>;

fn list(opts: ListOptions, operands: &[PathBuf]) -> Output {
    let mut lister = Lister::new(opts, Vec::new());
    let status = lister.run(operands)?;
    Ok((String::from_utf8(lister.into_inner())?, status))
}

#[test]
fn test_classify_and_dirs_first() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("alpha"))?;
    fs::create_dir(dir.path().join("zeta"))?;

    let opts = ListOptions {
        format: Format::OnePerLine,
        classify: true,
        sort: SortOptions {
            dirs_first: true,
            ..SortOptions::default()
        },
        ..ListOptions::default()
    };
    let (out, status) = list(opts, &[dir.path().to_path_buf()])?;
    assert_eq!(out, "zeta/\nalpha\n");
    assert_eq!(status, ExitStatus::Success);
    Ok(())
}

#[test]
fn test_commas_wrap_at_width() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    for name in ["alpha", "beta", "gamma"] {
        File::create(dir.path().join(name))?;
    }

    let opts = ListOptions {
        format: Format::Commas,
        width: 14,
        ..ListOptions::default()
    };
    let (out, _) = list(opts, &[dir.path().to_path_buf()])?;
    assert_eq!(out, "alpha, beta,\ngamma\n");
    Ok(())
}

#[test]
fn test_across_fills_rows() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    for name in ["a", "b", "c", "d", "e"] {
        File::create(dir.path().join(name))?;
    }

    let opts = ListOptions {
        format: Format::Across,
        width: 10,
        ..ListOptions::default()
    };
    let (out, _) = list(opts, &[dir.path().to_path_buf()])?;
    assert_eq!(out, "a  b  c\nd  e\n");
    Ok(())
}

#[test]
fn test_columns_stay_within_width() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    for name in ["a", "b", "c", "d", "e", "f", "ggg"] {
        File::create(dir.path().join(name))?;
    }

    let opts = ListOptions {
        width: 20,
        ..ListOptions::default()
    };
    let (out, _) = list(opts, &[dir.path().to_path_buf()])?;
    assert_eq!(out, "a  c  e  ggg\nb  d  f\n");
    assert!(out.lines().all(|line| line.len() < 20));
    Ok(())
}

#[test]
fn test_size_sort_with_hidden_entries() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut big = File::create(dir.path().join("big"))?;
    big.write_all(&[0u8; 4096])?;
    let mut hidden = File::create(dir.path().join(".mid"))?;
    hidden.write_all(&[0u8; 100])?;
    File::create(dir.path().join("empty"))?;

    let opts = ListOptions {
        format: Format::OnePerLine,
        hidden: Hidden::AlmostAll,
        sort: SortOptions {
            key: SortKey::Size,
            ..SortOptions::default()
        },
        ..ListOptions::default()
    };
    let (out, _) = list(opts.clone(), &[dir.path().to_path_buf()])?;
    assert_eq!(out, "big\n.mid\nempty\n");

    let reversed = ListOptions {
        sort: SortOptions {
            reverse: true,
            ..opts.sort
        },
        ..opts
    };
    let (out, _) = list(reversed, &[dir.path().to_path_buf()])?;
    assert_eq!(out, "empty\n.mid\nbig\n");
    Ok(())
}

#[test]
fn test_all_lists_dot_entries() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("file"))?;

    let opts = ListOptions {
        format: Format::OnePerLine,
        hidden: Hidden::All,
        compare_mode: CompareMode::Bytes,
        ..ListOptions::default()
    };
    let (out, _) = list(opts, &[dir.path().to_path_buf()])?;
    assert_eq!(out, ".\n..\nfile\n");
    Ok(())
}

#[test]
fn test_recursive_skips_dot_entries() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("sub"))?;
    File::create(dir.path().join("sub/inner"))?;

    let opts = ListOptions {
        format: Format::OnePerLine,
        hidden: Hidden::All,
        recursive: true,
        ..ListOptions::default()
    };
    let root = dir.path().to_path_buf();
    let (out, status) = list(opts, &[root.clone()])?;

    let expected = format!(
        "{root}:\n.\n..\nsub\n\n{sub}:\n.\n..\ninner\n",
        root = root.display(),
        sub = root.join("sub").display()
    );
    assert_eq!(out, expected);
    assert_eq!(status, ExitStatus::Success);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_recursive_does_not_follow_symlink_loops() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("sub"))?;
    std::os::unix::fs::symlink(dir.path(), dir.path().join("sub/back"))?;

    let opts = ListOptions {
        format: Format::OnePerLine,
        recursive: true,
        ..ListOptions::default()
    };
    let (out, status) = list(opts.clone(), &[dir.path().to_path_buf()])?;
    assert_eq!(out.lines().filter(|l| l.ends_with(':')).count(), 2);
    assert_eq!(status, ExitStatus::Success);

    // Following links reaches the root again, which is reported and skipped.
    let deref = ListOptions {
        dereference: true,
        ..opts
    };
    let (out, status) = list(deref, &[dir.path().to_path_buf()])?;
    assert_eq!(out.lines().filter(|l| l.ends_with(':')).count(), 2);
    assert_eq!(status, ExitStatus::Minor);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_recursive_follows_links_to_the_same_sibling() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("target"))?;
    File::create(dir.path().join("target/file"))?;
    std::os::unix::fs::symlink(dir.path().join("target"), dir.path().join("a"))?;
    std::os::unix::fs::symlink(dir.path().join("target"), dir.path().join("b"))?;

    let opts = ListOptions {
        format: Format::OnePerLine,
        recursive: true,
        dereference: true,
        ..ListOptions::default()
    };
    let (out, status) = list(opts, &[dir.path().to_path_buf()])?;
    assert_eq!(out.lines().filter(|l| l.ends_with(':')).count(), 4);
    assert_eq!(out.matches("file\n").count(), 3);
    assert_eq!(status, ExitStatus::Success);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_invalid_utf8_names_sort_bytewise() -> Result<(), Box<dyn std::error::Error>> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir()?;
    for name in [&b"b"[..], b"a\xff", b"B"] {
        File::create(dir.path().join(OsStr::from_bytes(name)))?;
    }

    let opts = ListOptions {
        format: Format::OnePerLine,
        compare_mode: CompareMode::Collate,
        ..ListOptions::default()
    };
    let (out, status) = list(opts, &[dir.path().to_path_buf()])?;
    assert_eq!(out, "B\na\u{FFFD}\nb\n");
    assert_eq!(status, ExitStatus::Success);
    Ok(())
}

#[test]
fn test_inode_prefix_aligns() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("one"))?;
    File::create(dir.path().join("two"))?;

    let opts = ListOptions {
        format: Format::OnePerLine,
        inode: true,
        ..ListOptions::default()
    };
    let (out, _) = list(opts, &[dir.path().to_path_buf()])?;
    let prefixes: Vec<usize> = out
        .lines()
        .map(|l| l.rfind(' ').map_or(0, |p| p + 1))
        .collect();
    assert_eq!(prefixes.len(), 2);
    assert_eq!(prefixes[0], prefixes[1]);
    Ok(())
}
