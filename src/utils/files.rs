use crate::core::error::PxError;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

const SNIFF_LEN: usize = 8192;

/// Replace every occurrence of `old` with `new` in the file, in place.
///
/// With `backup` set (e.g. `".bak"`), the original content is first copied to
/// `<path><backup>`. Returns the number of replacements made; the file is only
/// rewritten when that number is non-zero.
pub fn replace_in_file(
    path: &Path,
    old: &str,
    new: &str,
    backup: Option<&str>,
) -> Result<usize, PxError> {
    if old.is_empty() {
        return Err(PxError::Input("text to replace must not be empty".to_string()));
    }

    let content = fs::read_to_string(path)?;

    if let Some(suffix) = backup {
        let mut backup_path: OsString = path.as_os_str().to_owned();
        backup_path.push(suffix);
        fs::write(&backup_path, &content)?;
    }

    let count = content.matches(old).count();
    if count > 0 {
        fs::write(path, content.replace(old, new))?;
    }
    debug!(path = %path.display(), count, "replace_in_file");
    Ok(count)
}

/// Guess whether a file holds text: no NUL bytes and valid UTF-8 in the
/// first 8 KiB. Unreadable files count as binary.
pub fn is_text_file(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    let mut buf = Vec::with_capacity(SNIFF_LEN);
    if file.by_ref().take(SNIFF_LEN as u64).read_to_end(&mut buf).is_err() {
        return false;
    }
    if buf.contains(&0) {
        return false;
    }
    match std::str::from_utf8(&buf) {
        Ok(_) => true,
        // The sniff window may cut a multi-byte char in half
        Err(e) => e.error_len().is_none(),
    }
}

/// Expand a leading `~`, resolve against the current directory and collapse
/// `.` and `..` components without touching the filesystem.
pub fn normal_path(path: &Path) -> Result<PathBuf, PxError> {
    let expanded = match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .ok_or_else(|| PxError::Config("could not determine home directory".to_string()))?
            .join(rest),
        Err(_) => path.to_path_buf(),
    };

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()?.join(expanded)
    };

    let mut normal = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normal.pop();
            }
            other => normal.push(other.as_os_str()),
        }
    }
    Ok(normal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_counts_and_rewrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "foo bar foo\nfoo\n").unwrap();

        let n = replace_in_file(&path, "foo", "baz", None).unwrap();
        assert_eq!(n, 3);
        assert_eq!(fs::read_to_string(&path).unwrap(), "baz bar baz\nbaz\n");
    }

    #[test]
    fn replace_is_idempotent_once_nothing_matches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "hello world").unwrap();

        assert_eq!(replace_in_file(&path, "world", "there", None).unwrap(), 1);
        let after_first = fs::read_to_string(&path).unwrap();
        assert_eq!(replace_in_file(&path, "world", "there", None).unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
    }

    #[test]
    fn replace_writes_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf.ini");
        fs::write(&path, "level=1").unwrap();

        replace_in_file(&path, "1", "2", Some(".bak")).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("conf.ini.bak")).unwrap(), "level=1");
        assert_eq!(fs::read_to_string(&path).unwrap(), "level=2");
    }

    #[test]
    fn replace_rejects_empty_needle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "x").unwrap();
        assert!(matches!(
            replace_in_file(&path, "", "y", None),
            Err(PxError::Input(_))
        ));
    }

    #[test]
    fn text_and_binary_detection() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("t.md");
        let bin = dir.path().join("b.bin");
        fs::write(&text, "# title\nsome text ünïcode\n").unwrap();
        fs::write(&bin, [0x89, b'P', b'N', b'G', 0, 0, 1]).unwrap();

        assert!(is_text_file(&text));
        assert!(!is_text_file(&bin));
        assert!(!is_text_file(&dir.path().join("missing")));
    }

    #[test]
    fn normal_path_collapses_dots() {
        let p = normal_path(Path::new("/tmp/a/./b/../c.txt")).unwrap();
        assert_eq!(p, PathBuf::from("/tmp/a/c.txt"));
    }

    #[test]
    fn normal_path_makes_relative_absolute() {
        let p = normal_path(Path::new("out.md")).unwrap();
        assert!(p.is_absolute());
        assert!(p.ends_with("out.md"));
    }
}
