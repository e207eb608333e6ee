//! Resolution of the two command-line paths into comparison pairs.

use std::fmt;
use std::path::{Path, PathBuf};

use cfgdiff_types::Source;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{DiffError, DiffResult};

/// A file present on only one side of a comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresenceMismatch {
    /// The root (or, for a single file, the parent directory) that has the file.
    pub dir: PathBuf,
    /// The file's path relative to `dir`.
    pub relative: PathBuf,
}

impl fmt::Display for PresenceMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Only in {}: {}", self.dir.display(), self.relative.display())
    }
}

/// Two sources to compare. A side missing on disk is [`Source::Absent`] and
/// the pair records which side has the file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePair {
    pub from: Source,
    pub to: Source,
    pub mismatch: Option<PresenceMismatch>,
}

impl FilePair {
    fn both(from: PathBuf, to: PathBuf) -> Self {
        Self {
            from: Source::Path(from),
            to: Source::Path(to),
            mismatch: None,
        }
    }

    fn only_from(path: PathBuf, dir: PathBuf, relative: PathBuf) -> Self {
        Self {
            from: Source::Path(path),
            to: Source::Absent,
            mismatch: Some(PresenceMismatch { dir, relative }),
        }
    }

    fn only_to(path: PathBuf, dir: PathBuf, relative: PathBuf) -> Self {
        Self {
            from: Source::Absent,
            to: Source::Path(path),
            mismatch: Some(PresenceMismatch { dir, relative }),
        }
    }
}

/// Expand `from` and `to` into the ordered list of pairs to compare.
///
/// Without `recursive` both arguments must be files (or the absent
/// sentinel). With it, two directories are walked in file-name order; a
/// directory paired with a file is [`DiffError::DirectoryModeMismatch`], and
/// two files are compared as if `recursive` were off.
pub fn enumerate(from: &Path, to: &Path, recursive: bool) -> DiffResult<Vec<FilePair>> {
    match (recursive, from.is_dir(), to.is_dir()) {
        (true, true, true) => walk_pair(from, to),
        (true, true, false) | (true, false, true) => Err(DiffError::DirectoryModeMismatch {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        }),
        (false, true, _) => Err(DiffError::IsADirectory(from.to_path_buf())),
        (false, _, true) => Err(DiffError::IsADirectory(to.to_path_buf())),
        _ => single_pair(from, to).map(|pair| vec![pair]),
    }
}

fn single_pair(from: &Path, to: &Path) -> DiffResult<FilePair> {
    let from_source = Source::from_path(from);
    let to_source = Source::from_path(to);
    let from_exists = !from_source.is_absent() && from.exists();
    let to_exists = !to_source.is_absent() && to.exists();

    let split = |path: &Path| {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name = path.file_name().map(PathBuf::from).unwrap_or_else(|| path.to_path_buf());
        (dir, name)
    };

    let pair = match (from_exists, to_exists) {
        (true, true) => FilePair::both(from.to_path_buf(), to.to_path_buf()),
        (true, false) => {
            let (dir, name) = split(from);
            FilePair::only_from(from.to_path_buf(), dir, name)
        }
        (false, true) => {
            let (dir, name) = split(to);
            FilePair::only_to(to.to_path_buf(), dir, name)
        }
        (false, false) => {
            return Err(DiffError::MissingInputs {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
            })
        }
    };
    debug!(from = %pair.from, to = %pair.to, "enumerated pair");
    Ok(pair)
}

/// Files under `root`, relative to it, in file-name order.
fn relative_files(root: &Path) -> DiffResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(relative.to_path_buf());
        }
    }
    Ok(files)
}

fn walk_pair(from: &Path, to: &Path) -> DiffResult<Vec<FilePair>> {
    let mut pairs = Vec::new();

    for relative in relative_files(from)? {
        let from_path = from.join(&relative);
        let to_path = to.join(&relative);
        let pair = if to_path.is_file() {
            FilePair::both(from_path, to_path)
        } else {
            FilePair::only_from(from_path, from.to_path_buf(), relative)
        };
        debug!(from = %pair.from, to = %pair.to, "enumerated pair");
        pairs.push(pair);
    }

    for relative in relative_files(to)? {
        if from.join(&relative).is_file() {
            continue;
        }
        let pair = FilePair::only_to(to.join(&relative), to.to_path_buf(), relative);
        debug!(from = %pair.from, to = %pair.to, "enumerated pair");
        pairs.push(pair);
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn tree(files: &[&str]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "x = 1\n").unwrap();
        }
        dir
    }

    #[test]
    fn two_files_make_one_pair() {
        let dir = tree(&["a.ini", "b.ini"]);
        let pairs = enumerate(&dir.path().join("a.ini"), &dir.path().join("b.ini"), false).unwrap();
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].mismatch.is_none());
    }

    #[test]
    fn missing_from_file_is_presence_mismatch() {
        let dir = tree(&["b.ini"]);
        let pairs = enumerate(&dir.path().join("a.ini"), &dir.path().join("b.ini"), false).unwrap();
        assert_eq!(pairs[0].from, Source::Absent);
        let mismatch = pairs[0].mismatch.as_ref().unwrap();
        assert_eq!(mismatch.dir, dir.path());
        assert_eq!(mismatch.relative, Path::new("b.ini"));
        assert_eq!(
            mismatch.to_string(),
            format!("Only in {}: b.ini", dir.path().display())
        );
    }

    #[test]
    fn dev_null_is_absent() {
        let dir = tree(&["a.ini"]);
        let pairs = enumerate(&dir.path().join("a.ini"), Path::new("/dev/null"), false).unwrap();
        assert_eq!(pairs[0].to, Source::Absent);
        assert!(pairs[0].mismatch.is_some());
    }

    #[test]
    fn both_missing_is_an_error() {
        let dir = tree(&[]);
        let err = enumerate(&dir.path().join("a"), &dir.path().join("b"), false).unwrap_err();
        assert!(matches!(err, DiffError::MissingInputs { .. }));
    }

    #[test]
    fn directory_without_recursive_is_an_error() {
        let dir = tree(&["a.ini"]);
        let err = enumerate(dir.path(), &dir.path().join("a.ini"), false).unwrap_err();
        assert!(matches!(err, DiffError::IsADirectory(_)));
    }

    #[test]
    fn recursive_directory_and_file_mismatch() {
        let dir = tree(&["a.ini"]);
        let err = enumerate(dir.path(), &dir.path().join("a.ini"), true).unwrap_err();
        assert!(matches!(err, DiffError::DirectoryModeMismatch { .. }));
        assert_eq!(err.to_string(), "cannot compare folders and files");
    }

    #[test]
    fn recursive_with_two_files_compares_them() {
        let dir = tree(&["a.ini", "b.ini"]);
        let pairs = enumerate(&dir.path().join("a.ini"), &dir.path().join("b.ini"), true).unwrap();
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn recursive_walk_pairs_and_orders() {
        let from = tree(&["common.ini", "only_from.ini", "sub/nested.ini"]);
        let to = tree(&["common.ini", "sub/nested.ini", "an_only_to.ini"]);
        let pairs = enumerate(from.path(), to.path(), true).unwrap();

        let describe: Vec<(String, bool)> = pairs
            .iter()
            .map(|p| {
                let side = if p.from.is_absent() { &p.to } else { &p.from };
                let path = side.path().unwrap();
                let root = if p.from.is_absent() { to.path() } else { from.path() };
                (
                    path.strip_prefix(root).unwrap().display().to_string(),
                    p.mismatch.is_some(),
                )
            })
            .collect();
        assert_eq!(
            describe,
            [
                ("common.ini".to_string(), false),
                ("only_from.ini".to_string(), true),
                ("sub/nested.ini".to_string(), false),
                ("an_only_to.ini".to_string(), true),
            ]
        );
        let last = pairs[3].mismatch.as_ref().unwrap();
        assert_eq!(last.dir, to.path());
    }
}
