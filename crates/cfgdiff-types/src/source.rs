use std::fmt;
use std::path::{Path, PathBuf};

/// The conventional spelling of "no file on this side".
pub const ABSENT_PATH: &str = "/dev/null";

/// One side of a comparison.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Source {
    /// A file on disk.
    Path(PathBuf),
    /// No corresponding file; always normalizes to an empty document.
    Absent,
}

impl Source {
    /// Build a source from a path, mapping [`ABSENT_PATH`] to [`Source::Absent`].
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.as_os_str() == ABSENT_PATH {
            Self::Absent
        } else {
            Self::Path(path)
        }
    }

    /// Returns `true` for the sentinel absent source.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The underlying path, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p),
            Self::Absent => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Absent => f.write_str(ABSENT_PATH),
        }
    }
}
