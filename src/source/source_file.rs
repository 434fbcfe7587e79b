use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// A single text report that will be printed as its own section.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct SourceFile {
    /// The file name, used as the section title and as the sort key
    pub name: String,
    /// Where the file lives on disk
    pub path: PathBuf,
}

impl SourceFile {
    pub fn new<S: ToString, P: Into<PathBuf>>(name: S, path: P) -> SourceFile {
        SourceFile {
            name: name.to_string(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }
}

impl PartialOrd for SourceFile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SourceFile {
    fn cmp(&self, other: &Self) -> Ordering {
        // ordinal, case-sensitive; the path only breaks ties so Ord agrees with Eq
        self.name
            .cmp(&other.name)
            .then_with(|| self.path.cmp(&other.path))
    }
}
