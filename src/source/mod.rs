//! Discovery of the text reports that make up a book.
//!
//! A [`Source`] is a flat listing of one directory: every regular file whose
//! name ends in `.txt`, sorted by name. Subdirectories are never descended
//! into, and nothing else in the directory affects the output.

mod source_file;
pub use source_file::*;

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// Extension (including the dot) that marks a directory entry as a report.
pub const REPORT_SUFFIX: &str = ".txt";

/// Everything we need to know to render a directory of reports as a book
#[derive(Debug, Default)]
pub struct Source {
    /// The directory the reports were listed from
    pub root: PathBuf,

    /// All the report files that will be printed, in rendering order
    pub source_files: Vec<SourceFile>,
}

impl Source {
    /// List `root` and collect its `.txt` files in name order.
    pub fn discover<P: AsRef<Path>>(root: P) -> Result<Source> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(anyhow!("Report path {} isn't a directory!", root.display()));
        }

        let entries = std::fs::read_dir(root)
            .with_context(|| format!("Failed to list directory {}", root.display()))?;

        let mut source = Source {
            root: root.to_path_buf(),
            source_files: Vec::default(),
        };
        for entry in entries {
            let entry = entry
                .with_context(|| format!("Failed to read an entry of {}", root.display()))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if !name.ends_with(REPORT_SUFFIX) {
                continue;
            }

            // follow symlinks so a linked report still counts
            let path = entry.path();
            if !path.is_file() {
                log::debug!("Skipping {}, it isn't a regular file", path.display());
                continue;
            }

            log::debug!("Discovered report {name}");
            source.add_source_file(SourceFile::new(name, path));
        }
        source.source_files.sort();

        Ok(source)
    }

    pub fn add_source_file<F: Into<SourceFile>>(&mut self, source_file: F) -> &mut Self {
        self.source_files.push(source_file.into());
        self
    }

    pub fn len(&self) -> usize {
        self.source_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source_files.is_empty()
    }
}
