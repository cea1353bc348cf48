//! Discovery of configuration files to audit.
//!
//! Every path given on the command line is either a file, which is taken
//! as-is, or a directory, which is walked recursively for files with the
//! configured extension. Directory entries are visited in file name
//! order so reports come out in a stable order between runs. A file
//! reached through more than one root is listed once, at its first
//! position.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use tfmodcheck::scanner::FileScanner;
//!
//! let scanner = FileScanner::new("tf").with_excludes(vec![".terraform".to_string()]);
//! let discovery = scanner.scan(&[PathBuf::from("infra")]);
//!
//! for path in &discovery.files {
//!     println!("{}", path.display());
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::Error;

/// Files found by a scan, plus anything that could not be walked.
#[derive(Debug, Default)]
pub struct Discovery {
    pub files: Vec<PathBuf>,
    pub errors: Vec<Error>,
}

/// Walks directory trees for configuration files.
#[derive(Debug, Clone)]
pub struct FileScanner {
    extension: String,
    exclude_dirs: Vec<String>,
}

impl FileScanner {
    /// Creates a scanner for files ending in `.<extension>`.
    ///
    /// A leading dot on `extension` is optional.
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_string(),
            exclude_dirs: Vec::new(),
        }
    }

    /// Directory names that are never descended into.
    pub fn with_excludes(mut self, exclude_dirs: Vec<String>) -> Self {
        self.exclude_dirs = exclude_dirs;
        self
    }

    pub fn scan(&self, roots: &[PathBuf]) -> Discovery {
        let mut discovery = Discovery::default();
        let mut seen = HashSet::new();
        let mut push = |files: &mut Vec<PathBuf>, path: PathBuf| {
            let key = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
            if seen.insert(key) {
                files.push(path);
            } else {
                debug!("Already queued {:?}", path);
            }
        };

        for root in roots {
            if root.is_file() {
                push(&mut discovery.files, root.clone());
                continue;
            }

            let walker = WalkDir::new(root)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| !self.is_excluded(entry));

            for entry in walker {
                match entry {
                    Ok(entry) => {
                        if entry.file_type().is_file() && self.has_extension(entry.path()) {
                            push(&mut discovery.files, entry.into_path());
                        }
                    }
                    Err(e) => {
                        warn!("Skipping unreadable path: {}", e);
                        discovery.errors.push(Error::Walk(e));
                    }
                }
            }
        }

        debug!("Found {} configuration files", discovery.files.len());
        discovery
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext == self.extension.as_str())
            .unwrap_or(false)
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map(|name| self.exclude_dirs.iter().any(|excluded| excluded == name))
                .unwrap_or(false)
    }
}
