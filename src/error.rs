//! Error types for registry loading and per-file processing.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced while loading the module index or processing files.
///
/// Registry variants are fatal for a run. File and walk variants are
/// scoped to a single path and callers are expected to report them and
/// carry on with the remaining files.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to fetch module index from {url}: {source}")]
    RegistryFetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Module index request to {url} returned status {status}")]
    RegistryStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to read module index {path:?}: {source}")]
    RegistryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode module index: {0}")]
    RegistryDecode(#[from] serde_json::Error),

    #[error("Failed to read {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid registry URL pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl Error {
    /// The file or directory the error concerns, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::RegistryRead { path, .. }
            | Error::FileRead { path, .. }
            | Error::FileWrite { path, .. } => Some(path.as_path()),
            Error::Walk(e) => e.path(),
            _ => None,
        }
    }

    /// Returns true for errors that make the whole run meaningless.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::RegistryFetch { .. }
                | Error::RegistryStatus { .. }
                | Error::RegistryRead { .. }
                | Error::RegistryDecode(_)
                | Error::Pattern(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
