use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::checker::Granularity;

/// One stale module reference detected in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub path: PathBuf,
    /// 1-based line number.
    pub line_number: usize,
    pub module_name: String,
    pub referenced_version: String,
    pub latest_version: String,
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} `{}` version {} (latest {})",
            self.path.display(),
            self.line_number,
            self.module_name,
            self.referenced_version,
            self.latest_version
        )
    }
}

/// A file that could not be read, written or walked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub message: String,
}

impl From<&crate::Error> for FileFailure {
    fn from(error: &crate::Error) -> Self {
        Self {
            path: error.path().map(|p| p.to_path_buf()),
            message: error.to_string(),
        }
    }
}

/// Result of a `check` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub generated_at: DateTime<Utc>,
    pub registry: String,
    pub granularity: Granularity,
    pub files_scanned: usize,
    pub stale: Vec<ReportEntry>,
    pub failures: Vec<FileFailure>,
}

impl CheckReport {
    pub fn new(registry: impl Into<String>, granularity: Granularity) -> Self {
        Self {
            generated_at: Utc::now(),
            registry: registry.into(),
            granularity,
            files_scanned: 0,
            stale: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Result of a `patch` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchReport {
    pub generated_at: DateTime<Utc>,
    pub registry: String,
    pub granularity: Granularity,
    pub files_scanned: usize,
    pub files_patched: usize,
    /// Every reference that was rewritten, with the version it was bumped to.
    pub rewritten: Vec<ReportEntry>,
    pub failures: Vec<FileFailure>,
}

impl PatchReport {
    pub fn new(registry: impl Into<String>, granularity: Granularity) -> Self {
        Self {
            generated_at: Utc::now(),
            registry: registry.into(),
            granularity,
            files_scanned: 0,
            files_patched: 0,
            rewritten: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
