use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{Granularity, ReferenceMatcher};
use crate::config::IgnoreConfig;
use crate::error::{Error, Result};
use crate::model::{CheckReport, FileFailure, PatchReport, ReportEntry};
use crate::registry::ModuleIndex;

/// File contents produced by patching, along with what was rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchedContents {
    pub contents: Vec<u8>,
    pub rewritten: Vec<ReportEntry>,
}

/// Result of patching a single file.
#[derive(Debug, Clone)]
pub struct PatchOutcome {
    pub path: PathBuf,
    pub rewritten: Vec<ReportEntry>,
    /// False when nothing was stale and the file was left alone.
    pub written: bool,
}

/// Checks and patches configuration files against a module index.
///
/// Lines are handled one at a time in file order. Files are processed
/// as raw bytes and each line keeps its own terminator, so untouched
/// lines survive a patch byte-for-byte. That includes a missing final
/// newline and lines that are not valid UTF-8, which can never hold a
/// module reference and pass through as they are.
pub struct FileProcessor<'a> {
    index: &'a ModuleIndex,
    matcher: ReferenceMatcher,
    granularity: Granularity,
    ignore: IgnoreConfig,
}

impl<'a> FileProcessor<'a> {
    pub fn new(index: &'a ModuleIndex, matcher: ReferenceMatcher, granularity: Granularity) -> Self {
        Self {
            index,
            matcher,
            granularity,
            ignore: IgnoreConfig::default(),
        }
    }

    /// Skips modules matching the ignore list.
    pub fn with_ignore(mut self, ignore: IgnoreConfig) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Reports every stale reference in the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileRead`] if the file cannot be read.
    pub fn check_file(&self, path: &Path) -> Result<Vec<ReportEntry>> {
        let contents = read_file(path)?;
        Ok(self.check_contents(path, &contents))
    }

    /// Rewrites every stale reference in the file at `path`.
    ///
    /// The new contents are written with a single call once the whole
    /// file has been processed. Files without stale references are not
    /// written at all.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileRead`] or [`Error::FileWrite`].
    pub fn patch_file(&self, path: &Path) -> Result<PatchOutcome> {
        let contents = read_file(path)?;
        let patched = self.patch_contents(path, &contents);

        let written = !patched.rewritten.is_empty();
        if written {
            fs::write(path, &patched.contents).map_err(|source| Error::FileWrite {
                path: path.to_path_buf(),
                source,
            })?;
            debug!("Wrote {} updated references to {:?}", patched.rewritten.len(), path);
        }

        Ok(PatchOutcome {
            path: path.to_path_buf(),
            rewritten: patched.rewritten,
            written,
        })
    }

    /// Checks `files` in order, collecting stale references and failures.
    ///
    /// A file that cannot be read is recorded in `report.failures` and
    /// the remaining files are still checked.
    pub fn check_files(&self, files: &[PathBuf], report: &mut CheckReport) {
        for path in files {
            report.files_scanned += 1;
            match self.check_file(path) {
                Ok(entries) => report.stale.extend(entries),
                Err(e) => {
                    debug!("Skipping {:?}: {}", path, e);
                    report.failures.push(FileFailure::from(&e));
                }
            }
        }
    }

    /// Patches `files` in order, collecting rewrites and failures.
    pub fn patch_files(&self, files: &[PathBuf], report: &mut PatchReport) {
        for path in files {
            report.files_scanned += 1;
            match self.patch_file(path) {
                Ok(outcome) => {
                    if outcome.written {
                        report.files_patched += 1;
                    }
                    report.rewritten.extend(outcome.rewritten);
                }
                Err(e) => {
                    debug!("Skipping {:?}: {}", path, e);
                    report.failures.push(FileFailure::from(&e));
                }
            }
        }
    }

    /// Reports every stale reference in `contents`, attributed to `path`.
    pub fn check_contents(&self, path: &Path, contents: &[u8]) -> Vec<ReportEntry> {
        contents
            .split_inclusive(|b| *b == b'\n')
            .enumerate()
            .filter_map(|(n, raw)| {
                let (line, _) = split_terminator(raw);
                self.inspect_line(path, n + 1, line_text(line)?)
            })
            .collect()
    }

    /// Rewrites stale references in `contents` without touching the disk.
    pub fn patch_contents(&self, path: &Path, contents: &[u8]) -> PatchedContents {
        let mut out = Vec::with_capacity(contents.len());
        let mut rewritten = Vec::new();

        for (n, raw) in contents.split_inclusive(|b| *b == b'\n').enumerate() {
            let (line, terminator) = split_terminator(raw);
            let stale = line_text(line)
                .and_then(|text| Some((text, self.inspect_line(path, n + 1, text)?)));
            match stale {
                Some((text, entry)) => {
                    let updated =
                        self.matcher
                            .rewrite(text, &entry.module_name, &entry.latest_version);
                    out.extend_from_slice(updated.as_bytes());
                    rewritten.push(entry);
                }
                None => out.extend_from_slice(line),
            }
            out.extend_from_slice(terminator);
        }

        PatchedContents {
            contents: out,
            rewritten,
        }
    }

    fn inspect_line(&self, path: &Path, line_number: usize, line: &str) -> Option<ReportEntry> {
        let found = self.matcher.matches(line)?;

        if self.ignore.should_ignore_module(&found.module_name) {
            debug!("{}: ignored by configuration", found.module_name);
            return None;
        }

        let stale =
            self.index
                .is_stale(&found.module_name, &found.referenced_version, self.granularity);
        let latest = self.index.latest_version(&found.module_name);
        debug!(
            "{}: {} vs {} ({})",
            found.module_name,
            found.referenced_version,
            latest.unwrap_or("unknown"),
            stale
        );

        if !stale {
            return None;
        }

        Some(ReportEntry {
            path: path.to_path_buf(),
            line_number,
            module_name: found.module_name,
            referenced_version: found.referenced_version,
            latest_version: latest?.to_string(),
        })
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Lines in another encoding cannot hold a reference and are skipped.
fn line_text(line: &[u8]) -> Option<&str> {
    std::str::from_utf8(line).ok()
}

/// Splits a raw line into its content and its `\n` or `\r\n` terminator.
fn split_terminator(raw: &[u8]) -> (&[u8], &[u8]) {
    if let Some(line) = raw.strip_suffix(b"\r\n") {
        (line, &b"\r\n"[..])
    } else if let Some(line) = raw.strip_suffix(b"\n") {
        (line, &b"\n"[..])
    } else {
        (raw, &b""[..])
    }
}
