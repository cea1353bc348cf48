//! Staleness detection and rewriting of module references.
//!
//! - [`is_stale`] compares a referenced version with the latest one
//! - [`ReferenceMatcher`] finds module references and rewrites their version
//! - [`FileProcessor`] applies both to whole files

mod matcher;
mod processor;
mod version;

pub use matcher::{normalize_base_url, ReferenceMatch, ReferenceMatcher};
pub use processor::{FileProcessor, PatchOutcome, PatchedContents};
pub use version::{is_stale, Granularity, ModuleVersion};
