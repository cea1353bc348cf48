//! Core data types for registry modules and audit reports.
//!
//! - [`ModuleRecord`] - One module as published by the registry
//! - [`RegistrySnapshot`] - The decoded registry index document
//! - [`ReportEntry`] - One stale module reference found in a file
//! - [`CheckReport`] / [`PatchReport`] - Results of a whole run
//!
//! # Example
//!
//! ```
//! use std::path::PathBuf;
//! use tfmodcheck::ReportEntry;
//!
//! let entry = ReportEntry {
//!     path: PathBuf::from("main.tf"),
//!     line_number: 3,
//!     module_name: "vpc".to_string(),
//!     referenced_version: "2.0".to_string(),
//!     latest_version: "2.3".to_string(),
//! };
//!
//! assert_eq!(entry.to_string(), "main.tf:3 `vpc` version 2.0 (latest 2.3)");
//! ```

mod module;
mod report;

pub use module::*;
pub use report::*;
