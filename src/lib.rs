pub mod checker;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod registry;
pub mod scanner;

pub use checker::{FileProcessor, Granularity, ReferenceMatcher};
pub use config::Config;
pub use error::{Error, Result};
pub use model::{CheckReport, ModuleRecord, PatchReport, ReportEntry};
pub use registry::{ModuleIndex, RegistrySource};
