use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// How sensitive staleness detection is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Only a newer major version counts.
    Major,
    /// Only a newer minor version within the same major counts.
    Minor,
    /// Any newer major or minor version counts.
    #[default]
    #[serde(rename = "all", alias = "any")]
    Any,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Major => "major",
            Granularity::Minor => "minor",
            Granularity::Any => "all",
        }
    }

    /// Decides whether `referenced` is behind `latest` at this granularity.
    pub fn is_stale(self, referenced: ModuleVersion, latest: ModuleVersion) -> bool {
        match self {
            Granularity::Major => referenced.major < latest.major,
            Granularity::Minor => {
                referenced.major == latest.major && referenced.minor < latest.minor
            }
            Granularity::Any => {
                (referenced.major, referenced.minor) < (latest.major, latest.minor)
            }
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "major" => Ok(Granularity::Major),
            "minor" => Ok(Granularity::Minor),
            "all" | "any" => Ok(Granularity::Any),
            _ => Err(format!(
                "Unknown report selector: {}. Use 'major', 'minor' or 'all'",
                s
            )),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The comparable part of a module version: major and minor.
///
/// Patch and later components are ignored. Parsing is lenient: a
/// component that is missing or not a number becomes `0` and a warning
/// is logged, so garbage never aborts a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleVersion {
    pub major: u64,
    pub minor: u64,
}

impl ModuleVersion {
    /// Stand-in for modules the registry does not know about.
    pub const ZERO: ModuleVersion = ModuleVersion { major: 0, minor: 0 };

    pub fn parse(version: &str) -> Self {
        let mut parts = version.split('.');
        let major = parse_component(version, "major", parts.next());
        let minor = parse_component(version, "minor", parts.next());
        Self { major, minor }
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

fn parse_component(version: &str, label: &str, part: Option<&str>) -> u64 {
    match part {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(
                "version {:?}: {} component {:?} is not a number, using 0",
                version, label, raw
            );
            0
        }),
        None => {
            warn!("version {:?}: missing {} component, using 0", version, label);
            0
        }
    }
}

/// Returns true if `referenced` is older than `latest` under `granularity`.
///
/// ```
/// use tfmodcheck::checker::{is_stale, Granularity};
///
/// assert!(is_stale("2.0", "2.3", Granularity::Any));
/// assert!(!is_stale("2.9", "2.10", Granularity::Major));
/// ```
pub fn is_stale(referenced: &str, latest: &str, granularity: Granularity) -> bool {
    granularity.is_stale(ModuleVersion::parse(referenced), ModuleVersion::parse(latest))
}
