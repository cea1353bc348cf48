use serde::{Deserialize, Serialize};

/// A module entry from the registry index.
///
/// Only `name` and `version` take part in comparisons; the other fields
/// are carried through for reporting. Missing fields decode as empty
/// strings, and an empty version compares as `0.0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(rename = "Namespace", default)]
    pub namespace: String,
    #[serde(rename = "Provider", default)]
    pub provider: String,
    #[serde(rename = "Version", default)]
    pub version: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Source", default)]
    pub source: String,
}

impl ModuleRecord {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            namespace: String::new(),
            provider: String::new(),
            version: version.into(),
            name: name.into(),
            source: String::new(),
        }
    }
}

/// The registry index document, `{ "Modules": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    #[serde(rename = "Modules", default)]
    pub modules: Vec<ModuleRecord>,
}
