use std::collections::HashMap;

use crate::checker::{Granularity, ModuleVersion};
use crate::model::ModuleRecord;

/// Latest known record per module name.
///
/// Built once per run and read-only afterwards. When the source list
/// holds the same name twice, the later record wins.
#[derive(Debug, Clone, Default)]
pub struct ModuleIndex {
    modules: HashMap<String, ModuleRecord>,
}

impl ModuleIndex {
    pub fn from_records(records: impl IntoIterator<Item = ModuleRecord>) -> Self {
        let mut modules = HashMap::new();
        for record in records {
            modules.insert(record.name.clone(), record);
        }
        Self { modules }
    }

    pub fn get(&self, name: &str) -> Option<&ModuleRecord> {
        self.modules.get(name)
    }

    pub fn latest_version(&self, name: &str) -> Option<&str> {
        self.get(name).map(|record| record.version.as_str())
    }

    /// Decides whether `referenced` is behind the latest version of `name`.
    ///
    /// Modules missing from the index compare against `0.0` and are
    /// therefore never stale.
    pub fn is_stale(&self, name: &str, referenced: &str, granularity: Granularity) -> bool {
        let latest = self
            .latest_version(name)
            .map(ModuleVersion::parse)
            .unwrap_or(ModuleVersion::ZERO);
        granularity.is_stale(ModuleVersion::parse(referenced), latest)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl FromIterator<ModuleRecord> for ModuleIndex {
    fn from_iter<I: IntoIterator<Item = ModuleRecord>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_lookup() {
        let index = ModuleIndex::from_records(vec![
            ModuleRecord::new("vpc", "2.3"),
            ModuleRecord::new("rds", "1.0.4"),
        ]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.latest_version("vpc"), Some("2.3"));
        assert_eq!(index.latest_version("rds"), Some("1.0.4"));
        assert_eq!(index.latest_version("ecs"), None);
    }

    #[test]
    fn test_index_last_duplicate_wins() {
        let index: ModuleIndex = vec![
            ModuleRecord::new("vpc", "2.3"),
            ModuleRecord::new("vpc", "1.9"),
        ]
        .into_iter()
        .collect();

        assert_eq!(index.len(), 1);
        assert_eq!(index.latest_version("vpc"), Some("1.9"));
    }

    #[test]
    fn test_index_is_stale() {
        let index = ModuleIndex::from_records(vec![ModuleRecord::new("vpc", "2.3")]);

        assert!(index.is_stale("vpc", "2.0", Granularity::Any));
        assert!(!index.is_stale("vpc", "2.3", Granularity::Any));
        assert!(!index.is_stale("vpc", "2.0", Granularity::Major));
    }

    #[test]
    fn test_index_miss_never_stale() {
        let index = ModuleIndex::from_records(vec![ModuleRecord::new("vpc", "2.3")]);

        for granularity in [Granularity::Major, Granularity::Minor, Granularity::Any] {
            assert!(!index.is_stale("unknown", "0.1", granularity));
            assert!(!index.is_stale("unknown", "0.0", granularity));
            assert!(!index.is_stale("unknown", "not-a-version", granularity));
        }
    }

    #[test]
    fn test_empty_index() {
        let index = ModuleIndex::default();
        assert!(index.is_empty());
        assert!(!index.is_stale("vpc", "1.0", Granularity::Any));
    }
}
