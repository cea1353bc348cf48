//! Module registry access.
//!
//! The registry publishes a single JSON index listing the latest version
//! of every module. This module provides the [`RegistrySource`] trait
//! for fetching that document, the two sources the CLI uses, and
//! [`ModuleIndex`] for lookups once it is decoded.
//!
//! | Source | Where the index comes from |
//! |--------|----------------------------|
//! | [`HttpRegistry`] | `GET <registry>/<index file>` |
//! | [`FileRegistry`] | A JSON snapshot on local disk |
//!
//! # Example
//!
//! ```no_run
//! use tfmodcheck::registry::{load_index, HttpRegistry};
//!
//! #[tokio::main]
//! async fn main() -> tfmodcheck::Result<()> {
//!     let registry = HttpRegistry::new("https://modules.example.com/modules.json");
//!     let index = load_index(&registry).await?;
//!     println!("{} modules known", index.len());
//!     Ok(())
//! }
//! ```

mod file;
mod http;
mod index;

pub use file::FileRegistry;
pub use http::HttpRegistry;
pub use index::ModuleIndex;

use crate::error::Result;
use crate::model::RegistrySnapshot;
use async_trait::async_trait;
use tracing::debug;

/// A place the raw module index document can be fetched from.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Human-readable location of the index, used in reports and logs.
    fn location(&self) -> String;

    /// Fetches the raw index document.
    ///
    /// # Errors
    ///
    /// Returns a registry error if the document cannot be retrieved.
    async fn fetch(&self) -> Result<Vec<u8>>;
}

/// Decodes a `{ "Modules": [...] }` document.
///
/// # Errors
///
/// Returns [`Error::RegistryDecode`](crate::Error::RegistryDecode) for
/// malformed JSON. Records with missing fields still decode.
pub fn decode_snapshot(buf: &[u8]) -> Result<RegistrySnapshot> {
    Ok(serde_json::from_slice(buf)?)
}

/// Fetches and decodes the index from `source`.
pub async fn load_index(source: &dyn RegistrySource) -> Result<ModuleIndex> {
    debug!("Getting module index from {}", source.location());
    let buf = source.fetch().await?;
    let snapshot = decode_snapshot(&buf)?;
    let index = ModuleIndex::from_records(snapshot.modules);
    debug!("Loaded {} modules from {}", index.len(), source.location());
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::Granularity;
    use crate::Error;

    struct StaticRegistry(&'static str);

    #[async_trait]
    impl RegistrySource for StaticRegistry {
        fn location(&self) -> String {
            "static".to_string()
        }

        async fn fetch(&self) -> Result<Vec<u8>> {
            Ok(self.0.as_bytes().to_vec())
        }
    }

    #[test]
    fn test_decode_snapshot() {
        let json = r#"{
            "Modules": [
                {
                    "ID": "platform/vpc/aws/2.3",
                    "Namespace": "platform",
                    "Provider": "aws",
                    "Version": "2.3",
                    "Name": "vpc",
                    "Source": "https://modules.example.com/vpc/2.3.zip"
                },
                { "Name": "rds", "Version": "1.1" }
            ]
        }"#;

        let snapshot = decode_snapshot(json.as_bytes()).unwrap();
        assert_eq!(snapshot.modules.len(), 2);
        assert_eq!(snapshot.modules[0].id, "platform/vpc/aws/2.3");
        assert_eq!(snapshot.modules[0].provider, "aws");
        assert_eq!(snapshot.modules[1].name, "rds");
        assert!(snapshot.modules[1].source.is_empty());
    }

    #[test]
    fn test_decode_snapshot_without_modules() {
        let snapshot = decode_snapshot(b"{}").unwrap();
        assert!(snapshot.modules.is_empty());
    }

    #[test]
    fn test_decode_snapshot_malformed() {
        let err = decode_snapshot(b"{\"Modules\": [").unwrap_err();
        assert!(matches!(err, Error::RegistryDecode(_)));
        assert!(err.is_fatal());

        let err = decode_snapshot(br#"{"Modules": {"Name": "vpc"}}"#).unwrap_err();
        assert!(matches!(err, Error::RegistryDecode(_)));
    }

    #[test]
    fn test_decode_snapshot_record_without_version() {
        let snapshot = decode_snapshot(
            br#"{"Modules": [{"Name": "vpc"}, {"Name": "rds", "Version": "2.0"}, {"Version": "1.0"}]}"#,
        )
        .unwrap();
        assert_eq!(snapshot.modules.len(), 3);
        assert_eq!(snapshot.modules[0].version, "");

        let index = ModuleIndex::from_records(snapshot.modules);
        assert!(!index.is_stale("vpc", "1.0", Granularity::Any));
        assert!(index.is_stale("rds", "1.4", Granularity::Any));
    }

    #[tokio::test]
    async fn test_load_index() {
        let registry = StaticRegistry(
            r#"{"Modules": [{"Name": "vpc", "Version": "2.0"}, {"Name": "vpc", "Version": "2.3"}]}"#,
        );

        let index = load_index(&registry).await.unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.latest_version("vpc"), Some("2.3"));
    }
}
