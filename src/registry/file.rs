use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::PathBuf;

use super::RegistrySource;

/// Reads the module index from a local JSON snapshot.
pub struct FileRegistry {
    path: PathBuf,
}

impl FileRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RegistrySource for FileRegistry {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|source| Error::RegistryRead {
                path: self.path.clone(),
                source,
            })
    }
}
