use crate::core::ArtifactStore;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Resolves relative artifact paths against the working directory.
    pub fn current_dir() -> Self {
        Self::new(".")
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }
}

impl ArtifactStore for LocalStorage {
    fn read_artifact(&self, path: &Path) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        tracing::debug!("Reading artifact from {}", full_path.display());
        let data = fs::read(full_path)?;
        Ok(data)
    }
}
