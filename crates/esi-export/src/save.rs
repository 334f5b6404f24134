//! Persisting generated files.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{ExportError, Result};

/// Receives a generated blob and stores it under a filename.
#[async_trait]
pub trait FileSaver: Send + Sync {
    /// Store `bytes` as `filename`, returning where it went.
    async fn save(&self, filename: &str, bytes: Vec<u8>) -> Result<PathBuf>;
}

/// Saves files into a fixed directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl FileSaver for DirectorySaver {
    async fn save(&self, filename: &str, bytes: Vec<u8>) -> Result<PathBuf> {
        let save_error = |e: std::io::Error| ExportError::Save {
            filename: filename.to_string(),
            message: e.to_string(),
        };

        tokio::fs::create_dir_all(&self.dir).await.map_err(save_error)?;
        let path = self.dir.join(filename);
        tokio::fs::write(&path, &bytes).await.map_err(save_error)?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Saved export");
        Ok(path)
    }
}
