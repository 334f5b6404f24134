//! Structure retrieval.

use async_trait::async_trait;
use esi_model::{Structure, pdb};

use crate::error::{Result, ViewerError};

/// Fetches and parses the structure behind a locator.
#[async_trait]
pub trait StructureLoader: Send + Sync {
    /// Load the structure at `locator`.
    async fn load(&self, locator: &str) -> Result<Structure>;
}

/// Loader for PDB files over HTTP(S) or from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct DefaultLoader {
    client: reqwest::Client,
}

impl DefaultLoader {
    /// Create a loader with a fresh HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    async fn fetch(&self, locator: &str) -> Result<String> {
        if is_remote(locator) {
            tracing::debug!(locator, "Fetching structure over HTTP");
            let response = self
                .client
                .get(locator)
                .send()
                .await
                .map_err(|e| ViewerError::fetch(locator, e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ViewerError::fetch(
                    locator,
                    format!("request failed with status {}", status),
                ));
            }

            response
                .text()
                .await
                .map_err(|e| ViewerError::fetch(locator, e))
        } else {
            tracing::debug!(locator, "Reading structure from disk");
            tokio::fs::read_to_string(locator)
                .await
                .map_err(|e| ViewerError::fetch(locator, e))
        }
    }
}

#[async_trait]
impl StructureLoader for DefaultLoader {
    async fn load(&self, locator: &str) -> Result<Structure> {
        let text = self.fetch(locator).await?;
        Ok(pdb::parse(&text)?)
    }
}

fn is_remote(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}
