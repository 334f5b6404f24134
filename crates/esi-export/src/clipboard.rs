//! Clipboard backend.

use async_trait::async_trait;

use crate::error::Result;

/// Copies a named region of the page to the system clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Select and copy the element with id `region_id`.
    async fn copy_region(&self, region_id: &str) -> Result<()>;

    /// Drop the text selection left behind by a copy.
    fn clear_selection(&self);
}
