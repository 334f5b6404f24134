//! Error types for viewer loading and rendering.

use thiserror::Error;

/// Errors raised while loading or capturing a viewer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ViewerError {
    /// The structure could not be retrieved.
    #[error("failed to fetch {locator}: {message}")]
    Fetch {
        /// URL or path that was requested.
        locator: String,
        /// Transport error description.
        message: String,
    },

    /// The structure payload could not be parsed.
    #[error("failed to parse structure: {0}")]
    Parse(#[from] esi_model::ModelError),

    /// The stage could not produce an image.
    #[error("snapshot failed: {0}")]
    Snapshot(String),
}

impl ViewerError {
    /// Build a fetch error for a locator.
    pub fn fetch(locator: impl Into<String>, message: impl ToString) -> Self {
        Self::Fetch {
            locator: locator.into(),
            message: message.to_string(),
        }
    }
}

impl From<image::ImageError> for ViewerError {
    fn from(err: image::ImageError) -> Self {
        Self::Snapshot(err.to_string())
    }
}

/// Result type alias for viewer operations.
pub type Result<T> = std::result::Result<T, ViewerError>;
