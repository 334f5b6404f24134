//! Error types for export actions.

use thiserror::Error;

/// Errors raised by export actions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    /// The requested DOI target is disabled in settings.
    #[error("publication target '{0}' is disabled")]
    TargetDisabled(&'static str),

    /// The action needs a backend that was not configured.
    #[error("{0} is not available")]
    Unavailable(&'static str),

    /// A route could not be built.
    #[error("invalid route: {0}")]
    Route(String),

    /// The image archive could not be written.
    #[error("archive error: {0}")]
    Archive(String),

    /// The output file could not be saved.
    #[error("failed to save {filename}: {message}")]
    Save {
        /// Requested filename.
        filename: String,
        /// I/O error description.
        message: String,
    },

    /// Copying to the clipboard failed.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// A background task panicked or was cancelled.
    #[error("export task failed: {0}")]
    Task(String),
}

impl ExportError {
    /// Returns a user-friendly error message suitable for display.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::TargetDisabled(_) => "Publishing to this service is not enabled.",
            Self::Unavailable(_) => "This export is not available here.",
            Self::Route(_) => "The export address is not valid. Check the base URL setting.",
            Self::Archive(_) => "Could not package the images.",
            Self::Save { .. } => "Could not save the file.",
            Self::Clipboard(_) => "Could not copy the reports to the clipboard.",
            Self::Task(_) => "An unexpected error occurred.",
        }
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ExportError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
