//! Error types for the report data model.

use thiserror::Error;

/// Errors raised while building model values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// Element symbol is empty, too long, or not alphabetic.
    #[error("invalid element symbol: {0:?}")]
    InvalidElement(String),

    /// A coordinate field could not be parsed as a number.
    #[error("invalid coordinate on line {line}: {value:?}")]
    InvalidCoordinate {
        /// 1-based line number in the source text.
        line: usize,
        /// Raw field text.
        value: String,
    },

    /// The structure text contained no atom records.
    #[error("structure contains no atoms")]
    EmptyStructure,

    /// Session identifier is not a UUID.
    #[error("invalid session id: {0}")]
    InvalidSessionId(String),
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
