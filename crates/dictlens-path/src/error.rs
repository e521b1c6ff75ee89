//! Error types for path patterns and concrete paths.

use thiserror::Error;

/// Errors that can occur while parsing patterns or concrete paths.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The pattern does not conform to the restricted path grammar.
    #[error("invalid path pattern {pattern:?}: {reason}")]
    Invalid { pattern: String, reason: String },

    /// A rendered concrete path could not be parsed back into segments.
    #[error("invalid concrete path {path:?}: {reason}")]
    InvalidConcretePath { path: String, reason: String },
}

impl PatternError {
    /// The offending pattern or path string.
    pub fn source_text(&self) -> &str {
        match self {
            PatternError::Invalid { pattern, .. } => pattern,
            PatternError::InvalidConcretePath { path, .. } => path,
        }
    }
}

/// Convenience type alias for pattern operations.
pub type Result<T> = std::result::Result<T, PatternError>;
