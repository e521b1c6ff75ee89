//! Error types for the comparator crate.

use dictlens_path::PatternError;

/// Errors that can occur while building or loading a rule set.
///
/// Mismatches between compared values are never errors; they are reported
/// as `false`.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// A pattern in `ignore_paths`, `abs_tol_fields` or `rel_tol_fields`
    /// failed validation.
    #[error(transparent)]
    InvalidPattern(#[from] PatternError),

    /// A rule set could not be deserialized.
    #[error("invalid rule set ({format}): {message}")]
    Config {
        format: &'static str,
        message: String,
    },
}

impl CompareError {
    /// The offending pattern, if this is a pattern error.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            CompareError::InvalidPattern(err) => Some(err.source_text()),
            CompareError::Config { .. } => None,
        }
    }
}

/// Convenience alias for comparator results.
pub type CompareResult<T> = Result<T, CompareError>;
