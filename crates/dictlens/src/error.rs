//! Error types for the dictlens facade.

use thiserror::Error;

/// Errors from [`crate::Lens`] and the facade functions.
#[derive(Debug, Error)]
pub enum LensError {
    /// The rule set failed validation or could not be loaded.
    #[error(transparent)]
    Compare(#[from] dictlens_compare::CompareError),

    /// One side could not be serialized or parsed as JSON.
    #[error("{side} input could not be converted to a value: {source}")]
    Input {
        /// `"left"` or `"right"`.
        side: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl LensError {
    /// The offending pattern, if a rule failed validation.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            LensError::Compare(err) => err.pattern(),
            LensError::Input { .. } => None,
        }
    }
}

/// Result alias for the facade.
pub type LensResult<T> = Result<T, LensError>;
