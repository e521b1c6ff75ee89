//! Path matching for dictlens.
//!
//! Validates restricted path-query patterns and decides whether a concrete
//! traversal path is selected by a pattern. Everything here is a pure
//! function over strings and segments; nothing inspects compared data.
//!
//! # Key Types
//!
//! - [`Pattern`] / [`PatternSegment`] -- A validated pattern (`$.a.b[*].c`, `$..z`)
//! - [`FieldPath`] / [`PathSegment`] -- A concrete path produced during traversal
//! - [`PatternError`] -- Raised for malformed patterns, naming the pattern
//!
//! # Example
//!
//! ```rust
//! use dictlens_path::{matches, validate_pattern};
//!
//! validate_pattern("$.a.b[*].c").unwrap();
//! assert!(matches("$.a.b[*].c", "$.a.b[3].c"));
//! assert!(matches("$..z", "$.x.y.z"));
//! assert!(validate_pattern("$.items[0:3]").is_err());
//! ```

pub mod error;
pub mod pattern;
pub mod segment;

pub use error::{PatternError, Result};
pub use pattern::{matches, matches_field_name, validate_pattern, Pattern, PatternSegment};
pub use segment::{FieldPath, PathSegment, ROOT};
