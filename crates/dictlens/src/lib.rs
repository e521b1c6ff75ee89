//! Approximate structural equality for nested records.
//!
//! dictlens compares two nested values (mappings, sequences, numbers,
//! strings, booleans, null) and answers a single question: are they equal
//! within the given rules? Rules are global and per-path numeric
//! tolerances plus ignore lists addressed by a restricted path syntax
//! (`$.a.b[0].c`, `$.rows[*].at`, `$..timestamp`).
//!
//! This crate re-exports the path matcher ([`dictlens_path`]) and the
//! comparator ([`dictlens_compare`]) and adds [`Lens`] for comparing
//! serializable types and JSON text.
//!
//! # Quick Start
//!
//! ```rust
//! use dictlens::{compare_dicts, RuleSet};
//! use serde_json::json;
//!
//! let a = json!({"a": {"ts": "T1", "v": 1}});
//! let b = json!({"a": {"ts": "T2", "v": 1}});
//! let rules = RuleSet::new().ignore_field("ts");
//! assert!(compare_dicts(&a, &b, &rules).unwrap());
//! ```

pub mod error;
pub mod lens;

pub use error::{LensError, LensResult};
pub use lens::Lens;

pub use dictlens_compare::{
    compare, compare_with_sink, CollectingSink, Comparator, CompareError, CompareResult,
    NoopSink, RuleSet, Tolerance, ToleranceOverride, TraceSink, TracingSink, ValueKind,
    DEFAULT_ABS_TOL, DEFAULT_REL_TOL,
};
pub use dictlens_path::{
    matches, validate_pattern, FieldPath, PathSegment, Pattern, PatternError, PatternSegment,
};

use serde_json::Value;

/// Compare two records under `rules`.
///
/// Every pattern in the rule set is validated first; an invalid pattern is
/// the only error. Any difference (kinds, keys, lengths, values) yields
/// `Ok(false)`.
pub fn compare_dicts(a: &Value, b: &Value, rules: &RuleSet) -> CompareResult<bool> {
    compare(a, b, rules)
}
