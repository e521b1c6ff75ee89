//! Structural comparator for dictlens.
//!
//! Compares two nested JSON-like values for approximate equality. Numbers
//! are compared with a combined absolute/relative tolerance that can be
//! overridden per path pattern; subtrees can be excluded by pattern or by
//! field name. The result is a single boolean. An optional trace sink
//! receives one message per comparison decision.
//!
//! # Key Types
//!
//! - [`RuleSet`] / [`ToleranceOverride`] -- Tolerances and ignore rules (serde, TOML/JSON)
//! - [`Comparator`] -- A compiled rule set, reusable across comparisons
//! - [`TraceSink`] -- Receiver for diagnostic messages ([`CollectingSink`], [`TracingSink`])
//! - [`Tolerance`] -- The combined absolute/relative threshold
//!
//! # Quick Start
//!
//! ```rust
//! use dictlens_compare::{compare, RuleSet};
//! use serde_json::json;
//!
//! let rules = RuleSet::new().with_abs_tol(0.1);
//! assert!(compare(&json!({"x": 1.0}), &json!({"x": 1.05}), &rules).unwrap());
//! assert!(!compare(&json!({"x": 1.0}), &json!({"x": 1.2}), &rules).unwrap());
//! ```

pub mod comparator;
pub mod error;
pub mod rules;
pub mod tolerance;
pub mod trace;

use serde_json::Value;

pub use comparator::{Comparator, ValueKind};
pub use error::{CompareError, CompareResult};
pub use rules::{RuleSet, ToleranceOverride};
pub use tolerance::{Tolerance, DEFAULT_ABS_TOL, DEFAULT_REL_TOL};
pub use trace::{CollectingSink, NoopSink, TraceSink, TracingSink, TRACE_TARGET};

/// Compare two values under `rules`.
///
/// All patterns are validated before any comparison work; an invalid
/// pattern is the only error. When `rules.trace` is set the decisions are
/// logged through `tracing`.
pub fn compare(a: &Value, b: &Value, rules: &RuleSet) -> CompareResult<bool> {
    Ok(Comparator::new(rules)?.compare(a, b))
}

/// Compare two values, sending one message per decision to `sink`.
pub fn compare_with_sink(
    a: &Value,
    b: &Value,
    rules: &RuleSet,
    sink: &dyn TraceSink,
) -> CompareResult<bool> {
    Ok(Comparator::new(rules)?.compare_traced(a, b, sink))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            (-1.0e6f64..1.0e6).prop_map(Value::from),
            "[a-z]{0,8}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 48, 5, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,4}", inner, 0..5)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    #[test]
    fn invalid_pattern_is_reported_before_comparing() {
        let sink = CollectingSink::new();
        let rules = RuleSet::new().ignore_path("$.items[0:3]");
        let x = json!({"x": 1});
        let err = compare_with_sink(&x, &x, &rules, &sink).unwrap_err();
        assert_eq!(err.pattern(), Some("$.items[0:3]"));
        assert!(sink.is_empty());
    }

    #[test]
    fn sink_receives_the_trace() {
        let sink = CollectingSink::new();
        let equal = compare_with_sink(
            &json!({"a": {"b": {"c": {"d": {"e": "deep"}}}}}),
            &json!({"a": {"b": {"c": {"d": {"e": "different"}}}}}),
            &RuleSet::new(),
            &sink,
        )
        .unwrap();
        assert!(!equal);
        assert!(sink.contains("$.a.b.c.d.e: value mismatch"));
    }

    proptest! {
        #[test]
        fn comparison_is_reflexive(value in arb_value()) {
            prop_assert!(compare(&value, &value, &RuleSet::new()).unwrap());
        }

        #[test]
        fn comparison_is_symmetric(a in arb_value(), b in arb_value(), tol in 0.0f64..10.0) {
            let rules = RuleSet::new().with_abs_tol(tol).with_rel_tol(tol / 100.0);
            prop_assert_eq!(
                compare(&a, &b, &rules).unwrap(),
                compare(&b, &a, &rules).unwrap()
            );
        }

        #[test]
        fn unmatched_ignore_path_changes_nothing(a in arb_value(), b in arb_value()) {
            // Generated keys are lowercase letters only.
            let rules = RuleSet::new();
            let with_ignore = RuleSet::new().ignore_path("$..NEVER_PRESENT");
            prop_assert_eq!(
                compare(&a, &b, &rules).unwrap(),
                compare(&a, &b, &with_ignore).unwrap()
            );
        }

        #[test]
        fn ignoring_the_only_difference_restores_equality(
            value in arb_value(),
            left in "[a-z]{1,6}",
            right in "[A-Z]{1,6}",
        ) {
            let a = json!({"payload": value.clone(), "diff": left});
            let b = json!({"payload": value, "diff": right});
            prop_assert!(!compare(&a, &b, &RuleSet::new()).unwrap());
            let ignore = RuleSet::new().ignore_path("$.diff");
            prop_assert!(compare(&a, &b, &ignore).unwrap());
        }
    }
}
