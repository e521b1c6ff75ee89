//! High-level entry point: a compiled rule set with an optional trace sink.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use dictlens_compare::{Comparator, RuleSet, TraceSink};

use crate::error::{LensError, LensResult};

/// Compares values, serializable types and JSON text under one rule set.
#[derive(Clone)]
pub struct Lens {
    comparator: Comparator,
    sink: Option<Arc<dyn TraceSink>>,
}

impl Lens {
    /// Validate and compile `rules`.
    pub fn new(rules: &RuleSet) -> LensResult<Self> {
        Ok(Self {
            comparator: Comparator::new(rules)?,
            sink: None,
        })
    }

    /// Load rules from TOML and compile them.
    pub fn from_toml_str(s: &str) -> LensResult<Self> {
        Self::new(&RuleSet::from_toml_str(s)?)
    }

    /// Send every comparison's trace to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// The compiled rules.
    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    /// Compare two values, tracing to the attached sink if there is one.
    pub fn compare(&self, a: &Value, b: &Value) -> bool {
        match &self.sink {
            Some(sink) => self.comparator.compare_traced(a, b, &**sink),
            None => self.comparator.compare(a, b),
        }
    }

    /// Compare any two serializable values by their JSON data model.
    pub fn compare_serialize<A, B>(&self, a: &A, b: &B) -> LensResult<bool>
    where
        A: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let a = serde_json::to_value(a).map_err(|source| LensError::Input {
            side: "left",
            source,
        })?;
        let b = serde_json::to_value(b).map_err(|source| LensError::Input {
            side: "right",
            source,
        })?;
        Ok(self.compare(&a, &b))
    }

    /// Compare two JSON documents.
    pub fn compare_json_str(&self, a: &str, b: &str) -> LensResult<bool> {
        let a: Value = serde_json::from_str(a).map_err(|source| LensError::Input {
            side: "left",
            source,
        })?;
        let b: Value = serde_json::from_str(b).map_err(|source| LensError::Input {
            side: "right",
            source,
        })?;
        Ok(self.compare(&a, &b))
    }
}

impl fmt::Debug for Lens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lens")
            .field("comparator", &self.comparator)
            .field("traced", &self.sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dictlens_compare::CollectingSink;
    use serde_json::json;

    #[derive(Serialize)]
    struct Reading {
        sensor: &'static str,
        celsius: f64,
        taken_at: &'static str,
    }

    #[test]
    fn compares_serializable_structs() {
        let rules = RuleSet::new().with_abs_tol(0.2).ignore_field("taken_at");
        let lens = Lens::new(&rules).unwrap();
        let before = Reading {
            sensor: "t1",
            celsius: 21.4,
            taken_at: "10:00",
        };
        let after = Reading {
            sensor: "t1",
            celsius: 21.5,
            taken_at: "10:05",
        };
        assert!(lens.compare_serialize(&before, &after).unwrap());
    }

    #[test]
    fn compares_json_text() {
        let lens = Lens::new(&RuleSet::new()).unwrap();
        let spaced = r#"{"a": [1, 2]}"#;
        let compact = r#"{"a":[1,2]}"#;
        assert!(lens.compare_json_str(spaced, compact).unwrap());

        let one = r#"{"a": 1}"#;
        let two = r#"{"a": 2}"#;
        assert!(!lens.compare_json_str(one, two).unwrap());
    }

    #[test]
    fn malformed_json_names_the_side() {
        let lens = Lens::new(&RuleSet::new()).unwrap();
        let err = lens.compare_json_str("{}", "{").unwrap_err();
        assert!(matches!(err, LensError::Input { side: "right", .. }));
        assert_eq!(err.pattern(), None);
    }

    #[test]
    fn rules_load_from_toml() {
        let lens = Lens::from_toml_str(
            r#"
            [[rel_tol_fields]]
            pattern = "$..price"
            tolerance = 0.1
            "#,
        )
        .unwrap();
        assert!(lens.compare(&json!({"price": 100}), &json!({"price": 105})));

        let text = r#"ignore_paths = ["$.a[1,2]"]"#;
        let err = Lens::from_toml_str(text).unwrap_err();
        assert_eq!(err.pattern(), Some("$.a[1,2]"));
    }

    #[test]
    fn attached_sink_sees_each_comparison() {
        let sink = Arc::new(CollectingSink::new());
        let lens = Lens::new(&RuleSet::new()).unwrap();
        let lens = lens.with_sink(sink.clone());
        assert!(!lens.compare(&json!({"s": "a"}), &json!({"s": "b"})));
        assert!(lens.compare(&json!({"s": "a"}), &json!({"s": "a"})));
        assert!(sink.contains("$.s: value mismatch"));
        let messages = sink.messages();
        let verdicts = messages.iter().filter(|m| m.starts_with("verdict"));
        assert_eq!(verdicts.count(), 2);
    }
}
