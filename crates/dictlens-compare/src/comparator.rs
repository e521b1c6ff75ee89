//! Recursive structural comparison.
//!
//! Both values are walked in lock-step from the root `$`. At every node the
//! ignore rules are consulted first, then kinds are checked, then mappings,
//! sequences, numbers and scalars are compared. Traversal continues past a
//! mismatch so the trace shows every difference; the verdict is the
//! conjunction over all nodes visited.

use std::collections::HashSet;
use std::fmt;

use serde_json::{Map, Number, Value};
use tracing::debug;

use dictlens_path::{FieldPath, PathSegment, Pattern};

use crate::error::CompareResult;
use crate::rules::{RuleSet, ToleranceOverride};
use crate::tolerance::Tolerance;
use crate::trace::{TraceSink, TracingSink};

/// The kind of a value, as far as comparison is concerned.
///
/// Integers and floats share [`ValueKind::Number`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Mapping,
    Sequence,
    Number,
    Boolean,
    String,
    Null,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => ValueKind::Mapping,
            Value::Array(_) => ValueKind::Sequence,
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Boolean,
            Value::String(_) => ValueKind::String,
            Value::Null => ValueKind::Null,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Mapping => "mapping",
            ValueKind::Sequence => "sequence",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::String => "string",
            ValueKind::Null => "null",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule set with every pattern parsed, ready to compare many pairs.
///
/// # Example
///
/// ```rust
/// use dictlens_compare::{Comparator, RuleSet};
/// use serde_json::json;
///
/// let rules = RuleSet::new().with_abs_tol(0.1).ignore_field("ts");
/// let comparator = Comparator::new(&rules).unwrap();
/// assert!(comparator.compare(
///     &json!({"x": 1.0, "ts": "T1"}),
///     &json!({"x": 1.05, "ts": "T2"}),
/// ));
/// ```
#[derive(Clone, Debug)]
pub struct Comparator {
    ignore_paths: Vec<Pattern>,
    ignore_fields: HashSet<String>,
    global: Tolerance,
    abs_overrides: Vec<(Pattern, f64)>,
    rel_overrides: Vec<(Pattern, f64)>,
    trace: bool,
}

impl Comparator {
    /// Validate and compile a rule set.
    ///
    /// Every pattern in `ignore_paths`, `abs_tol_fields` and
    /// `rel_tol_fields` is parsed here, before any comparison work.
    pub fn new(rules: &RuleSet) -> CompareResult<Self> {
        let ignore_paths = rules
            .ignore_paths
            .iter()
            .map(|p| Pattern::parse(p))
            .collect::<Result<Vec<_>, _>>()?;
        let abs_overrides = compile_overrides(&rules.abs_tol_fields)?;
        let rel_overrides = compile_overrides(&rules.rel_tol_fields)?;

        debug!(
            ignore_paths = ignore_paths.len(),
            ignore_fields = rules.ignore_fields.len(),
            abs_overrides = abs_overrides.len(),
            rel_overrides = rel_overrides.len(),
            abs_tol = rules.abs_tol,
            rel_tol = rules.rel_tol,
            "compiled comparison rules"
        );

        Ok(Self {
            ignore_paths,
            ignore_fields: rules.ignore_fields.iter().cloned().collect(),
            global: Tolerance::new(rules.abs_tol, rules.rel_tol),
            abs_overrides,
            rel_overrides,
            trace: rules.trace,
        })
    }

    /// Compare two values.
    ///
    /// Traces through `tracing` when the rule set asked for a trace.
    pub fn compare(&self, a: &Value, b: &Value) -> bool {
        if self.trace {
            self.walk(a, b, Some(&TracingSink))
        } else {
            self.walk(a, b, None)
        }
    }

    /// Compare two values, sending a message per decision to `sink`.
    pub fn compare_traced(&self, a: &Value, b: &Value, sink: &dyn TraceSink) -> bool {
        self.walk(a, b, Some(sink))
    }

    /// Whether the node at `path` is skipped.
    pub fn is_ignored(&self, path: &FieldPath) -> bool {
        path.last_field()
            .is_some_and(|name| self.ignore_fields.contains(name))
            || self.ignore_paths.iter().any(|p| p.matches_path(path))
    }

    /// The tolerance applied to a numeric leaf at `path`.
    ///
    /// Absolute and relative parts resolve independently: the first
    /// matching override wins, otherwise the global value applies.
    pub fn tolerance_for(&self, path: &FieldPath) -> Tolerance {
        Tolerance::new(
            first_match(&self.abs_overrides, path).unwrap_or(self.global.abs),
            first_match(&self.rel_overrides, path).unwrap_or(self.global.rel),
        )
    }

    fn walk(&self, a: &Value, b: &Value, sink: Option<&dyn TraceSink>) -> bool {
        let mut walk = Walk {
            comparator: self,
            sink,
            path: FieldPath::root(),
        };
        let equal = walk.node(a, b);
        walk.emit(|| format!("verdict: {}", if equal { "equal" } else { "not equal" }));
        equal
    }
}

fn compile_overrides(overrides: &[ToleranceOverride]) -> CompareResult<Vec<(Pattern, f64)>> {
    overrides
        .iter()
        .map(|o| -> CompareResult<(Pattern, f64)> {
            Ok((Pattern::parse(&o.pattern)?, o.tolerance))
        })
        .collect()
}

fn first_match(overrides: &[(Pattern, f64)], path: &FieldPath) -> Option<f64> {
    overrides
        .iter()
        .find(|(pattern, _)| pattern.matches_path(path))
        .map(|(_, tolerance)| *tolerance)
}

/// State of one comparison: the current path and where messages go.
struct Walk<'a> {
    comparator: &'a Comparator,
    sink: Option<&'a dyn TraceSink>,
    path: FieldPath,
}

impl Walk<'_> {
    /// Messages are only formatted when a sink is present.
    fn emit(&self, message: impl FnOnce() -> String) {
        if let Some(sink) = self.sink {
            sink.emit(&message());
        }
    }

    fn node(&mut self, a: &Value, b: &Value) -> bool {
        if self.comparator.is_ignored(&self.path) {
            self.emit(|| format!("{}: ignored path", self.path));
            return true;
        }

        let (kind_a, kind_b) = (ValueKind::of(a), ValueKind::of(b));
        if kind_a != kind_b {
            self.emit(|| format!("{}: type mismatch ({kind_a} vs {kind_b})", self.path));
            return false;
        }

        match (a, b) {
            (Value::Object(a), Value::Object(b)) => self.mappings(a, b),
            (Value::Array(a), Value::Array(b)) => self.sequences(a, b),
            (Value::Number(a), Value::Number(b)) => self.numbers(a, b),
            _ => self.scalars(a, b),
        }
    }

    fn child(&mut self, segment: PathSegment, a: &Value, b: &Value) -> bool {
        self.path.push(segment);
        let equal = self.node(a, b);
        self.path.pop();
        equal
    }

    fn mappings(&mut self, a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
        let only_a: Vec<&str> = a
            .keys()
            .filter(|k| !b.contains_key(k.as_str()))
            .map(String::as_str)
            .collect();
        let only_b: Vec<&str> = b
            .keys()
            .filter(|k| !a.contains_key(k.as_str()))
            .map(String::as_str)
            .collect();

        let mut equal = only_a.is_empty() && only_b.is_empty();
        if equal {
            self.emit(|| format!("{}: keys match ({} keys)", self.path, a.len()));
        } else {
            self.emit(|| {
                format!(
                    "{}: key mismatch, only in left: {only_a:?}, only in right: {only_b:?}",
                    self.path
                )
            });
        }

        for (key, value_a) in a {
            if let Some(value_b) = b.get(key) {
                equal &= self.child(PathSegment::Field(key.clone()), value_a, value_b);
            }
        }
        equal
    }

    fn sequences(&mut self, a: &[Value], b: &[Value]) -> bool {
        if a.len() != b.len() {
            self.emit(|| {
                format!(
                    "{}: length mismatch ({} vs {})",
                    self.path,
                    a.len(),
                    b.len()
                )
            });
            return false;
        }
        self.emit(|| format!("{}: length {} matches", self.path, a.len()));

        let mut equal = true;
        for (index, (value_a, value_b)) in a.iter().zip(b).enumerate() {
            equal &= self.child(PathSegment::Index(index), value_a, value_b);
        }
        equal
    }

    fn numbers(&self, a: &Number, b: &Number) -> bool {
        let tolerance = self.comparator.tolerance_for(&self.path);
        let equal = tolerance.admits_numbers(a, b);
        if equal {
            self.emit(|| format!("{}: {a} ~= {b} ({tolerance})", self.path));
        } else {
            self.emit(|| format!("{}: numeric mismatch {a} vs {b} ({tolerance})", self.path));
        }
        equal
    }

    fn scalars(&self, a: &Value, b: &Value) -> bool {
        let equal = a == b;
        if equal {
            self.emit(|| format!("{}: {a} == {b}", self.path));
        } else {
            self.emit(|| format!("{}: value mismatch {a} vs {b}", self.path));
        }
        equal
    }
}
