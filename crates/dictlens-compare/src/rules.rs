//! Rule sets: tolerances, per-pattern overrides and ignore lists.

use serde::{Deserialize, Serialize};

use dictlens_path::validate_pattern;

use crate::error::{CompareError, CompareResult};
use crate::tolerance::{DEFAULT_ABS_TOL, DEFAULT_REL_TOL};

/// A tolerance that applies to numeric leaves selected by `pattern`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToleranceOverride {
    /// Path-query pattern selecting the leaves.
    pub pattern: String,
    /// Tolerance used instead of the global one.
    pub tolerance: f64,
}

impl ToleranceOverride {
    pub fn new(pattern: impl Into<String>, tolerance: f64) -> Self {
        Self {
            pattern: pattern.into(),
            tolerance,
        }
    }
}

/// Rules for one comparison: tolerances, overrides and ignore lists.
///
/// Overrides are kept in insertion order. When several override patterns
/// select the same path, the first one listed wins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Global absolute tolerance.
    pub abs_tol: f64,
    /// Global relative tolerance.
    pub rel_tol: f64,
    /// Patterns whose subtrees are not compared.
    pub ignore_paths: Vec<String>,
    /// Field names that are not compared, at any depth.
    pub ignore_fields: Vec<String>,
    /// Emit a trace through `tracing` when no sink is supplied.
    pub trace: bool,
    /// Per-pattern absolute tolerance overrides.
    pub abs_tol_fields: Vec<ToleranceOverride>,
    /// Per-pattern relative tolerance overrides.
    pub rel_tol_fields: Vec<ToleranceOverride>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            abs_tol: DEFAULT_ABS_TOL,
            rel_tol: DEFAULT_REL_TOL,
            ignore_paths: Vec::new(),
            ignore_fields: Vec::new(),
            trace: false,
            abs_tol_fields: Vec::new(),
            rel_tol_fields: Vec::new(),
        }
    }
}

impl RuleSet {
    /// Default rules: near-zero tolerances, nothing ignored.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the global absolute tolerance.
    pub fn with_abs_tol(mut self, abs_tol: f64) -> Self {
        self.abs_tol = abs_tol;
        self
    }

    /// Set the global relative tolerance.
    pub fn with_rel_tol(mut self, rel_tol: f64) -> Self {
        self.rel_tol = rel_tol;
        self
    }

    /// Append an absolute tolerance override.
    pub fn with_abs_tol_field(mut self, pattern: impl Into<String>, tolerance: f64) -> Self {
        self.abs_tol_fields.push(ToleranceOverride::new(pattern, tolerance));
        self
    }

    /// Append a relative tolerance override.
    pub fn with_rel_tol_field(mut self, pattern: impl Into<String>, tolerance: f64) -> Self {
        self.rel_tol_fields.push(ToleranceOverride::new(pattern, tolerance));
        self
    }

    /// Skip every subtree whose path matches `pattern`.
    pub fn ignore_path(mut self, pattern: impl Into<String>) -> Self {
        self.ignore_paths.push(pattern.into());
        self
    }

    /// Skip every field called `name`, at any depth.
    pub fn ignore_field(mut self, name: impl Into<String>) -> Self {
        self.ignore_fields.push(name.into());
        self
    }

    /// Log each comparison decision through `tracing`.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Every pattern in the rule set: ignore paths, then absolute
    /// overrides, then relative overrides.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.ignore_paths
            .iter()
            .map(String::as_str)
            .chain(self.abs_tol_fields.iter().map(|o| o.pattern.as_str()))
            .chain(self.rel_tol_fields.iter().map(|o| o.pattern.as_str()))
    }

    /// Validate every pattern, failing on the first invalid one.
    pub fn validate(&self) -> CompareResult<()> {
        for pattern in self.patterns() {
            validate_pattern(pattern)?;
        }
        Ok(())
    }

    /// Load rules from TOML. Overrides are arrays of tables:
    ///
    /// ```toml
    /// abs_tol = 0.1
    /// ignore_fields = ["timestamp"]
    ///
    /// [[abs_tol_fields]]
    /// pattern = "$.sensors[*].temp"
    /// tolerance = 0.5
    /// ```
    ///
    /// Patterns are validated after parsing.
    pub fn from_toml_str(s: &str) -> CompareResult<Self> {
        let rules: Self = toml::from_str(s).map_err(|e| CompareError::Config {
            format: "toml",
            message: e.to_string(),
        })?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load rules from JSON, with the same shape as the TOML form.
    pub fn from_json_str(s: &str) -> CompareResult<Self> {
        let rules: Self = serde_json::from_str(s).map_err(|e| CompareError::Config {
            format: "json",
            message: e.to_string(),
        })?;
        rules.validate()?;
        Ok(rules)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> CompareResult<String> {
        toml::to_string(self).map_err(|e| CompareError::Config {
            format: "toml",
            message: e.to_string(),
        })
    }
}
