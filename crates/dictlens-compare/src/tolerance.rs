//! Combined absolute/relative numeric tolerance.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Default global absolute tolerance.
pub const DEFAULT_ABS_TOL: f64 = 1e-12;

/// Default global relative tolerance. Zero, so large integers such as ids
/// only compare equal when they are identical.
pub const DEFAULT_REL_TOL: f64 = 0.0;

/// The effective tolerance applied to one numeric leaf.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Maximum allowed raw difference.
    pub abs: f64,
    /// Maximum allowed difference as a fraction of the larger magnitude.
    pub rel: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            abs: DEFAULT_ABS_TOL,
            rel: DEFAULT_REL_TOL,
        }
    }
}

impl Tolerance {
    /// Create a tolerance from absolute and relative parts.
    pub fn new(abs: f64, rel: f64) -> Self {
        Self { abs, rel }
    }

    /// No tolerance at all: only identical values are equal.
    pub fn exact() -> Self {
        Self::new(0.0, 0.0)
    }

    /// The largest difference admitted between `a` and `b`.
    pub fn threshold(&self, a: f64, b: f64) -> f64 {
        self.abs.max(self.rel * a.abs().max(b.abs()))
    }

    /// `|a - b| <= max(abs, rel * max(|a|, |b|))`.
    ///
    /// The boundary is inclusive.
    pub fn admits(&self, a: f64, b: f64) -> bool {
        a == b || (a - b).abs() <= self.threshold(a, b)
    }

    /// Like [`Tolerance::admits`] for JSON numbers.
    ///
    /// Two integers are differenced exactly before the comparison, so the
    /// difference itself is never rounded. The threshold still scales with
    /// `rel`, which can admit distinct large integers.
    pub fn admits_numbers(&self, a: &Number, b: &Number) -> bool {
        let diff = difference(a, b);
        diff == 0.0 || diff <= self.threshold(to_f64(a), to_f64(b))
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "abs_tol={}, rel_tol={}", self.abs, self.rel)
    }
}

/// Absolute difference between two JSON numbers.
pub fn difference(a: &Number, b: &Number) -> f64 {
    match (as_i128(a), as_i128(b)) {
        (Some(x), Some(y)) => (x - y).unsigned_abs() as f64,
        _ => (to_f64(a) - to_f64(b)).abs(),
    }
}

fn as_i128(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn to_f64(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: serde_json::Value) -> Number {
        match v {
            serde_json::Value::Number(n) => n,
            other => panic!("not a number: {other}"),
        }
    }

    fn next_up(x: f64) -> f64 {
        f64::from_bits(x.to_bits() + 1)
    }

    #[test]
    fn absolute_tolerance_admits_small_differences() {
        let tol = Tolerance::new(0.1, 0.0);
        assert!(tol.admits(1.0, 1.05));
        assert!(!tol.admits(1.0, 1.2));
    }

    #[test]
    fn relative_tolerance_scales_with_magnitude() {
        let tol = Tolerance::new(0.0, 0.05);
        assert!(tol.admits(100.0, 104.0));
        assert!(!tol.admits(100.0, 106.0));
        assert!(!tol.admits(1.0, 1.06));
    }

    #[test]
    fn larger_of_the_two_thresholds_applies() {
        let tol = Tolerance::new(0.5, 0.01);
        assert_eq!(tol.threshold(1.0, 1.0), 0.5);
        assert_eq!(tol.threshold(1000.0, 1000.0), 10.0);
    }

    #[test]
    fn boundary_is_inclusive() {
        let tol = Tolerance::new(0.5, 0.0);
        assert!(tol.admits(1.0, 1.5));
        assert!(!tol.admits(1.0, next_up(1.5)));
    }

    #[test]
    fn threshold_is_symmetric() {
        let tol = Tolerance::new(0.01, 0.02);
        assert_eq!(tol.threshold(-3.0, 7.0), tol.threshold(7.0, -3.0));
        assert_eq!(tol.admits(2.0, 2.03), tol.admits(2.03, 2.0));
    }

    #[test]
    fn identical_values_pass_even_with_negative_tolerance() {
        let tol = Tolerance::new(-1.0, -1.0);
        assert!(tol.admits(3.0, 3.0));
        assert!(!tol.admits(3.0, 3.0000001));
    }

    #[test]
    fn integers_are_differenced_exactly() {
        let a = num(serde_json::json!(9_007_199_254_740_993_i64));
        let b = num(serde_json::json!(9_007_199_254_740_992_i64));
        assert_eq!(difference(&a, &b), 1.0);
        assert!(!Tolerance::exact().admits_numbers(&a, &b));
        assert!(Tolerance::new(1.0, 0.0).admits_numbers(&a, &b));
    }

    #[test]
    fn relative_tolerance_can_admit_distinct_large_integers() {
        let a = num(serde_json::json!(1_700_000_000_000_000_u64));
        let b = num(serde_json::json!(1_700_000_000_000_999_u64));
        assert!(!Tolerance::default().admits_numbers(&a, &b));
        assert!(Tolerance::new(0.0, 1e-12).admits_numbers(&a, &b));
    }

    #[test]
    fn mixed_integer_and_float_compare_numerically() {
        let a = num(serde_json::json!(1));
        let b = num(serde_json::json!(1.0));
        assert!(Tolerance::exact().admits_numbers(&a, &b));

        let c = num(serde_json::json!(u64::MAX));
        let d = num(serde_json::json!(-1));
        assert_eq!(difference(&c, &d), u64::MAX as f64 + 1.0);
    }

    #[test]
    fn display_names_both_parts() {
        assert_eq!(
            Tolerance::new(0.1, 0.0).to_string(),
            "abs_tol=0.1, rel_tol=0"
        );
    }
}
