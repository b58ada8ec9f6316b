//! Fuzzy floating point comparison.
//!
//! Every threshold test in the crate (`distance <= epsilon`, parameter
//! snapping, discriminant signs) goes through a [`Tolerance`] so the slack
//! is configured in one place instead of being scattered as literals.
//! NaN never compares as equal, less or greater: all predicates return
//! `false` for it.

use serde::{Deserialize, Serialize};

/// Default absolute slack.
pub const DEFAULT_DELTA: f64 = 1e-6;

/// Absolute tolerance used for floating point comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub delta: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            delta: DEFAULT_DELTA,
        }
    }
}

impl Tolerance {
    pub const fn new(delta: f64) -> Self {
        Self { delta }
    }

    /// `|a - b| <= delta`.
    #[inline]
    pub fn eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.delta
    }

    /// `a <= b` allowing `delta` of slack.
    #[inline]
    pub fn leq(&self, a: f64, b: f64) -> bool {
        a <= b + self.delta
    }

    /// Sign of `a` with everything within `delta` of zero reported as 0.
    /// Returns `None` for NaN.
    pub fn sign(&self, a: f64) -> Option<i8> {
        if a.is_nan() {
            None
        } else if self.eq(a, 0.0) {
            Some(0)
        } else if a < 0.0 {
            Some(-1)
        } else {
            Some(1)
        }
    }

    /// Snap a segment parameter onto 0 or 1 when it lies within `delta`.
    #[inline]
    pub fn snap_unit(&self, t: f64) -> f64 {
        if self.eq(t, 0.0) {
            0.0
        } else if self.eq(t, 1.0) {
            1.0
        } else {
            t
        }
    }

    /// Whether `t` lies in `[0, 1]` (after snapping).
    #[inline]
    pub fn in_unit(&self, t: f64) -> bool {
        (0.0..=1.0).contains(&t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_never_compares() {
        let tol = Tolerance::default();
        assert!(!tol.leq(f64::NAN, 1.0));
        assert!(!tol.eq(f64::NAN, f64::NAN));
        assert_eq!(tol.sign(f64::NAN), None);
    }

    #[test]
    fn test_slack() {
        let tol = Tolerance::new(1e-3);
        assert!(tol.leq(1.0005, 1.0));
        assert!(!tol.leq(1.01, 1.0));
        assert!(tol.eq(0.9995, 1.0));
        assert_eq!(tol.sign(-5e-4), Some(0));
        assert_eq!(tol.sign(-1.0), Some(-1));
    }

    #[test]
    fn test_snap_unit() {
        let tol = Tolerance::default();
        assert_eq!(tol.snap_unit(1e-9), 0.0);
        assert_eq!(tol.snap_unit(1.0 - 1e-9), 1.0);
        assert_eq!(tol.snap_unit(0.5), 0.5);
        assert!(!tol.in_unit(-0.1));
    }
}
