use crate::BfError;

/// Floating point type used throughout the workspace
pub type Real = f64;

/// Pressures closer than this (kPa) are the same pressure.
pub const PRESSURE_EPS_KPA: Real = 1e-6;

/// Absolute and relative tolerance for float comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, BfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(BfError::NonFinite { what, value: v })
    }
}

/// Negative and NaN inputs become 0.
pub fn clamp_non_negative(v: Real) -> Real {
    if v > 0.0 { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn clamp_handles_nan_and_negatives() {
        assert_eq!(clamp_non_negative(-3.0), 0.0);
        assert_eq!(clamp_non_negative(Real::NAN), 0.0);
        assert_eq!(clamp_non_negative(4.0), 4.0);
    }
}
