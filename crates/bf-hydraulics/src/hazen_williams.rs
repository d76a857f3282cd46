//! Hazen-Williams correlation.

use bf_core::clamp_non_negative;
use bf_core::constants::GAMMA_KPA_PER_M;
use bf_core::units::{lps_to_m3ps, mm_to_m};

use crate::common::has_bore;
use crate::traits::HeadLossCorrelation;

/// `J = 10.67 · Q^1.852 / (C^1.852 · D^4.87)` with Q in m³/s and D in m,
/// giving metres of water per metre, converted to kPa/m with γ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazenWilliams {
    /// Roughness coefficient C
    pub c: f64,
}

impl HazenWilliams {
    pub fn new(c: f64) -> Self {
        Self { c }
    }
}

/// Gradient in kPa/m. 0 when `D <= 0` or `C <= 0`.
pub fn hazen_williams_kpa_per_m(flow_lps: f64, diameter_mm: f64, c: f64) -> f64 {
    if !has_bore(diameter_mm) || !(c.is_finite() && c > 0.0) {
        return 0.0;
    }
    let q = lps_to_m3ps(clamp_non_negative(flow_lps));
    let d = mm_to_m(diameter_mm);
    let j_m = 10.67 * q.powf(1.852) / (c.powf(1.852) * d.powf(4.87));
    j_m * GAMMA_KPA_PER_M
}

impl HeadLossCorrelation for HazenWilliams {
    fn name(&self) -> &str {
        "Hazen-Williams"
    }

    fn gradient_kpa_per_m(&self, flow_lps: f64, diameter_mm: f64) -> f64 {
        hazen_williams_kpa_per_m(flow_lps, diameter_mm, self.c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_value() {
        // 1 L/s through 25 mm PVC (C = 150)
        let q = 0.001_f64;
        let d = 0.025_f64;
        let expected = 10.67 * q.powf(1.852) / (150_f64.powf(1.852) * d.powf(4.87)) * 9.806_65;
        assert_relative_eq!(
            hazen_williams_kpa_per_m(1.0, 25.0, 150.0),
            expected,
            max_relative = 1e-12
        );
        // about 0.18 m/m
        assert!((1.5..2.0).contains(&expected));
    }

    #[test]
    fn zero_for_missing_bore_or_roughness() {
        assert_eq!(hazen_williams_kpa_per_m(1.0, 0.0, 150.0), 0.0);
        assert_eq!(hazen_williams_kpa_per_m(1.0, -10.0, 150.0), 0.0);
        assert_eq!(hazen_williams_kpa_per_m(1.0, 25.0, 0.0), 0.0);
        assert_eq!(hazen_williams_kpa_per_m(1.0, 25.0, -130.0), 0.0);
    }

    #[test]
    fn negative_flow_is_clamped() {
        assert_eq!(hazen_williams_kpa_per_m(-2.0, 25.0, 150.0), 0.0);
    }

    #[test]
    fn rougher_pipe_loses_more() {
        let smooth = HazenWilliams::new(150.0);
        let rough = HazenWilliams::new(100.0);
        assert!(rough.gradient_kpa_per_m(1.0, 32.0) > smooth.gradient_kpa_per_m(1.0, 32.0));
    }

    #[test]
    fn loss_scales_with_length() {
        let hw = HazenWilliams::new(140.0);
        let j = hw.gradient_kpa_per_m(0.8, 25.0);
        assert_relative_eq!(hw.loss_kpa(0.8, 25.0, 6.0), 6.0 * j);
    }
}
