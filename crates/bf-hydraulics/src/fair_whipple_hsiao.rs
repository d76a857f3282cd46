//! Fair-Whipple-Hsiao correlation for small-bore building supply.

use bf_core::clamp_non_negative;

use crate::common::has_bore;
use crate::model::Material;
use crate::traits::HeadLossCorrelation;

/// Gradient directly in kPa/m with Q in L/s and D in mm:
///
/// - PVC: `J = 8.695e6 · Q^1.75 / D^4.75`
/// - cast iron: `J = 20.2e6 · Q^1.88 / D^4.88`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FairWhippleHsiao {
    pub material: Material,
}

impl FairWhippleHsiao {
    pub fn new(material: Material) -> Self {
        Self { material }
    }
}

/// Gradient in kPa/m. 0 when `D <= 0`.
pub fn fair_whipple_hsiao_kpa_per_m(flow_lps: f64, diameter_mm: f64, material: Material) -> f64 {
    if !has_bore(diameter_mm) {
        return 0.0;
    }
    let q = clamp_non_negative(flow_lps);
    match material {
        Material::Pvc => 8.695e6 * q.powf(1.75) / diameter_mm.powf(4.75),
        Material::CastIron => 20.2e6 * q.powf(1.88) / diameter_mm.powf(4.88),
    }
}

impl HeadLossCorrelation for FairWhippleHsiao {
    fn name(&self) -> &str {
        "Fair-Whipple-Hsiao"
    }

    fn gradient_kpa_per_m(&self, flow_lps: f64, diameter_mm: f64) -> f64 {
        fair_whipple_hsiao_kpa_per_m(flow_lps, diameter_mm, self.material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pvc_reference_value() {
        let expected = 8.695e6 * 1.0_f64.powf(1.75) / 25.0_f64.powf(4.75);
        assert_relative_eq!(
            fair_whipple_hsiao_kpa_per_m(1.0, 25.0, Material::Pvc),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn cast_iron_uses_its_own_exponents() {
        let q = 0.5_f64;
        let d = 50.0_f64;
        let expected = 20.2e6 * q.powf(1.88) / d.powf(4.88);
        assert_relative_eq!(
            fair_whipple_hsiao_kpa_per_m(q, d, Material::CastIron),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn zero_for_missing_bore() {
        for material in [Material::Pvc, Material::CastIron] {
            assert_eq!(fair_whipple_hsiao_kpa_per_m(3.0, 0.0, material), 0.0);
            assert_eq!(fair_whipple_hsiao_kpa_per_m(3.0, -1.0, material), 0.0);
        }
    }

    #[test]
    fn negative_flow_is_clamped() {
        assert_eq!(fair_whipple_hsiao_kpa_per_m(-1.0, 25.0, Material::Pvc), 0.0);
    }
}
