//! Property tests shared by both head-loss correlations.

use bf_hydraulics::{
    FairWhippleHsiao, FlowParams, HazenWilliams, HeadLossCorrelation, Material,
    estimate_flow_lps, velocity_mps,
};
use proptest::prelude::*;

fn correlations() -> Vec<Box<dyn HeadLossCorrelation>> {
    vec![
        Box::new(HazenWilliams::new(150.0)),
        Box::new(HazenWilliams::new(130.0)),
        Box::new(FairWhippleHsiao::new(Material::Pvc)),
        Box::new(FairWhippleHsiao::new(Material::CastIron)),
    ]
}

#[test]
fn zero_flow_has_zero_gradient() {
    for model in correlations() {
        assert_eq!(model.gradient_kpa_per_m(0.0, 25.0), 0.0, "{}", model.name());
    }
}

#[test]
fn larger_bore_loses_less() {
    for model in correlations() {
        let narrow = model.gradient_kpa_per_m(1.0, 20.0);
        let wide = model.gradient_kpa_per_m(1.0, 50.0);
        assert!(wide < narrow, "{}", model.name());
    }
}

proptest! {
    #[test]
    fn non_positive_diameter_gives_zero_gradient(
        flow in -10.0_f64..10.0,
        diameter in -500.0_f64..=0.0,
    ) {
        for model in correlations() {
            prop_assert_eq!(model.gradient_kpa_per_m(flow, diameter), 0.0);
        }
    }

    #[test]
    fn gradient_is_non_negative_and_monotone_in_flow(
        q1 in 0.0_f64..20.0,
        dq in 0.0_f64..20.0,
        diameter in 10.0_f64..300.0,
    ) {
        let q2 = q1 + dq;
        for model in correlations() {
            let j1 = model.gradient_kpa_per_m(q1, diameter);
            let j2 = model.gradient_kpa_per_m(q2, diameter);
            prop_assert!(j1 >= 0.0);
            prop_assert!(j2 >= j1, "{}: J({}) = {} > J({}) = {}", model.name(), q1, j1, q2, j2);
        }
    }

    #[test]
    fn flow_is_non_negative(weight in -100.0_f64..1000.0) {
        prop_assert!(estimate_flow_lps(weight, FlowParams::default()) >= 0.0);
    }

    #[test]
    fn velocity_is_non_negative(flow in -10.0_f64..10.0, diameter in -50.0_f64..300.0) {
        prop_assert!(velocity_mps(flow, diameter) >= 0.0);
    }
}
