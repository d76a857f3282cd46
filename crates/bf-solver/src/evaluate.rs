//! Hydraulics of a single segment.

use bf_core::constants::{GAMMA_KPA_PER_M, kpa_to_head_m};
use bf_graph::Segment;
use bf_hydraulics::{HeadLossCorrelation, estimate_flow_lps, velocity_mps};

use crate::problem::PropagationParams;
use crate::report::SegmentResult;

/// Outlet state of `segment` for a given inlet pressure.
///
/// `p_out = p_in + γ·Δz − J·L − J·Leq`
pub(crate) fn evaluate_segment(
    segment: &Segment,
    p_in_kpa: f64,
    params: &PropagationParams,
) -> SegmentResult {
    let flow_lps = estimate_flow_lps(segment.fixture_unit_weight, params.flow);
    let velocity = velocity_mps(flow_lps, segment.nominal_diameter_mm);
    let gradient = params
        .model
        .gradient_kpa_per_m(flow_lps, segment.nominal_diameter_mm);

    let model = &params.model;
    let diameter = segment.nominal_diameter_mm;
    let hf_cont_kpa = model.loss_kpa(flow_lps, diameter, segment.real_length_m);
    let hf_loc_kpa = model.loss_kpa(flow_lps, diameter, segment.equivalent_length_m);
    let p_disp_kpa = GAMMA_KPA_PER_M * segment.elevation_drop_m;
    let p_out_kpa = p_in_kpa + p_disp_kpa - hf_cont_kpa - hf_loc_kpa;

    SegmentResult {
        segment_id: segment.id.clone(),
        flow_lps,
        velocity_mps: velocity,
        gradient_kpa_per_m: gradient,
        p_in_kpa,
        hf_cont_kpa,
        hf_loc_kpa,
        p_disp_kpa,
        p_out_kpa,
        p_out_mwc: kpa_to_head_m(p_out_kpa),
        margin_kpa: p_out_kpa - segment.min_pressure_kpa,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bf_graph::{CapacityMap, ConnectionType, LabelMode, SegmentDraft, SegmentSet};
    use bf_hydraulics::{HeadLossModel, HwCoefficients, HeadLossKind, Material};

    fn segment(weight: f64, drop_m: f64, length_m: f64, leq_m: f64) -> Segment {
        let mut set = SegmentSet::new();
        let mut draft = SegmentDraft::new("A", "B", ConnectionType::Entry);
        draft.id = "t1".into();
        draft.nominal_diameter_mm = 25.0;
        draft.real_length_m = length_m;
        draft.elevation_drop_m = drop_m;
        draft.fixture_unit_weight = weight;
        draft.min_pressure_kpa = 10.0;
        set.register(draft, LabelMode::Letters, &CapacityMap::default())
            .unwrap();
        set.set_equivalent_length("t1", leq_m).unwrap();
        set.get("t1").unwrap().clone()
    }

    #[test]
    fn zero_flow_only_changes_elevation_head() {
        let seg = segment(0.0, 3.0, 12.0, 4.0);
        let r = evaluate_segment(&seg, 50.0, &PropagationParams::default());
        assert_eq!(r.flow_lps, 0.0);
        assert_eq!(r.hf_cont_kpa, 0.0);
        assert_eq!(r.hf_loc_kpa, 0.0);
        assert_relative_eq!(r.p_out_kpa, 50.0 + 3.0 * GAMMA_KPA_PER_M, epsilon = 1e-12);
        assert_relative_eq!(r.margin_kpa, r.p_out_kpa - 10.0, epsilon = 1e-12);
    }

    #[test]
    fn losses_split_between_real_and_equivalent_length() {
        let seg = segment(4.0, 0.0, 10.0, 5.0);
        let r = evaluate_segment(&seg, 100.0, &PropagationParams::default());
        assert_relative_eq!(r.flow_lps, 0.6, epsilon = 1e-12);
        assert!(r.gradient_kpa_per_m > 0.0);
        assert_relative_eq!(r.hf_cont_kpa, 2.0 * r.hf_loc_kpa, epsilon = 1e-12);
        assert_relative_eq!(
            r.p_out_kpa,
            100.0 - r.hf_cont_kpa - r.hf_loc_kpa,
            epsilon = 1e-12
        );
        assert_relative_eq!(r.p_out_mwc, r.p_out_kpa / GAMMA_KPA_PER_M, epsilon = 1e-12);
    }

    #[test]
    fn model_choice_changes_gradient() {
        let seg = segment(4.0, 0.0, 10.0, 0.0);
        let hw = PropagationParams::default();
        let fwh = PropagationParams {
            model: HeadLossModel::select(
                HeadLossKind::FairWhippleHsiao,
                Material::Pvc,
                &HwCoefficients::default(),
            ),
            ..PropagationParams::default()
        };
        let a = evaluate_segment(&seg, 100.0, &hw);
        let b = evaluate_segment(&seg, 100.0, &fwh);
        assert_ne!(a.gradient_kpa_per_m, b.gradient_kpa_per_m);
    }
}
