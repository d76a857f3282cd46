//! Common utilities for hydraulic calculations.

use bf_core::clamp_non_negative;
use bf_core::units::{lps_to_m3ps, mm_to_m};

/// Flows below this (L/s) are treated as no flow.
pub const EPSILON_FLOW_LPS: f64 = 1e-12;

/// Diameters at or below this (mm) carry no flow.
pub const EPSILON_DIAMETER_MM: f64 = 0.0;

/// True for a finite diameter above zero.
pub fn has_bore(diameter_mm: f64) -> bool {
    diameter_mm.is_finite() && diameter_mm > EPSILON_DIAMETER_MM
}

/// Mean velocity `Q / (π D² / 4)` in m/s; 0 when `Q <= 0` or `D <= 0`.
pub fn velocity_mps(flow_lps: f64, diameter_mm: f64) -> f64 {
    let flow_lps = clamp_non_negative(flow_lps);
    if flow_lps <= EPSILON_FLOW_LPS || !has_bore(diameter_mm) {
        return 0.0;
    }
    let d_m = mm_to_m(diameter_mm);
    let area = std::f64::consts::PI * d_m * d_m / 4.0;
    lps_to_m3ps(flow_lps) / area
}
