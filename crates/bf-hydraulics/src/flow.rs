//! Probable design flow from fixture-unit weights.

use bf_core::clamp_non_negative;

use crate::error::{HydraulicError, HydraulicResult};

/// Calibration of `Q = k · weight^exponent` (Q in L/s).
///
/// Project-wide constants, not physical ones. The defaults give the
/// usual `Q = 0.3 · √ΣP` for building supply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowParams {
    pub k: f64,
    pub exponent: f64,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            k: 0.3,
            exponent: 0.5,
        }
    }
}

impl FlowParams {
    /// `k >= 0` and `exponent > 0`, both finite.
    pub fn new(k: f64, exponent: f64) -> HydraulicResult<Self> {
        if !k.is_finite() || k < 0.0 {
            return Err(HydraulicError::InvalidArg {
                what: "flow coefficient k must be finite and >= 0",
            });
        }
        if !exponent.is_finite() || exponent <= 0.0 {
            return Err(HydraulicError::InvalidArg {
                what: "flow exponent must be finite and > 0",
            });
        }
        Ok(Self { k, exponent })
    }
}

/// Probable flow in L/s for a fixture-unit weight. Negative weights count as 0.
pub fn estimate_flow_lps(weight: f64, params: FlowParams) -> f64 {
    let weight = clamp_non_negative(weight);
    if weight == 0.0 {
        return 0.0;
    }
    params.k * weight.powf(params.exponent)
}
