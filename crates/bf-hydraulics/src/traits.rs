//! Core trait for head-loss correlations.

/// An empirical correlation giving the hydraulic gradient of a full pipe.
///
/// Correlations are pure functions of flow and diameter so the propagation
/// engine can call them in any order and get bit-identical results.
pub trait HeadLossCorrelation: Send + Sync {
    /// Correlation name for logs and reports.
    fn name(&self) -> &str;

    /// Hydraulic gradient in kPa per metre of pipe.
    ///
    /// # Arguments
    /// * `flow_lps` - Flow in L/s; negative values are treated as 0
    /// * `diameter_mm` - Internal diameter in mm
    ///
    /// Returns 0 for `diameter_mm <= 0`, whatever the flow.
    fn gradient_kpa_per_m(&self, flow_lps: f64, diameter_mm: f64) -> f64;

    /// Pressure lost over `length_m` of pipe (kPa).
    fn loss_kpa(&self, flow_lps: f64, diameter_mm: f64, length_m: f64) -> f64 {
        self.gradient_kpa_per_m(flow_lps, diameter_mm) * length_m
    }
}
