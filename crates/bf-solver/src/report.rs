//! Propagation results.

use std::fmt;

/// Computed hydraulics of one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentResult {
    pub segment_id: String,
    /// Probable flow (L/s).
    pub flow_lps: f64,
    pub velocity_mps: f64,
    /// Unit head loss J (kPa/m).
    pub gradient_kpa_per_m: f64,
    pub p_in_kpa: f64,
    /// Loss over the real length.
    pub hf_cont_kpa: f64,
    /// Loss over the fittings' equivalent length.
    pub hf_loc_kpa: f64,
    /// Pressure gained from the elevation drop; negative when climbing.
    pub p_disp_kpa: f64,
    pub p_out_kpa: f64,
    /// `p_out_kpa` as metres of water column.
    pub p_out_mwc: f64,
    /// `p_out_kpa - min_pressure_kpa`; negative means the outlet is short.
    pub margin_kpa: f64,
}

impl SegmentResult {
    pub fn meets_minimum(&self) -> bool {
        self.margin_kpa >= 0.0
    }
}

/// Non-fatal findings of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum PropagationWarning {
    /// A boundary was given for a node that is not a source of the network.
    IgnoredBoundary { node: String },
    /// A node was reached with two different pressures; the first one was kept.
    PressureConflict {
        node: String,
        segment: String,
        existing_kpa: f64,
        incoming_kpa: f64,
    },
}

impl fmt::Display for PropagationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropagationWarning::IgnoredBoundary { node } => {
                write!(f, "boundary at {node} ignored: node is not a source")
            }
            PropagationWarning::PressureConflict {
                node,
                segment,
                existing_kpa,
                incoming_kpa,
            } => write!(
                f,
                "node {node}: kept {existing_kpa:.3} kPa, discarded {incoming_kpa:.3} kPa from {segment}"
            ),
        }
    }
}

/// Outcome of a propagation run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropagationReport {
    /// One record per reached segment, in segment-set order.
    pub records: Vec<SegmentResult>,
    /// Ids of segments no source could reach, in segment-set order.
    pub unreachable: Vec<String>,
    /// Final pressure (kPa) of every reached node, in node order.
    pub node_pressures: Vec<(String, f64)>,
    pub warnings: Vec<PropagationWarning>,
}

impl PropagationReport {
    /// True when every segment was reached.
    pub fn is_complete(&self) -> bool {
        self.unreachable.is_empty()
    }

    pub fn record(&self, segment_id: &str) -> Option<&SegmentResult> {
        self.records.iter().find(|r| r.segment_id == segment_id)
    }

    pub fn node_pressure_kpa(&self, node: &str) -> Option<f64> {
        self.node_pressures
            .iter()
            .find(|(label, _)| label == node)
            .map(|(_, p)| *p)
    }

    /// Records whose outlet falls below the segment minimum.
    pub fn deficient(&self) -> impl Iterator<Item = &SegmentResult> {
        self.records.iter().filter(|r| !r.meets_minimum())
    }
}
