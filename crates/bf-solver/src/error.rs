//! Error types for pressure propagation.

use bf_core::error::BfError;
use bf_graph::TopologyError;
use thiserror::Error;

/// Errors that abort a propagation run.
///
/// None of them touch the segment set; the caller can correct the input and
/// run again.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    /// More than one segment ends at `node`; the network is not a forest.
    #[error("Node {node} is fed by more than one segment: {}", .segments.join(", "))]
    InboundConflict { node: String, segments: Vec<String> },

    /// A node received two different pressures.
    #[error(
        "Node {node} received {incoming_kpa} kPa from segment {segment} but already had {existing_kpa} kPa"
    )]
    PressureConflict {
        node: String,
        segment: String,
        existing_kpa: f64,
        incoming_kpa: f64,
    },

    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("Numeric error: {0}")]
    Numeric(#[from] BfError),
}

pub type SolverResult<T> = Result<T, SolverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_conflict_names_node_and_segments() {
        let err = SolverError::InboundConflict {
            node: "C".into(),
            segments: vec!["t1".into(), "t2".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Node C"));
        assert!(msg.contains("t1, t2"));
    }
}
