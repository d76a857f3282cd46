//! Problem definition for pressure propagation.

use std::collections::BTreeMap;

use bf_core::constants::head_m_to_kpa;
use bf_core::ensure_finite;
use bf_graph::{NodeLabel, Segment};
use bf_hydraulics::{FlowParams, HeadLossModel};

use crate::error::{SolverError, SolverResult};

/// What to do when a node is assigned two different pressures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Abort the run with [`SolverError::PressureConflict`].
    #[default]
    Fail,
    /// Keep the first value that reached the node and record a warning.
    Warn,
}

/// Hydraulic settings shared by every segment of a run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PropagationParams {
    pub flow: FlowParams,
    pub model: HeadLossModel,
    pub conflict_policy: ConflictPolicy,
}

/// A propagation run over a snapshot of registered segments.
///
/// Source nodes without an explicit boundary start at
/// `default_pressure_kpa`. Boundaries on nodes that are not sources are
/// reported and ignored.
#[derive(Debug, Clone)]
pub struct PropagationProblem<'a> {
    /// Segments in registration order; results keep this order.
    pub segments: &'a [Segment],

    /// Fixed pressures (kPa) at source nodes.
    pub boundaries: BTreeMap<NodeLabel, f64>,

    /// Pressure (kPa) for sources without a boundary.
    pub default_pressure_kpa: f64,

    pub params: PropagationParams,
}

impl<'a> PropagationProblem<'a> {
    pub fn new(segments: &'a [Segment], params: PropagationParams, default_pressure_kpa: f64) -> Self {
        Self {
            segments,
            boundaries: BTreeMap::new(),
            default_pressure_kpa,
            params,
        }
    }

    /// Fix the pressure of a source node in kPa. A later call for the same
    /// node replaces the earlier value.
    pub fn set_boundary_kpa(&mut self, node: NodeLabel, pressure_kpa: f64) -> SolverResult<()> {
        let pressure_kpa = ensure_finite(pressure_kpa, "boundary pressure")?;
        self.boundaries.insert(node, pressure_kpa);
        Ok(())
    }

    /// Fix the pressure of a source node as metres of water column.
    pub fn set_boundary_head_m(&mut self, node: NodeLabel, head_m: f64) -> SolverResult<()> {
        let head_m = ensure_finite(head_m, "boundary head")?;
        self.set_boundary_kpa(node, head_m_to_kpa(head_m))
    }

    /// Starting pressure of a source node.
    pub fn source_pressure_kpa(&self, node: &NodeLabel) -> f64 {
        self.boundaries
            .get(node)
            .copied()
            .unwrap_or(self.default_pressure_kpa)
    }

    /// Check that every pressure the run starts from is usable.
    pub fn validate(&self) -> SolverResult<()> {
        if !self.default_pressure_kpa.is_finite() {
            return Err(SolverError::ProblemSetup {
                what: format!(
                    "default operating pressure must be finite, got {}",
                    self.default_pressure_kpa
                ),
            });
        }
        for (node, p) in &self.boundaries {
            if !p.is_finite() {
                return Err(SolverError::ProblemSetup {
                    what: format!("boundary pressure at {node} must be finite, got {p}"),
                });
            }
        }
        Ok(())
    }
}
