//! Pressure propagation for branched building supply networks.
//!
//! Given registered segments, boundary pressures at the sources and the
//! hydraulic settings of a project, [`propagate`] walks the network from its
//! sources and computes flow, head losses and outlet pressure for every
//! reachable segment.
//!
//! Nothing here mutates the segment set; a run works on a snapshot.
//!
//! ```
//! use bf_graph::{CapacityMap, ConnectionType, LabelMode, SegmentDraft, SegmentSet};
//! use bf_solver::{PropagationParams, PropagationProblem, propagate};
//!
//! let mut set = SegmentSet::new();
//! let mut draft = SegmentDraft::new("A", "B", ConnectionType::Entry);
//! draft.elevation_drop_m = 3.0;
//! set.register(draft, LabelMode::Letters, &CapacityMap::default()).unwrap();
//!
//! let problem = PropagationProblem::new(set.as_slice(), PropagationParams::default(), 100.0);
//! let report = propagate(&problem).unwrap();
//! assert!(report.is_complete());
//! assert!(report.records[0].p_out_kpa > 100.0);
//! ```

pub mod error;
mod evaluate;
pub mod problem;
pub mod propagate;
pub mod report;

pub use error::{SolverError, SolverResult};
pub use problem::{ConflictPolicy, PropagationParams, PropagationProblem};
pub use propagate::propagate;
pub use report::{PropagationReport, PropagationWarning, SegmentResult};
