//! Topology error types.

use crate::connection::ConnectionType;
use crate::label::{LabelMode, NodeLabel};
use bf_core::{NodeIdx, SegmentIdx};

/// Registration and network-construction errors.
///
/// Everything except `InconsistentAdjacency` is raised while registering or
/// editing segments and is recoverable: the segment set is left untouched and
/// the caller can retry with corrected input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// A label does not follow the project notation.
    InvalidLabel { raw: String, mode: LabelMode },

    /// Start and end node are the same label.
    SelfLoop { node: NodeLabel },

    /// A segment with the same (start, end) pair already exists.
    DuplicateEdge {
        start: NodeLabel,
        end: NodeLabel,
        existing_id: String,
    },

    /// The start node was registered earlier with another connection type.
    TypeMismatch {
        node: NodeLabel,
        existing: ConnectionType,
        requested: ConnectionType,
    },

    /// The start node already has as many outgoing segments as its type allows.
    CapacityExceeded {
        node: NodeLabel,
        kind: ConnectionType,
        capacity: u32,
    },

    /// Free text that does not name a known connection type.
    UnknownConnectionType { text: String },

    /// A capacity below one.
    InvalidCapacity { kind: ConnectionType, value: u32 },

    /// No segment with this id.
    SegmentNotFound { id: String },

    /// Adjacency list is inconsistent with the segment endpoints.
    InconsistentAdjacency { segment: SegmentIdx, node: NodeIdx },
}

impl std::fmt::Display for TopologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyError::InvalidLabel { raw, mode } => {
                write!(f, "Label '{}' is not valid in {} notation", raw, mode)
            }
            TopologyError::SelfLoop { node } => {
                write!(f, "Segment starts and ends at the same node {}", node)
            }
            TopologyError::DuplicateEdge {
                start,
                end,
                existing_id,
            } => {
                write!(
                    f,
                    "A segment {} -> {} already exists (id={})",
                    start, end, existing_id
                )
            }
            TopologyError::TypeMismatch {
                node,
                existing,
                requested,
            } => {
                write!(
                    f,
                    "Node {} is already defined as {}, cannot start a {} segment",
                    node, existing, requested
                )
            }
            TopologyError::CapacityExceeded {
                node,
                kind,
                capacity,
            } => {
                write!(
                    f,
                    "Node {} ({}) already has its limit of {} outgoing segment(s)",
                    node, kind, capacity
                )
            }
            TopologyError::UnknownConnectionType { text } => {
                write!(f, "Unknown connection type '{}'", text)
            }
            TopologyError::InvalidCapacity { kind, value } => {
                write!(f, "Capacity for {} must be at least 1 (got {})", kind, value)
            }
            TopologyError::SegmentNotFound { id } => {
                write!(f, "Segment '{}' not found", id)
            }
            TopologyError::InconsistentAdjacency { segment, node } => {
                write!(
                    f,
                    "Segment {} in node {}'s adjacency list but doesn't touch that node",
                    segment, node
                )
            }
        }
    }
}

impl std::error::Error for TopologyError {}

pub type TopologyResult<T> = Result<T, TopologyError>;
