//! bf-graph: segment graph layer for branchflow.
//!
//! Provides:
//! - Node label notation (letters / digits) and connection types
//! - The registered segment set, guarded by the topology validator
//! - Per-run network adjacency (arena indices, outgoing/inbound by node)
//!
//! # Example
//!
//! ```
//! use bf_graph::{CapacityMap, ConnectionType, LabelMode, NetworkBuilder, SegmentDraft, SegmentSet};
//!
//! let mut set = SegmentSet::new();
//! let caps = CapacityMap::default();
//! set.register(SegmentDraft::new("A", "B", ConnectionType::Entry), LabelMode::Letters, &caps)
//!     .unwrap();
//! set.register(SegmentDraft::new("B", "C", ConnectionType::Tee), LabelMode::Letters, &caps)
//!     .unwrap();
//!
//! let network = NetworkBuilder::from_segments(set.as_slice()).unwrap();
//! assert_eq!(network.node_count(), 3);
//! assert_eq!(network.sources().len(), 1);
//! ```

pub mod builder;
pub mod connection;
pub mod error;
pub mod label;
pub mod network;
pub mod segment;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::NetworkBuilder;
pub use connection::{CapacityMap, ConnectionType};
pub use error::{TopologyError, TopologyResult};
pub use label::{LabelMode, NodeLabel, next_label, normalize_label};
pub use network::Network;
pub use segment::{Segment, SegmentDraft, SegmentSet, TerminalKind};
