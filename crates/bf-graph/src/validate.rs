//! Topology validation: registration checks and adjacency consistency.

use std::collections::HashSet;

use bf_core::{NodeIdx, SegmentIdx};

use crate::connection::CapacityMap;
use crate::error::{TopologyError, TopologyResult};
use crate::label::{LabelMode, NodeLabel, normalize_label};
use crate::segment::{Segment, SegmentDraft};

/// Run the registration checks for `draft` against `existing`.
///
/// Order: label validity, self loop, duplicate edge (any branch), connection
/// type consistency at the start node, start node capacity. Returns the
/// normalized (start, end) labels.
pub(crate) fn check_registration(
    draft: &SegmentDraft,
    existing: &[Segment],
    mode: LabelMode,
    capacity: &CapacityMap,
) -> TopologyResult<(NodeLabel, NodeLabel)> {
    let start = normalize_label(&draft.start_node, mode)?;
    let end = normalize_label(&draft.end_node, mode)?;

    if start == end {
        return Err(TopologyError::SelfLoop { node: start });
    }

    if let Some(dup) = existing
        .iter()
        .find(|s| s.start_node == start && s.end_node == end)
    {
        return Err(TopologyError::DuplicateEdge {
            start,
            end,
            existing_id: dup.id.clone(),
        });
    }

    let leaving: Vec<&Segment> = existing.iter().filter(|s| s.start_node == start).collect();

    if let Some(other) = leaving
        .iter()
        .find(|s| s.start_connection != draft.start_connection)
    {
        return Err(TopologyError::TypeMismatch {
            node: start,
            existing: other.start_connection,
            requested: draft.start_connection,
        });
    }

    let cap = capacity.capacity(draft.start_connection);
    if leaving.len() >= cap as usize {
        return Err(TopologyError::CapacityExceeded {
            node: start,
            kind: draft.start_connection,
            capacity: cap,
        });
    }

    Ok((start, end))
}

/// Keep `requested` when it is free, otherwise append a random 6-hex suffix
/// (`row_xxxxxx` when nothing was requested).
pub(crate) fn unique_id(requested: &str, existing: &[Segment]) -> String {
    let requested = requested.trim();
    let taken = |candidate: &str| existing.iter().any(|s| s.id == candidate);
    if !requested.is_empty() && !taken(requested) {
        return requested.to_string();
    }
    let base = if requested.is_empty() { "row" } else { requested };
    loop {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        let candidate = format!("{}_{}", base, &hex[..6]);
        if !taken(&candidate) {
            return candidate;
        }
    }
}

/// Validate per-node adjacency lists against segment endpoints.
///
/// `offsets` has one entry per node plus one; node `i` owns
/// `flat[offsets[i]..offsets[i + 1]]`. `endpoint[s]` is the node segment `s`
/// must touch on this side. Every segment must appear exactly once.
pub(crate) fn validate_adjacency(
    node_count: usize,
    endpoint: &[NodeIdx],
    offsets: &[usize],
    flat: &[SegmentIdx],
) -> TopologyResult<()> {
    if offsets.len() != node_count + 1 || offsets.last().copied() != Some(flat.len()) {
        return Err(TopologyError::InconsistentAdjacency {
            segment: SegmentIdx::from_index(0),
            node: NodeIdx::from_index(0),
        });
    }

    for node in 0..node_count {
        let node_id = NodeIdx::from_index(node);
        for &seg in &flat[offsets[node]..offsets[node + 1]] {
            if endpoint.get(seg.index()) != Some(&node_id) {
                return Err(TopologyError::InconsistentAdjacency {
                    segment: seg,
                    node: node_id,
                });
            }
        }
    }

    let mut seen: HashSet<SegmentIdx> = HashSet::new();
    for &seg in flat {
        if !seen.insert(seg) {
            return Err(TopologyError::InconsistentAdjacency {
                segment: seg,
                node: endpoint[seg.index()],
            });
        }
    }
    if seen.len() != endpoint.len() {
        let missing = (0..endpoint.len())
            .map(SegmentIdx::from_index)
            .find(|s| !seen.contains(s))
            .unwrap_or(SegmentIdx::from_index(0));
        return Err(TopologyError::InconsistentAdjacency {
            segment: missing,
            node: endpoint.get(missing.index()).copied().unwrap_or(NodeIdx::from_index(0)),
        });
    }

    Ok(())
}
