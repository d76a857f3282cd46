//! Incremental network builder.

use std::collections::HashMap;

use bf_core::{NodeIdx, SegmentIdx};

use crate::error::TopologyResult;
use crate::label::NodeLabel;
use crate::network::Network;
use crate::segment::Segment;
use crate::validate;

/// Builder for the per-run adjacency.
///
/// Call `add_segment` once per segment in snapshot order, then `build()` to
/// validate and freeze it into an immutable `Network`.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    labels: Vec<NodeLabel>,
    label_index: HashMap<NodeLabel, NodeIdx>,
    seg_start: Vec<NodeIdx>,
    seg_end: Vec<NodeIdx>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Network over a registered segment snapshot; `SegmentIdx` follows slice order.
    pub fn from_segments(segments: &[Segment]) -> TopologyResult<Network> {
        let mut builder = Self::new();
        for seg in segments {
            builder.add_segment(seg.start_node.clone(), seg.end_node.clone());
        }
        builder.build()
    }

    /// Intern a label, returning its node index.
    pub fn add_node(&mut self, label: NodeLabel) -> NodeIdx {
        if let Some(&idx) = self.label_index.get(&label) {
            return idx;
        }
        let idx = NodeIdx::from_index(self.labels.len());
        self.label_index.insert(label.clone(), idx);
        self.labels.push(label);
        idx
    }

    /// Add a directed segment, interning both endpoints.
    pub fn add_segment(&mut self, start: NodeLabel, end: NodeLabel) -> SegmentIdx {
        let start = self.add_node(start);
        let end = self.add_node(end);
        let idx = SegmentIdx::from_index(self.seg_start.len());
        self.seg_start.push(start);
        self.seg_end.push(end);
        idx
    }

    /// Build and validate the adjacency, returning an immutable `Network`.
    pub fn build(self) -> TopologyResult<Network> {
        let node_count = self.labels.len();
        let (out_offsets, out_segments) = Self::build_adjacency(node_count, &self.seg_start);
        let (in_offsets, in_segments) = Self::build_adjacency(node_count, &self.seg_end);

        validate::validate_adjacency(node_count, &self.seg_start, &out_offsets, &out_segments)?;
        validate::validate_adjacency(node_count, &self.seg_end, &in_offsets, &in_segments)?;

        Ok(Network {
            labels: self.labels,
            label_index: self.label_index,
            seg_start: self.seg_start,
            seg_end: self.seg_end,
            out_offsets,
            out_segments,
            in_offsets,
            in_segments,
        })
    }

    /// Group segments by the node on one side, keeping segment order per node.
    fn build_adjacency(node_count: usize, endpoint: &[NodeIdx]) -> (Vec<usize>, Vec<SegmentIdx>) {
        let mut per_node: Vec<Vec<SegmentIdx>> = vec![Vec::new(); node_count];
        for (i, node) in endpoint.iter().enumerate() {
            per_node[node.index()].push(SegmentIdx::from_index(i));
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut flat = Vec::with_capacity(endpoint.len());
        offsets.push(0);
        for list in per_node {
            flat.extend(list);
            offsets.push(flat.len());
        }
        (offsets, flat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{LabelMode, normalize_label};

    fn label(s: &str) -> NodeLabel {
        normalize_label(s, LabelMode::Digits).unwrap()
    }

    #[test]
    fn labels_are_interned_once() {
        let mut b = NetworkBuilder::new();
        let n1 = b.add_node(label("1"));
        let again = b.add_node(label("01"));
        assert_eq!(n1, again);
        assert_eq!(b.labels.len(), 1);
    }

    #[test]
    fn build_chain() {
        let mut b = NetworkBuilder::new();
        let s0 = b.add_segment(label("1"), label("2"));
        let s1 = b.add_segment(label("2"), label("3"));
        let net = b.build().unwrap();

        assert_eq!(net.node_count(), 3);
        assert_eq!(net.segment_count(), 2);

        let n2 = net.node(&label("2")).unwrap();
        assert_eq!(net.inbound(n2), &[s0]);
        assert_eq!(net.outgoing(n2), &[s1]);
        assert_eq!(net.segment_start(s1), Some(n2));
    }
}
