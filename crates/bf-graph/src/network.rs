//! Per-run network view: segment arena plus label-indexed adjacency.

use std::collections::HashMap;

use bf_core::{NodeIdx, SegmentIdx};

use crate::label::NodeLabel;

/// Immutable adjacency built from a segment snapshot.
///
/// Segments keep their snapshot position as `SegmentIdx`; nodes are numbered
/// in order of first appearance (start before end). Adjacency is stored in
/// compressed form: node `i`'s outgoing segments are
/// `out_segments[out_offsets[i]..out_offsets[i + 1]]`, likewise for inbound.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) labels: Vec<NodeLabel>,
    pub(crate) label_index: HashMap<NodeLabel, NodeIdx>,
    pub(crate) seg_start: Vec<NodeIdx>,
    pub(crate) seg_end: Vec<NodeIdx>,
    pub(crate) out_offsets: Vec<usize>,
    pub(crate) out_segments: Vec<SegmentIdx>,
    pub(crate) in_offsets: Vec<usize>,
    pub(crate) in_segments: Vec<SegmentIdx>,
}

impl Network {
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn segment_count(&self) -> usize {
        self.seg_start.len()
    }

    /// Label of a node (None if out of bounds).
    pub fn label(&self, node: NodeIdx) -> Option<&NodeLabel> {
        self.labels.get(node.index())
    }

    /// Look up a node by label.
    pub fn node(&self, label: &NodeLabel) -> Option<NodeIdx> {
        self.label_index.get(label).copied()
    }

    pub fn segment_start(&self, seg: SegmentIdx) -> Option<NodeIdx> {
        self.seg_start.get(seg.index()).copied()
    }

    pub fn segment_end(&self, seg: SegmentIdx) -> Option<NodeIdx> {
        self.seg_end.get(seg.index()).copied()
    }

    /// Segments leaving `node`, in snapshot order.
    pub fn outgoing(&self, node: NodeIdx) -> &[SegmentIdx] {
        slice(&self.out_offsets, &self.out_segments, node)
    }

    /// Segments arriving at `node`, in snapshot order.
    pub fn inbound(&self, node: NodeIdx) -> &[SegmentIdx] {
        slice(&self.in_offsets, &self.in_segments, node)
    }

    /// Nodes with no inbound segment, in node order.
    pub fn sources(&self) -> Vec<NodeIdx> {
        (0..self.node_count())
            .map(NodeIdx::from_index)
            .filter(|&n| self.inbound(n).is_empty())
            .collect()
    }

    /// Nodes reached by more than one segment, with those segments.
    pub fn inbound_conflicts(&self) -> Vec<(NodeIdx, Vec<SegmentIdx>)> {
        (0..self.node_count())
            .map(NodeIdx::from_index)
            .filter_map(|n| {
                let inbound = self.inbound(n);
                (inbound.len() > 1).then(|| (n, inbound.to_vec()))
            })
            .collect()
    }
}

fn slice<'a>(offsets: &[usize], flat: &'a [SegmentIdx], node: NodeIdx) -> &'a [SegmentIdx] {
    let idx = node.index();
    if idx + 1 >= offsets.len() {
        return &[];
    }
    &flat[offsets[idx]..offsets[idx + 1]]
}

#[cfg(test)]
mod tests {
    use crate::builder::NetworkBuilder;
    use crate::label::{LabelMode, normalize_label};

    fn label(s: &str) -> crate::label::NodeLabel {
        normalize_label(s, LabelMode::Letters).unwrap()
    }

    #[test]
    fn out_of_bounds_node_has_no_neighbours() {
        let mut b = NetworkBuilder::new();
        b.add_segment(label("A"), label("B"));
        let net = b.build().unwrap();
        let bogus = bf_core::NodeIdx::from_index(99);
        assert!(net.outgoing(bogus).is_empty());
        assert!(net.inbound(bogus).is_empty());
        assert!(net.label(bogus).is_none());
    }

    #[test]
    fn sources_and_conflicts() {
        let mut b = NetworkBuilder::new();
        b.add_segment(label("A"), label("C"));
        b.add_segment(label("B"), label("C"));
        b.add_segment(label("C"), label("D"));
        let net = b.build().unwrap();

        let sources: Vec<&str> = net
            .sources()
            .into_iter()
            .map(|n| net.label(n).unwrap().as_str())
            .collect();
        assert_eq!(sources, vec!["A", "B"]);

        let conflicts = net.inbound_conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(net.label(conflicts[0].0).unwrap().as_str(), "C");
        assert_eq!(conflicts[0].1.len(), 2);
    }
}
