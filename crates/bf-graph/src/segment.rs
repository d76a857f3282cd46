//! Segments (directed pipe runs) and the registered segment set.

use tracing::debug;

use crate::connection::{CapacityMap, ConnectionType};
use crate::error::{TopologyError, TopologyResult};
use crate::label::{LabelMode, NodeLabel};
use crate::validate;

/// What sits at the end of a segment; picks the default minimum pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalKind {
    /// Intermediate point without a fixture.
    #[default]
    NoUse,
    /// Point of use (fixture).
    UsePoint,
}

impl TerminalKind {
    /// Minimum reference pressure in kPa.
    pub fn default_min_pressure_kpa(self) -> f64 {
        match self {
            TerminalKind::NoUse => 5.0,
            TerminalKind::UsePoint => 10.0,
        }
    }
}

/// A registered segment.
///
/// Only `equivalent_length_m` and `order` change after registration.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub id: String,
    /// Logical grouping; not used by propagation.
    pub branch: String,
    /// Display position inside the branch, 1-based.
    pub order: u32,
    pub start_node: NodeLabel,
    pub end_node: NodeLabel,
    /// Property of `start_node`.
    pub start_connection: ConnectionType,
    pub nominal_diameter_mm: f64,
    pub reference_diameter_mm: f64,
    pub reference_diameter_inches: String,
    pub real_length_m: f64,
    /// Start elevation minus end elevation; positive when descending.
    pub elevation_drop_m: f64,
    pub fixture_unit_weight: f64,
    pub equivalent_length_m: f64,
    pub min_pressure_kpa: f64,
}

impl Segment {
    /// `branch-order [start→end] (type) id=...`
    pub fn display_label(&self) -> String {
        format!(
            "{}-{} [{}→{}] ({}) id={}",
            self.branch, self.order, self.start_node, self.end_node, self.start_connection, self.id
        )
    }
}

/// Unvalidated registration input. Labels are raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDraft {
    /// Requested id; empty or already-used ids get a generated suffix.
    pub id: String,
    pub branch: String,
    pub order: u32,
    pub start_node: String,
    pub end_node: String,
    pub start_connection: ConnectionType,
    pub nominal_diameter_mm: f64,
    pub reference_diameter_mm: f64,
    pub reference_diameter_inches: String,
    pub real_length_m: f64,
    pub elevation_drop_m: f64,
    pub fixture_unit_weight: f64,
    pub equivalent_length_m: f64,
    pub min_pressure_kpa: f64,
}

impl SegmentDraft {
    /// Draft with zeroed physical data; reference diameter defaults to the nominal one.
    pub fn new(
        start_node: impl Into<String>,
        end_node: impl Into<String>,
        start_connection: ConnectionType,
    ) -> Self {
        Self {
            id: String::new(),
            branch: "A".to_string(),
            order: 1,
            start_node: start_node.into(),
            end_node: end_node.into(),
            start_connection,
            nominal_diameter_mm: 0.0,
            reference_diameter_mm: 0.0,
            reference_diameter_inches: String::new(),
            real_length_m: 0.0,
            elevation_drop_m: 0.0,
            fixture_unit_weight: 0.0,
            equivalent_length_m: 0.0,
            min_pressure_kpa: TerminalKind::NoUse.default_min_pressure_kpa(),
        }
    }
}

/// Ordered collection of registered segments. Every mutation keeps the
/// topology invariants (no self loops, no duplicate edges, one connection
/// type per start node, outgoing capacity per type).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentSet {
    segments: Vec<Segment>,
}

impl SegmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `draft` against the current set and append it.
    ///
    /// Checks run in a fixed order: labels, self loop, duplicate edge,
    /// connection type consistency, capacity. Returns the assigned id.
    pub fn register(
        &mut self,
        draft: SegmentDraft,
        mode: LabelMode,
        capacity: &CapacityMap,
    ) -> TopologyResult<String> {
        let (start_node, end_node) =
            validate::check_registration(&draft, &self.segments, mode, capacity)?;

        let id = validate::unique_id(&draft.id, &self.segments);
        debug!(id = %id, start = %start_node, end = %end_node, kind = %draft.start_connection, "segment registered");

        self.segments.push(Segment {
            id: id.clone(),
            branch: draft.branch,
            order: draft.order,
            start_node,
            end_node,
            start_connection: draft.start_connection,
            nominal_diameter_mm: draft.nominal_diameter_mm,
            reference_diameter_mm: draft.reference_diameter_mm,
            reference_diameter_inches: draft.reference_diameter_inches,
            real_length_m: draft.real_length_m,
            elevation_drop_m: draft.elevation_drop_m,
            fixture_unit_weight: draft.fixture_unit_weight,
            equivalent_length_m: draft.equivalent_length_m,
            min_pressure_kpa: draft.min_pressure_kpa,
        });
        Ok(id)
    }

    /// Delete a segment and renumber `order` inside every branch.
    pub fn remove(&mut self, id: &str) -> TopologyResult<Segment> {
        let pos = self.position(id)?;
        let removed = self.segments.remove(pos);
        for branch in self.branches() {
            self.renumber_branch(&branch);
        }
        debug!(id = %removed.id, "segment removed");
        Ok(removed)
    }

    /// Swap with the previous segment of the same branch. Returns whether anything moved.
    pub fn move_up(&mut self, id: &str) -> TopologyResult<bool> {
        self.shift(id, -1)
    }

    /// Swap with the next segment of the same branch. Returns whether anything moved.
    pub fn move_down(&mut self, id: &str) -> TopologyResult<bool> {
        self.shift(id, 1)
    }

    pub fn set_equivalent_length(&mut self, id: &str, length_m: f64) -> TopologyResult<()> {
        let pos = self.position(id)?;
        self.segments[pos].equivalent_length_m = length_m;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// Segment running from `start` to `end`, if registered.
    pub fn find(&self, start: &NodeLabel, end: &NodeLabel) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|s| &s.start_node == start && &s.end_node == end)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Distinct branch names, sorted.
    pub fn branches(&self) -> Vec<String> {
        let mut names: Vec<String> = self.segments.iter().map(|s| s.branch.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Segments of one branch in display order (stable on ties).
    pub fn branch_segments(&self, branch: &str) -> Vec<&Segment> {
        let mut members: Vec<&Segment> =
            self.segments.iter().filter(|s| s.branch == branch).collect();
        members.sort_by_key(|s| s.order);
        members
    }

    fn position(&self, id: &str) -> TopologyResult<usize> {
        self.segments
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| TopologyError::SegmentNotFound { id: id.to_string() })
    }

    fn shift(&mut self, id: &str, delta: isize) -> TopologyResult<bool> {
        let pos = self.position(id)?;
        let branch = self.segments[pos].branch.clone();
        let mut ids: Vec<String> = self
            .branch_segments(&branch)
            .into_iter()
            .map(|s| s.id.clone())
            .collect();

        let Some(i) = ids.iter().position(|other| other == id) else {
            return Ok(false);
        };
        let Some(j) = i.checked_add_signed(delta).filter(|&j| j < ids.len()) else {
            return Ok(false);
        };
        ids.swap(i, j);

        for (k, member) in ids.iter().enumerate() {
            if let Some(seg) = self.segments.iter_mut().find(|s| &s.id == member) {
                seg.order = k as u32 + 1;
            }
        }
        Ok(true)
    }

    fn renumber_branch(&mut self, branch: &str) {
        let ids: Vec<String> = self
            .branch_segments(branch)
            .into_iter()
            .map(|s| s.id.clone())
            .collect();
        for (k, member) in ids.iter().enumerate() {
            if let Some(seg) = self.segments.iter_mut().find(|s| &s.id == member) {
                seg.order = k as u32 + 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(id: &str, branch: &str, order: u32, start: &str, end: &str) -> SegmentDraft {
        SegmentDraft {
            id: id.into(),
            branch: branch.into(),
            order,
            ..SegmentDraft::new(start, end, ConnectionType::Cross)
        }
    }

    fn set_of(drafts: Vec<SegmentDraft>) -> SegmentSet {
        let mut set = SegmentSet::new();
        for d in drafts {
            set.register(d, LabelMode::Letters, &CapacityMap::default())
                .unwrap();
        }
        set
    }

    fn orders(set: &SegmentSet, branch: &str) -> Vec<(String, u32)> {
        set.branch_segments(branch)
            .into_iter()
            .map(|s| (s.id.clone(), s.order))
            .collect()
    }

    #[test]
    fn register_keeps_free_id() {
        let set = set_of(vec![draft("t1", "A", 1, "a", "b")]);
        let seg = set.get("t1").unwrap();
        assert_eq!(seg.start_node.as_str(), "A");
        assert_eq!(seg.end_node.as_str(), "B");
    }

    #[test]
    fn empty_id_gets_generated_suffix() {
        let set = set_of(vec![draft("", "A", 1, "A", "B")]);
        let id = &set.as_slice()[0].id;
        assert!(id.starts_with("row_"), "{id}");
        assert_eq!(id.len(), "row_".len() + 6);
    }

    #[test]
    fn reused_id_gets_generated_suffix() {
        let set = set_of(vec![draft("t1", "A", 1, "A", "B"), draft("t1", "A", 2, "A", "C")]);
        assert_eq!(set.len(), 2);
        let second = &set.as_slice()[1].id;
        assert!(second.starts_with("t1_"));
        assert_ne!(second, "t1");
    }

    #[test]
    fn remove_renumbers_branch() {
        let mut set = set_of(vec![
            draft("a1", "A", 1, "A", "B"),
            draft("a2", "A", 2, "A", "C"),
            draft("a3", "A", 3, "A", "D"),
            draft("b1", "B", 1, "B", "E"),
        ]);
        let removed = set.remove("a1").unwrap();
        assert_eq!(removed.id, "a1");
        assert_eq!(
            orders(&set, "A"),
            vec![("a2".to_string(), 1), ("a3".to_string(), 2)]
        );
        assert_eq!(orders(&set, "B"), vec![("b1".to_string(), 1)]);
    }

    #[test]
    fn remove_unknown_is_an_error() {
        let mut set = SegmentSet::new();
        assert!(matches!(
            set.remove("nope"),
            Err(TopologyError::SegmentNotFound { .. })
        ));
    }

    #[test]
    fn move_swaps_within_branch_only() {
        let mut set = set_of(vec![
            draft("a1", "A", 1, "A", "B"),
            draft("b1", "B", 1, "B", "C"),
            draft("a2", "A", 2, "A", "D"),
        ]);
        assert!(set.move_up("a2").unwrap());
        assert_eq!(
            orders(&set, "A"),
            vec![("a2".to_string(), 1), ("a1".to_string(), 2)]
        );
        assert_eq!(orders(&set, "B"), vec![("b1".to_string(), 1)]);
    }

    #[test]
    fn move_at_edges_is_noop() {
        let mut set = set_of(vec![draft("a1", "A", 1, "A", "B"), draft("a2", "A", 2, "A", "C")]);
        assert!(!set.move_up("a1").unwrap());
        assert!(!set.move_down("a2").unwrap());
        assert!(set.move_down("a1").unwrap());
        assert_eq!(set.get("a1").unwrap().order, 2);
    }

    #[test]
    fn set_equivalent_length_updates_only_target() {
        let mut set = set_of(vec![draft("a1", "A", 1, "A", "B"), draft("a2", "A", 2, "A", "C")]);
        set.set_equivalent_length("a2", 3.4).unwrap();
        assert_eq!(set.get("a2").unwrap().equivalent_length_m, 3.4);
        assert_eq!(set.get("a1").unwrap().equivalent_length_m, 0.0);
    }

    #[test]
    fn display_label_format() {
        let set = set_of(vec![draft("t9", "R", 1, "A", "B")]);
        assert_eq!(
            set.get("t9").unwrap().display_label(),
            "R-1 [A→B] (Cross) id=t9"
        );
    }

    #[test]
    fn terminal_defaults() {
        assert_eq!(TerminalKind::NoUse.default_min_pressure_kpa(), 5.0);
        assert_eq!(TerminalKind::UsePoint.default_min_pressure_kpa(), 10.0);
    }
}
