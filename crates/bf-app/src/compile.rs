//! Compilation of a project file into a validated segment set.

use std::collections::HashSet;

use bf_core::constants::head_m_to_kpa;
use bf_graph::{
    CapacityMap, ConnectionType, LabelMode, NodeLabel, SegmentDraft, SegmentSet, TerminalKind,
    normalize_label,
};
use bf_hydraulics::{
    FittingRow, FittingTable, FlowParams, HeadLossKind, HeadLossModel, HwCoefficients, Material,
};
use bf_project::schema::{
    HeadLossModelDef, MaterialDef, NotationDef, PressureConflictDef, Project, SegmentDef,
    TerminalDef,
};
use bf_solver::{ConflictPolicy, PropagationParams, PropagationProblem, SolverResult};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// A project after every segment has passed the topology validator.
///
/// `segments` holds the project's segments in file order, so index `i`
/// matches `project.segments[i]`.
#[derive(Debug, Clone)]
pub struct CompiledNetwork {
    pub segments: SegmentSet,
    pub mode: LabelMode,
    pub capacity: CapacityMap,
    pub material: Material,
    pub fittings: FittingTable,
    pub params: PropagationParams,
    /// Pressure (kPa) for sources without an explicit boundary.
    pub default_pressure_kpa: f64,
    /// Explicit boundaries in kPa, in file order.
    pub boundaries: Vec<(NodeLabel, f64)>,
}

impl CompiledNetwork {
    /// Propagation problem over the compiled segments.
    pub fn problem(&self) -> SolverResult<PropagationProblem<'_>> {
        let mut problem = PropagationProblem::new(
            self.segments.as_slice(),
            self.params,
            self.default_pressure_kpa,
        );
        for (node, p) in &self.boundaries {
            problem.set_boundary_kpa(node.clone(), *p)?;
        }
        Ok(problem)
    }

    /// Validate and append one more segment definition. Returns the assigned id.
    ///
    /// A blank id gets a fresh random `row_xxxxxx` id.
    pub fn register(&mut self, def: &SegmentDef) -> AppResult<String> {
        self.register_as(def, def.id.clone())
    }

    fn register_as(&mut self, def: &SegmentDef, id: String) -> AppResult<String> {
        let draft = self.draft(def, id)?;
        self.segments
            .register(draft, self.mode, &self.capacity)
            .map_err(|source| AppError::SegmentRejected {
                segment: describe(def),
                source,
            })
    }

    fn draft(&self, def: &SegmentDef, id: String) -> AppResult<SegmentDraft> {
        let kind = ConnectionType::parse(&def.start_connection).map_err(|source| {
            AppError::SegmentRejected {
                segment: describe(def),
                source,
            }
        })?;
        let resolved = self.fittings.resolve(def.nominal_diameter_mm);
        let equivalent_length_m = resolved.equivalent_length(&def.fittings, self.material)?;
        let min_pressure_kpa = def
            .min_pressure_kpa
            .unwrap_or_else(|| terminal(def.terminal).default_min_pressure_kpa());

        Ok(SegmentDraft {
            id,
            branch: def.branch.clone(),
            order: def.order,
            start_node: def.start_node.clone(),
            end_node: def.end_node.clone(),
            start_connection: kind,
            nominal_diameter_mm: def.nominal_diameter_mm,
            reference_diameter_mm: resolved.reference_diameter_mm,
            reference_diameter_inches: resolved.reference_inches,
            real_length_m: def.real_length_m,
            elevation_drop_m: def.elevation_drop_m,
            fixture_unit_weight: def.fixture_unit_weight,
            equivalent_length_m,
            min_pressure_kpa,
        })
    }
}

/// Compile a project: structural validation, parameter conversion, then
/// registration of every segment in file order.
pub fn compile_project(project: &Project) -> AppResult<CompiledNetwork> {
    bf_project::validate_project(project)?;
    let params = &project.params;

    let mode = notation(params.notation);
    let capacity = CapacityMap::new(params.capacity.entry, params.capacity.tee, params.capacity.cross)?;
    let material = material(params.material);
    let hw = HwCoefficients {
        pvc: params.hazen_williams.pvc,
        cast_iron: params.hazen_williams.cast_iron,
    };
    let kind = match params.head_loss_model {
        HeadLossModelDef::HazenWilliams => HeadLossKind::HazenWilliams,
        HeadLossModelDef::FairWhippleHsiao => HeadLossKind::FairWhippleHsiao,
    };
    let conflict_policy = match params.pressure_conflict {
        PressureConflictDef::Fail => ConflictPolicy::Fail,
        PressureConflictDef::Warn => ConflictPolicy::Warn,
    };
    let propagation = PropagationParams {
        flow: FlowParams::new(params.flow.k, params.flow.exponent)?,
        model: HeadLossModel::select(kind, material, &hw),
        conflict_policy,
    };

    let fittings = match project.active_fitting_table() {
        Some(table) => FittingTable::new(
            material,
            table
                .rows
                .iter()
                .map(|r| FittingRow {
                    diameter_mm: r.diameter_mm,
                    reference_inches: r.reference_inches.clone(),
                    lengths_m: r.lengths_m.clone(),
                })
                .collect(),
        )?,
        None => FittingTable::empty(material),
    };

    let mut boundaries: Vec<(NodeLabel, f64)> = Vec::with_capacity(project.boundaries.len());
    for b in &project.boundaries {
        let node = normalize_label(&b.node, mode)?;
        if boundaries.iter().any(|(seen, _)| *seen == node) {
            return Err(AppError::Validation(format!(
                "boundary node {} is given more than once (as {})",
                node, b.node
            )));
        }
        let p = match (b.pressure_kpa, b.head_m) {
            (Some(p), _) => p,
            (None, Some(h)) => head_m_to_kpa(h),
            (None, None) => {
                return Err(AppError::Validation(format!(
                    "boundary at {} has no pressure",
                    b.node
                )));
            }
        };
        boundaries.push((node, p));
    }

    let mut compiled = CompiledNetwork {
        segments: SegmentSet::new(),
        mode,
        capacity,
        material,
        fittings,
        params: propagation,
        default_pressure_kpa: head_m_to_kpa(params.operating_head_m),
        boundaries,
    };
    let taken: HashSet<&str> = project
        .segments
        .iter()
        .map(|def| def.id.trim())
        .filter(|id| !id.is_empty())
        .collect();
    let mut next_row = 0;
    for def in &project.segments {
        if def.id.trim().is_empty() {
            // Blank ids must come out the same on every compile.
            let id = loop {
                next_row += 1;
                let candidate = format!("row_{next_row}");
                if !taken.contains(candidate.as_str()) {
                    break candidate;
                }
            };
            compiled.register_as(def, id)?;
        } else {
            compiled.register(def)?;
        }
    }

    debug!(
        segments = compiled.segments.len(),
        boundaries = compiled.boundaries.len(),
        model = ?compiled.params.model.kind(),
        "project compiled"
    );
    Ok(compiled)
}

/// Write ids, normalized labels and orders from the compiled set back into
/// the project. Both must hold the same segments in the same order.
pub(crate) fn sync_segments(project: &mut Project, set: &SegmentSet) {
    for (def, seg) in project.segments.iter_mut().zip(set.iter()) {
        def.id = seg.id.clone();
        def.order = seg.order;
        def.start_node = seg.start_node.to_string();
        def.end_node = seg.end_node.to_string();
    }
}

pub(crate) fn notation(def: NotationDef) -> LabelMode {
    match def {
        NotationDef::Letters => LabelMode::Letters,
        NotationDef::Digits => LabelMode::Digits,
    }
}

fn material(def: MaterialDef) -> Material {
    match def {
        MaterialDef::Pvc => Material::Pvc,
        MaterialDef::CastIron => Material::CastIron,
    }
}

fn terminal(def: TerminalDef) -> TerminalKind {
    match def {
        TerminalDef::NoUse => TerminalKind::NoUse,
        TerminalDef::UsePoint => TerminalKind::UsePoint,
    }
}

fn describe(def: &SegmentDef) -> String {
    if def.id.is_empty() {
        format!("{}→{}", def.start_node, def.end_node)
    } else {
        def.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bf_project::schema::{BoundaryDef, FittingRowDef, FittingTableDef};
    use std::collections::BTreeMap;

    fn def(id: &str, start: &str, end: &str, connection: &str) -> SegmentDef {
        SegmentDef {
            id: id.to_string(),
            branch: "A".to_string(),
            order: 1,
            start_node: start.to_string(),
            end_node: end.to_string(),
            start_connection: connection.to_string(),
            nominal_diameter_mm: 26.0,
            real_length_m: 3.0,
            elevation_drop_m: 0.0,
            fixture_unit_weight: 1.0,
            terminal: TerminalDef::UsePoint,
            min_pressure_kpa: None,
            fittings: BTreeMap::new(),
        }
    }

    fn project() -> Project {
        let mut project = Project::new("compile");
        project.fitting_tables.push(FittingTableDef {
            material: MaterialDef::Pvc,
            rows: vec![
                FittingRowDef {
                    diameter_mm: 20.0,
                    reference_inches: Some("1/2".to_string()),
                    lengths_m: BTreeMap::from([("elbow_90".to_string(), 1.1)]),
                },
                FittingRowDef {
                    diameter_mm: 25.0,
                    reference_inches: Some("3/4".to_string()),
                    lengths_m: BTreeMap::from([("elbow_90".to_string(), 1.2)]),
                },
            ],
        });
        project
    }

    #[test]
    fn resolves_reference_diameter_and_equivalent_length() {
        let mut project = project();
        let mut seg = def("t1", "a", "b", "Entrada");
        seg.fittings.insert("elbow_90".to_string(), 3);
        project.segments.push(seg);

        let compiled = compile_project(&project).unwrap();
        let s = compiled.segments.get("t1").unwrap();
        assert_eq!(s.start_node.as_str(), "A");
        assert_eq!(s.reference_diameter_mm, 25.0);
        assert_eq!(s.reference_diameter_inches, "3/4");
        assert_relative_eq!(s.equivalent_length_m, 3.6, epsilon = 1e-12);
        assert_eq!(s.min_pressure_kpa, 10.0);
    }

    #[test]
    fn rejected_segment_names_its_id() {
        let mut project = project();
        project.segments.push(def("t1", "A", "B", "Tê"));
        project.segments.push(def("t2", "A", "C", "Entrada"));

        match compile_project(&project) {
            Err(AppError::SegmentRejected { segment, source }) => {
                assert_eq!(segment, "t2");
                assert!(matches!(source, bf_graph::TopologyError::TypeMismatch { .. }));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn unknown_connection_text_is_rejected() {
        let mut project = project();
        project.segments.push(def("t1", "A", "B", "elbow"));
        assert!(matches!(
            compile_project(&project),
            Err(AppError::SegmentRejected { .. })
        ));
    }

    #[test]
    fn boundaries_and_default_head_convert_to_kpa() {
        let mut project = project();
        project.params.operating_head_m = 5.0;
        project.boundaries.push(BoundaryDef {
            node: "a".to_string(),
            pressure_kpa: None,
            head_m: Some(2.0),
        });
        let compiled = compile_project(&project).unwrap();
        assert_relative_eq!(compiled.default_pressure_kpa, 49.033_25, epsilon = 1e-9);
        assert_eq!(compiled.boundaries[0].0.as_str(), "A");
        assert_relative_eq!(compiled.boundaries[0].1, 19.6133, epsilon = 1e-9);
    }

    #[test]
    fn digit_boundaries_are_unique_after_normalization() {
        let mut project = project();
        project.params.notation = NotationDef::Digits;
        for node in ["01", "1"] {
            project.boundaries.push(BoundaryDef {
                node: node.to_string(),
                pressure_kpa: Some(100.0),
                head_m: None,
            });
        }
        bf_project::validate_project(&project).unwrap();

        match compile_project(&project) {
            Err(AppError::Validation(msg)) => assert!(msg.contains("boundary node 1")),
            other => panic!("expected duplicate boundary, got {other:?}"),
        }
    }

    #[test]
    fn blank_ids_compile_to_stable_row_ids() {
        let mut project = project();
        project.segments.push(def("", "A", "B", "Entrada"));
        project.segments.push(def("row_2", "B", "C", "Tê"));
        project.segments.push(def("", "B", "D", "Tê"));

        let ids = |compiled: &CompiledNetwork| -> Vec<String> {
            compiled.segments.iter().map(|s| s.id.clone()).collect()
        };
        let first = compile_project(&project).unwrap();
        assert_eq!(ids(&first), vec!["row_1", "row_2", "row_3"]);
        assert_eq!(ids(&compile_project(&project).unwrap()), ids(&first));
    }
}
