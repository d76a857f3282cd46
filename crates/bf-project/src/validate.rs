//! Project validation logic.
//!
//! Structural checks only. Topology rules (labels, duplicate edges,
//! capacities) are enforced when the project is compiled into a segment set.

use std::collections::HashSet;

use crate::schema::{
    BoundaryDef, FittingTableDef, LATEST_VERSION, ParamsDef, Project, SegmentDef,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }
    if project.name.trim().is_empty() {
        return Err(invalid("name", &project.name, "must not be empty"));
    }

    validate_params(&project.params)?;

    let mut materials = HashSet::new();
    for table in &project.fitting_tables {
        if !materials.insert(table.material) {
            return Err(ValidationError::DuplicateId {
                id: format!("{:?}", table.material),
                context: "fitting_tables".to_string(),
            });
        }
        validate_fitting_table(table)?;
    }

    let mut boundary_nodes = HashSet::new();
    for boundary in &project.boundaries {
        if !boundary_nodes.insert(boundary.node.trim().to_uppercase()) {
            return Err(ValidationError::DuplicateId {
                id: boundary.node.clone(),
                context: "boundaries".to_string(),
            });
        }
        validate_boundary(boundary)?;
    }

    let fitting_names: Option<HashSet<&str>> = project.active_fitting_table().map(|t| {
        t.rows
            .iter()
            .flat_map(|r| r.lengths_m.keys().map(String::as_str))
            .collect()
    });

    let mut segment_ids = HashSet::new();
    for segment in &project.segments {
        let id = segment.id.trim();
        if !id.is_empty() && !segment_ids.insert(id) {
            return Err(ValidationError::DuplicateId {
                id: id.to_string(),
                context: "segments".to_string(),
            });
        }
        validate_segment(segment)?;

        for name in segment.fittings.keys() {
            let known = fitting_names
                .as_ref()
                .is_some_and(|names| names.contains(name.as_str()));
            if !known {
                return Err(ValidationError::MissingReference {
                    id: name.clone(),
                    context: format!("fittings of segment {}", segment.id),
                });
            }
        }
    }

    Ok(())
}

fn validate_params(params: &ParamsDef) -> Result<(), ValidationError> {
    for (field, value) in [
        ("params.capacity.entry", params.capacity.entry),
        ("params.capacity.tee", params.capacity.tee),
        ("params.capacity.cross", params.capacity.cross),
    ] {
        if value < 1 {
            return Err(invalid(field, value, "must be at least 1"));
        }
    }

    if !params.flow.k.is_finite() || params.flow.k < 0.0 {
        return Err(invalid("params.flow.k", params.flow.k, "must be finite and >= 0"));
    }
    if !params.flow.exponent.is_finite() || params.flow.exponent <= 0.0 {
        return Err(invalid(
            "params.flow.exponent",
            params.flow.exponent,
            "must be finite and > 0",
        ));
    }
    for (field, c) in [
        ("params.hazen_williams.pvc", params.hazen_williams.pvc),
        ("params.hazen_williams.cast_iron", params.hazen_williams.cast_iron),
    ] {
        if !c.is_finite() || c <= 0.0 {
            return Err(invalid(field, c, "must be finite and > 0"));
        }
    }
    if !params.operating_head_m.is_finite() {
        return Err(invalid(
            "params.operating_head_m",
            params.operating_head_m,
            "must be finite",
        ));
    }
    Ok(())
}

fn validate_fitting_table(table: &FittingTableDef) -> Result<(), ValidationError> {
    if table.rows.is_empty() {
        return Err(invalid(
            "fitting_tables.rows",
            format!("{:?}", table.material),
            "table must have at least one row",
        ));
    }
    for row in &table.rows {
        if !row.diameter_mm.is_finite() || row.diameter_mm <= 0.0 {
            return Err(invalid(
                "fitting_tables.rows.diameter_mm",
                row.diameter_mm,
                "must be finite and > 0",
            ));
        }
        for (name, length) in &row.lengths_m {
            if !length.is_finite() || *length < 0.0 {
                return Err(invalid(
                    &format!("fitting_tables.rows.lengths_m.{name}"),
                    length,
                    "must be finite and >= 0",
                ));
            }
        }
    }
    Ok(())
}

fn validate_boundary(boundary: &BoundaryDef) -> Result<(), ValidationError> {
    if boundary.node.trim().is_empty() {
        return Err(invalid("boundaries.node", &boundary.node, "must not be empty"));
    }
    let value = match (boundary.pressure_kpa, boundary.head_m) {
        (Some(p), None) => p,
        (None, Some(h)) => h,
        _ => {
            return Err(invalid(
                "boundaries",
                &boundary.node,
                "exactly one of pressure_kpa or head_m must be set",
            ));
        }
    };
    if !value.is_finite() {
        return Err(invalid("boundaries.value", value, "must be finite"));
    }
    Ok(())
}

fn validate_segment(segment: &SegmentDef) -> Result<(), ValidationError> {
    let context = |field: &str| format!("segments[{}].{field}", segment.id);

    for (field, value) in [
        ("nominal_diameter_mm", segment.nominal_diameter_mm),
        ("real_length_m", segment.real_length_m),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(&context(field), value, "must be finite and >= 0"));
        }
    }
    for (field, value) in [
        ("elevation_drop_m", segment.elevation_drop_m),
        ("fixture_unit_weight", segment.fixture_unit_weight),
    ] {
        if !value.is_finite() {
            return Err(invalid(&context(field), value, "must be finite"));
        }
    }
    if let Some(p) = segment.min_pressure_kpa.filter(|p| !p.is_finite()) {
        return Err(invalid(&context("min_pressure_kpa"), p, "must be finite"));
    }
    Ok(())
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FittingRowDef, MaterialDef};
    use std::collections::BTreeMap;

    fn segment(id: &str) -> SegmentDef {
        SegmentDef {
            id: id.to_string(),
            branch: "A".to_string(),
            order: 1,
            start_node: "A".to_string(),
            end_node: "B".to_string(),
            start_connection: "Entrada".to_string(),
            nominal_diameter_mm: 25.0,
            real_length_m: 3.0,
            elevation_drop_m: 0.0,
            fixture_unit_weight: 1.0,
            terminal: Default::default(),
            min_pressure_kpa: None,
            fittings: BTreeMap::new(),
        }
    }

    #[test]
    fn default_project_is_valid() {
        validate_project(&Project::new("demo")).unwrap();
    }

    #[test]
    fn rejects_future_version() {
        let mut project = Project::new("demo");
        project.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn rejects_zero_capacity() {
        let mut project = Project::new("demo");
        project.params.capacity.tee = 0;
        let err = validate_project(&project).unwrap_err();
        assert!(err.to_string().contains("capacity.tee"));
    }

    #[test]
    fn rejects_duplicate_segment_ids_but_allows_blank_ones() {
        let mut project = Project::new("demo");
        project.segments = vec![segment(""), segment(""), segment("t1")];
        validate_project(&project).unwrap();

        project.segments.push(segment("t1"));
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn boundary_needs_exactly_one_value() {
        let mut project = Project::new("demo");
        project.boundaries = vec![BoundaryDef {
            node: "A".to_string(),
            pressure_kpa: Some(100.0),
            head_m: Some(10.0),
        }];
        assert!(validate_project(&project).is_err());

        project.boundaries[0].head_m = None;
        validate_project(&project).unwrap();
    }

    #[test]
    fn fittings_must_exist_in_active_table() {
        let mut project = Project::new("demo");
        let mut seg = segment("t1");
        seg.fittings.insert("elbow_90".to_string(), 2);
        project.segments.push(seg);
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::MissingReference { .. })
        ));

        project.fitting_tables.push(FittingTableDef {
            material: MaterialDef::Pvc,
            rows: vec![FittingRowDef {
                diameter_mm: 25.0,
                reference_inches: Some("3/4".to_string()),
                lengths_m: BTreeMap::from([("elbow_90".to_string(), 1.2)]),
            }],
        });
        validate_project(&project).unwrap();
    }

    #[test]
    fn rejects_two_tables_for_one_material() {
        let table = FittingTableDef {
            material: MaterialDef::Pvc,
            rows: vec![FittingRowDef {
                diameter_mm: 25.0,
                reference_inches: None,
                lengths_m: BTreeMap::from([("elbow_90".to_string(), 1.2)]),
            }],
        };
        let mut project = Project::new("demo");
        project.fitting_tables = vec![table.clone(), table];
        match validate_project(&project) {
            Err(ValidationError::DuplicateId { context, .. }) => {
                assert_eq!(context, "fitting_tables")
            }
            other => panic!("expected duplicate table, got {other:?}"),
        }

        project.fitting_tables[1].material = MaterialDef::CastIron;
        validate_project(&project).unwrap();
    }
}
