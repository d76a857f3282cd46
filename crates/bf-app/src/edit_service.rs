//! Segment editing on a project.
//!
//! Every operation compiles the project first, so edits are only applied to
//! projects whose segments already satisfy the topology rules, and writes
//! generated ids and normalized labels back into the project.

use std::collections::BTreeMap;

use bf_graph::{NodeLabel, next_label, normalize_label};
use bf_project::schema::{Project, SegmentDef};

use crate::compile::{compile_project, notation, sync_segments};
use crate::error::{AppError, AppResult};

/// Direction for [`move_segment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Validate `def` against the project's segments and append it at the end
/// of its branch. Returns the assigned id.
pub fn add_segment(project: &mut Project, mut def: SegmentDef) -> AppResult<String> {
    let mut compiled = compile_project(project)?;
    def.order = compiled.segments.branch_segments(&def.branch).len() as u32 + 1;

    let id = compiled.register(&def)?;
    project.segments.push(def);
    sync_segments(project, &compiled.segments);
    Ok(id)
}

/// Delete a segment and renumber the branches.
pub fn remove_segment(project: &mut Project, id: &str) -> AppResult<SegmentDef> {
    let mut compiled = compile_project(project)?;
    sync_segments(project, &compiled.segments);

    let pos = position(project, id)?;
    compiled.segments.remove(id)?;
    let removed = project.segments.remove(pos);
    sync_segments(project, &compiled.segments);
    Ok(removed)
}

/// Swap a segment with its neighbour in the branch. Returns whether it moved.
pub fn move_segment(project: &mut Project, id: &str, direction: MoveDirection) -> AppResult<bool> {
    let mut compiled = compile_project(project)?;
    sync_segments(project, &compiled.segments);
    position(project, id)?;

    let moved = match direction {
        MoveDirection::Up => compiled.segments.move_up(id)?,
        MoveDirection::Down => compiled.segments.move_down(id)?,
    };
    sync_segments(project, &compiled.segments);
    Ok(moved)
}

/// Replace the fitting quantities of a segment. Returns the new equivalent
/// length in metres.
pub fn set_segment_fittings(
    project: &mut Project,
    id: &str,
    quantities: BTreeMap<String, u32>,
) -> AppResult<f64> {
    let compiled = compile_project(project)?;
    sync_segments(project, &compiled.segments);

    let pos = position(project, id)?;
    let nominal = project.segments[pos].nominal_diameter_mm;
    let resolved = compiled.fittings.resolve(nominal);
    // Names are checked even when their quantity is zero.
    let length_m = resolved.equivalent_length(&quantities, compiled.material)?;
    let quantities: BTreeMap<String, u32> =
        quantities.into_iter().filter(|(_, qty)| *qty > 0).collect();

    project.segments[pos].fittings = quantities;
    Ok(length_m)
}

/// Label following the highest node label of the project, for quick entry
/// of the next segment. Labels that do not fit the notation are skipped.
pub fn suggest_next_label(project: &Project) -> NodeLabel {
    let mode = notation(project.params.notation);
    // Normalized labels of either notation order by length, then text.
    let highest = project
        .segments
        .iter()
        .flat_map(|s| [s.start_node.as_str(), s.end_node.as_str()])
        .filter_map(|raw| normalize_label(raw, mode).ok())
        .max_by(|a, b| a.as_str().len().cmp(&b.as_str().len()).then_with(|| a.cmp(b)));
    next_label(highest.as_ref().map_or("", NodeLabel::as_str), mode)
}

fn position(project: &Project, id: &str) -> AppResult<usize> {
    project
        .segments
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| AppError::SegmentNotFound(id.to_string()))
}
