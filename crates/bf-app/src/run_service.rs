//! Propagation runs and the "apply results" step.

use bf_graph::SegmentSet;
use bf_project::schema::Project;
use bf_solver::{PropagationReport, SegmentResult, propagate};
use serde::Serialize;
use tracing::info;

use crate::compile::compile_project;
use crate::error::AppResult;

/// Computed hydraulics of a reached segment, as exported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordHydraulics {
    pub flow_lps: f64,
    pub velocity_mps: f64,
    pub gradient_kpa_per_m: f64,
    pub p_in_kpa: f64,
    pub hf_cont_kpa: f64,
    pub hf_loc_kpa: f64,
    pub p_disp_kpa: f64,
    pub p_out_kpa: f64,
    pub p_out_mwc: f64,
    pub margin_kpa: f64,
}

impl From<&SegmentResult> for RecordHydraulics {
    fn from(r: &SegmentResult) -> Self {
        Self {
            flow_lps: r.flow_lps,
            velocity_mps: r.velocity_mps,
            gradient_kpa_per_m: r.gradient_kpa_per_m,
            p_in_kpa: r.p_in_kpa,
            hf_cont_kpa: r.hf_cont_kpa,
            hf_loc_kpa: r.hf_loc_kpa,
            p_disp_kpa: r.p_disp_kpa,
            p_out_kpa: r.p_out_kpa,
            p_out_mwc: r.p_out_mwc,
            margin_kpa: r.margin_kpa,
        }
    }
}

/// A segment's stored fields enriched with its run results.
///
/// `hydraulics` is `None` for segments no source reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRecord {
    pub id: String,
    pub branch: String,
    pub order: u32,
    pub start_node: String,
    pub end_node: String,
    pub start_connection: String,
    pub nominal_diameter_mm: f64,
    pub reference_diameter_mm: f64,
    pub reference_diameter_inches: String,
    pub real_length_m: f64,
    pub elevation_drop_m: f64,
    pub fixture_unit_weight: f64,
    pub equivalent_length_m: f64,
    pub min_pressure_kpa: f64,
    #[serde(flatten)]
    pub hydraulics: Option<RecordHydraulics>,
}

/// Per-branch totals over a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchSummary {
    pub branch: String,
    pub segment_count: usize,
    pub total_real_length_m: f64,
    pub total_equivalent_length_m: f64,
    pub total_hf_cont_kpa: f64,
    pub total_hf_loc_kpa: f64,
    /// Smallest margin over the reached segments of the branch.
    pub min_margin_kpa: Option<f64>,
}

/// Everything a frontend needs after a run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: PropagationReport,
    pub records: Vec<SegmentRecord>,
    pub branches: Vec<BranchSummary>,
}

impl RunOutcome {
    pub fn is_complete(&self) -> bool {
        self.report.is_complete()
    }
}

/// Compile and propagate a project. The project itself is not modified.
pub fn run_project(project: &Project) -> AppResult<RunOutcome> {
    let compiled = compile_project(project)?;
    let problem = compiled.problem()?;
    let report = propagate(&problem)?;

    let records = apply_results(&compiled.segments, &report);
    let branches = branch_summaries(&records);

    info!(
        project = %project.name,
        segments = records.len(),
        unreachable = report.unreachable.len(),
        "run complete"
    );

    Ok(RunOutcome {
        report,
        records,
        branches,
    })
}

/// Join segments with their results, in segment-set order.
pub fn apply_results(segments: &SegmentSet, report: &PropagationReport) -> Vec<SegmentRecord> {
    segments
        .iter()
        .map(|s| SegmentRecord {
            id: s.id.clone(),
            branch: s.branch.clone(),
            order: s.order,
            start_node: s.start_node.to_string(),
            end_node: s.end_node.to_string(),
            start_connection: s.start_connection.to_string(),
            nominal_diameter_mm: s.nominal_diameter_mm,
            reference_diameter_mm: s.reference_diameter_mm,
            reference_diameter_inches: s.reference_diameter_inches.clone(),
            real_length_m: s.real_length_m,
            elevation_drop_m: s.elevation_drop_m,
            fixture_unit_weight: s.fixture_unit_weight,
            equivalent_length_m: s.equivalent_length_m,
            min_pressure_kpa: s.min_pressure_kpa,
            hydraulics: report.record(&s.id).map(RecordHydraulics::from),
        })
        .collect()
}

/// Totals per branch, sorted by branch name.
pub fn branch_summaries(records: &[SegmentRecord]) -> Vec<BranchSummary> {
    let mut summaries: Vec<BranchSummary> = Vec::new();
    for r in records {
        let idx = match summaries.iter().position(|s| s.branch == r.branch) {
            Some(idx) => idx,
            None => {
                summaries.push(BranchSummary {
                    branch: r.branch.clone(),
                    segment_count: 0,
                    total_real_length_m: 0.0,
                    total_equivalent_length_m: 0.0,
                    total_hf_cont_kpa: 0.0,
                    total_hf_loc_kpa: 0.0,
                    min_margin_kpa: None,
                });
                summaries.len() - 1
            }
        };
        let s = &mut summaries[idx];
        s.segment_count += 1;
        s.total_real_length_m += r.real_length_m;
        s.total_equivalent_length_m += r.equivalent_length_m;
        if let Some(h) = &r.hydraulics {
            s.total_hf_cont_kpa += h.hf_cont_kpa;
            s.total_hf_loc_kpa += h.hf_loc_kpa;
            s.min_margin_kpa = Some(match s.min_margin_kpa {
                Some(m) => m.min(h.margin_kpa),
                None => h.margin_kpa,
            });
        }
    }
    summaries.sort_by(|a, b| a.branch.cmp(&b.branch));
    summaries
}
