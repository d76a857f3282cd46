//! Shared application service layer for branchflow.
//!
//! Frontends go through this crate for project management, compilation of
//! a project into a validated segment set, segment editing, propagation runs
//! and export of the enriched results.

pub mod compile;
pub mod edit_service;
pub mod error;
pub mod export;
pub mod project_service;
pub mod run_service;

// Re-export key types for convenience
pub use compile::{CompiledNetwork, compile_project};
pub use edit_service::{
    MoveDirection, add_segment, move_segment, remove_segment, set_segment_fittings,
    suggest_next_label,
};
pub use error::{AppError, AppResult};
pub use export::{CSV_HEADER, ExportFormat, export, export_csv, export_json, export_yaml};
pub use project_service::{
    BranchListing, list_branches, load_project, save_project, validate_project,
};
pub use run_service::{
    BranchSummary, RecordHydraulics, RunOutcome, SegmentRecord, apply_results, branch_summaries,
    run_project,
};
