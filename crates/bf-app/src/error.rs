//! Error types for the bf-app service layer.

use std::path::PathBuf;

use bf_graph::TopologyError;
use bf_hydraulics::HydraulicError;
use bf_solver::SolverError;

/// Application error type that wraps errors from the backend crates and
/// gives frontends a single error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to read project file: {path}")]
    ProjectFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write project file: {path}")]
    ProjectFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error("Segment not found: {0}")]
    SegmentNotFound(String),

    /// A segment of the project failed topology validation.
    #[error("Segment {segment} rejected: {source}")]
    SegmentRejected {
        segment: String,
        source: TopologyError,
    },

    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("Hydraulics error: {0}")]
    Hydraulics(#[from] HydraulicError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for bf-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<bf_project::ProjectError> for AppError {
    fn from(err: bf_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<bf_project::ValidationError> for AppError {
    fn from(err: bf_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}
