//! Project loading, saving, validation, and introspection.

use std::path::Path;

use bf_project::ProjectFormat;
use bf_project::schema::Project;

use crate::error::{AppError, AppResult};

/// Summary of a branch for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchListing {
    pub branch: String,
    /// Segment ids in display order.
    pub segment_ids: Vec<String>,
}

/// Load a project from a YAML or JSON file and validate its structure.
pub fn load_project(path: &Path) -> AppResult<Project> {
    let format = ProjectFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ProjectFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let project: Project = match format {
        ProjectFormat::Yaml => serde_yaml::from_str(&content)
            .map_err(|e| AppError::Project(format!("Failed to parse project YAML: {}", e)))?,
        ProjectFormat::Json => serde_json::from_str(&content)
            .map_err(|e| AppError::Project(format!("Failed to parse project JSON: {}", e)))?,
    };

    validate_project(&project)?;
    Ok(project)
}

/// Save a project, in the format implied by the file extension.
pub fn save_project(path: &Path, project: &Project) -> AppResult<()> {
    validate_project(project)?;
    let content = match ProjectFormat::from_path(path)? {
        ProjectFormat::Yaml => serde_yaml::to_string(project)
            .map_err(|e| AppError::Project(format!("Failed to serialize project: {}", e)))?,
        ProjectFormat::Json => serde_json::to_string_pretty(project)
            .map_err(|e| AppError::Project(format!("Failed to serialize project: {}", e)))?,
    };

    std::fs::write(path, content).map_err(|e| AppError::ProjectFileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Validate project structure. Topology is checked by compilation.
pub fn validate_project(project: &Project) -> AppResult<()> {
    bf_project::validate_project(project)?;
    Ok(())
}

/// Branches of the project, sorted by name, with their segments in order.
pub fn list_branches(project: &Project) -> Vec<BranchListing> {
    let mut names: Vec<&str> = project.segments.iter().map(|s| s.branch.as_str()).collect();
    names.sort_unstable();
    names.dedup();

    names
        .into_iter()
        .map(|branch| {
            let mut members: Vec<_> = project
                .segments
                .iter()
                .filter(|s| s.branch == branch)
                .collect();
            members.sort_by_key(|s| s.order);
            BranchListing {
                branch: branch.to_string(),
                segment_ids: members.into_iter().map(|s| s.id.clone()).collect(),
            }
        })
        .collect()
}
