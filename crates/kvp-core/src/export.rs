//! JSON export of a single project.
//!
//! The document is the project serialized verbatim, derived improvement
//! figure included, dates as `YYYY-MM-DD`.

use crate::error::Result;
use crate::paths;
use crate::project::Project;
use std::path::{Path, PathBuf};

pub fn to_json(project: &Project) -> Result<String> {
    Ok(serde_json::to_string_pretty(project)?)
}

/// Parse an exported document. Unknown keys are rejected.
pub fn from_json(data: &str) -> Result<Project> {
    Ok(serde_json::from_str(data)?)
}

pub fn export_filename(project: &Project) -> String {
    paths::export_file_name(&project.name)
}

/// Write the export into `dir` and return the file path.
pub fn write_export(project: &Project, dir: &Path) -> Result<PathBuf> {
    let path = paths::export_path(dir, &project.name);
    let mut data = to_json(project)?;
    data.push('\n');
    crate::io::atomic_write(&path, data.as_bytes())?;
    Ok(path)
}

pub fn read_export(path: &Path) -> Result<Project> {
    let data = std::fs::read_to_string(path)?;
    from_json(&data)
}
