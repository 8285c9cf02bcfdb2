// src/config/loader.rs

use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::config::model::ProjectFile;
use crate::errors::Result;

/// Read and deserialize a project file.
///
/// Semantic checks happen later, on the merged [`crate::config::Config`].
pub fn load_project_file(path: impl AsRef<Path>) -> Result<ProjectFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading project file at {:?}", path))?;

    let file: ProjectFile = toml::from_str(&contents)?;
    Ok(file)
}
