//! On-disk snapshot and per-project metadata
//!
//! Layout under the public directory:
//! - `behance-cache.json`: the listing snapshot
//! - `projects/{slug}/meta.json`: one record per downloaded project

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CacheError;
use crate::models::{CacheSnapshot, ProjectMeta};

/// Metadata file name inside each project folder
pub const META_FILE: &str = "meta.json";

type Result<T> = std::result::Result<T, CacheError>;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(CacheError::Io(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )));
        }
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|e| CacheError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            CacheError::Io(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }

    let json = serde_json::to_string_pretty(value).map_err(|e| CacheError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    std::fs::write(path, json)
        .map_err(|e| CacheError::Io(format!("Failed to write {}: {}", path.display(), e)))
}

/// Read the snapshot; `None` when the file does not exist
pub fn read_snapshot(path: &Path) -> Result<Option<CacheSnapshot>> {
    read_json(path)
}

/// Replace the snapshot file, creating parent directories as needed
pub fn write_snapshot(path: &Path, snapshot: &CacheSnapshot) -> Result<()> {
    write_json(path, snapshot)?;
    log::info!(
        "Saved {} projects to {}",
        snapshot.projects.len(),
        path.display()
    );
    Ok(())
}

pub fn project_dir(projects_dir: &Path, slug: &str) -> PathBuf {
    projects_dir.join(slug)
}

pub fn meta_path(projects_dir: &Path, slug: &str) -> PathBuf {
    project_dir(projects_dir, slug).join(META_FILE)
}

/// Read `{projects_dir}/{slug}/meta.json`; `None` when absent
pub fn read_meta(projects_dir: &Path, slug: &str) -> Result<Option<ProjectMeta>> {
    read_json(&meta_path(projects_dir, slug))
}

/// Write a project's `meta.json` under its slug folder
pub fn write_meta(projects_dir: &Path, meta: &ProjectMeta) -> Result<PathBuf> {
    let path = meta_path(projects_dir, &meta.project.slug);
    write_json(&path, meta)?;
    Ok(path)
}

/// Every `meta.json` path under `projects_dir`, sorted by folder name
pub fn list_meta_files(projects_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(projects_dir)
        .map_err(|_| CacheError::NoMetadata(projects_dir.display().to_string()))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .map(|dir| dir.join(META_FILE))
        .collect();
    paths.sort();
    Ok(paths)
}

/// Parse one `meta.json` file
pub fn load_meta_file(path: &Path) -> Result<ProjectMeta> {
    read_json(path)?.ok_or_else(|| CacheError::Io(format!("{} not found", path.display())))
}
