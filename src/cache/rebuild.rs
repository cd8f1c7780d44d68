//! Rebuild the snapshot from downloaded project metadata

use std::path::Path;

use crate::cache::storage::{list_meta_files, load_meta_file};
use crate::models::{CacheSnapshot, ProjectMeta, ProjectSummary};

/// Prefix some scraped titles carry from the card's link label
const LINK_TITLE_PREFIX: &str = "Link to project - ";

fn summary_from_meta(meta: ProjectMeta) -> ProjectSummary {
    let cover = meta
        .local_cover_path
        .clone()
        .or_else(|| meta.gallery().first().cloned());

    let mut project = meta.project;
    if let Some(stripped) = project.title.strip_prefix(LINK_TITLE_PREFIX) {
        project.title = stripped.to_string();
    }
    project.cover_image_url = cover;
    project
}

fn numeric_id(project: &ProjectSummary) -> u64 {
    project
        .id
        .as_deref()
        .and_then(|id| id.parse().ok())
        .unwrap_or(0)
}

/// Build a snapshot from every readable `meta.json` under `projects_dir`.
///
/// Unreadable or malformed entries are skipped. Projects are ordered
/// newest first by numeric id.
pub fn rebuild_snapshot(
    projects_dir: &Path,
    profile_url: &str,
) -> crate::error::Result<CacheSnapshot> {
    let mut projects = Vec::new();

    for path in list_meta_files(projects_dir)? {
        match load_meta_file(&path) {
            Ok(meta) => {
                log::debug!("Loaded {}", path.display());
                projects.push(summary_from_meta(meta));
            }
            Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
        }
    }

    projects.sort_by_key(|p| std::cmp::Reverse(numeric_id(p)));

    Ok(CacheSnapshot::new(profile_url, projects))
}
