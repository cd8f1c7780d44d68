//! Mirror project images to disk for static serving
//!
//! Each project gets `{projects_dir}/{slug}/` holding `cover.{ext}`,
//! `gallery-NN.{ext}` files and a `meta.json` pointing at them. The
//! snapshot is rewritten afterwards with local cover paths.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;

use crate::cache::{PortfolioService, storage};
use crate::client::PageFetcher;
use crate::config::PROJECTS_DIR;
use crate::error::Result;
use crate::models::{CacheSnapshot, ProjectMeta, ProjectSummary};
use crate::text::normalize_profile_url;

/// Gallery images saved per project
pub const MAX_GALLERY_IMAGES: usize = 15;

static IMAGE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|webp|gif)").expect("valid extension regex"));

/// Pacing and presentation for a download run
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub image_delay: Duration,
    pub project_delay: Duration,
    pub show_progress: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            image_delay: Duration::from_millis(150),
            project_delay: Duration::from_millis(500),
            show_progress: true,
        }
    }
}

/// Outcome of a download run
#[derive(Debug, Clone)]
pub struct DownloadReport {
    /// Snapshot written at the end of the run (absent when nothing was listed)
    pub snapshot: Option<CacheSnapshot>,
    pub covers: usize,
    pub gallery_images: usize,
    /// Slugs claimed by more than one project; the later project's files win
    pub slug_collisions: Vec<String>,
}

/// File extension for an image URL, `jpg` when none is recognisable
pub fn image_extension(url: &str) -> String {
    IMAGE_EXTENSION
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_lowercase())
        .unwrap_or_else(|| "jpg".to_string())
}

/// Site-relative path served for a file in a project folder
fn local_path(slug: &str, file_name: &str) -> String {
    format!("/{}/{}/{}", PROJECTS_DIR, slug, file_name)
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Download one image; failures are logged and reported as `false`
async fn download_image<F: PageFetcher + ?Sized>(fetcher: &F, url: &str, dest: &Path) -> bool {
    let bytes = match fetcher.fetch_image(url).await {
        Ok(b) => b,
        Err(e) => {
            log::warn!("Failed to download {}: {}", url, e);
            return false;
        }
    };

    if let Some(parent) = dest.parent()
        && let Err(e) = tokio::fs::create_dir_all(parent).await
    {
        log::warn!("Failed to create {}: {}", parent.display(), e);
        return false;
    }

    match tokio::fs::write(dest, bytes).await {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to write {}: {}", dest.display(), e);
            false
        }
    }
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    let style = ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

/// Download covers and gallery images for every listed project.
pub async fn download_images<F: PageFetcher>(
    service: &PortfolioService<F>,
    options: &DownloadOptions,
) -> Result<DownloadReport> {
    let config = service.config();
    let projects_dir = config.projects_dir();

    let projects = service.get_projects(None, None, true).await;
    if projects.is_empty() {
        log::warn!("No projects listed, nothing to download");
        return Ok(DownloadReport {
            snapshot: None,
            covers: 0,
            gallery_images: 0,
            slug_collisions: Vec::new(),
        });
    }

    tokio::fs::create_dir_all(&projects_dir).await?;

    let bar = progress_bar(projects.len() as u64, options.show_progress);
    let mut updated: Vec<ProjectSummary> = Vec::with_capacity(projects.len());
    let mut covers = 0;
    let mut gallery_images = 0;
    let mut seen_slugs: HashSet<String> = HashSet::new();
    let mut slug_collisions = Vec::new();

    for project in projects {
        bar.set_message(project.title.clone());
        if !seen_slugs.insert(project.slug.clone()) {
            log::warn!(
                "Slug {} already used by another project, {} overwrites its folder",
                project.slug,
                project.url
            );
            slug_collisions.push(project.slug.clone());
        }
        let project_dir = storage::project_dir(&projects_dir, &project.slug);
        tokio::fs::create_dir_all(&project_dir).await?;

        let mut local_cover_path = None;
        if let Some(ref cover_url) = project.cover_image_url {
            let file_name = format!("cover.{}", image_extension(cover_url));
            if download_image(service.fetcher(), cover_url, &project_dir.join(&file_name)).await {
                local_cover_path = Some(local_path(&project.slug, &file_name));
                covers += 1;
            }
        }

        let mut local_gallery_paths = Vec::new();
        match service.get_project_detail(&project.url, true, None).await {
            Some(detail) if !detail.images.is_empty() => {
                for (index, image_url) in detail.images.iter().take(MAX_GALLERY_IMAGES).enumerate() {
                    let file_name =
                        format!("gallery-{:02}.{}", index + 1, image_extension(image_url));
                    if download_image(service.fetcher(), image_url, &project_dir.join(&file_name))
                        .await
                    {
                        local_gallery_paths.push(local_path(&project.slug, &file_name));
                    }
                    pause(options.image_delay).await;
                }
            }
            _ => log::info!("No gallery images for {}", project.url),
        }
        gallery_images += local_gallery_paths.len();

        let meta = ProjectMeta {
            project: project.clone(),
            local_cover_path: local_cover_path.clone(),
            local_gallery_paths: Some(local_gallery_paths),
        };
        storage::write_meta(&projects_dir, &meta)?;

        updated.push(ProjectSummary {
            cover_image_url: local_cover_path.or(project.cover_image_url.clone()),
            ..project
        });

        bar.inc(1);
        pause(options.project_delay).await;
    }
    bar.finish_and_clear();

    let snapshot = CacheSnapshot::new(normalize_profile_url(&config.profile_url), updated);
    storage::write_snapshot(&config.snapshot_path(), &snapshot)?;

    Ok(DownloadReport {
        snapshot: Some(snapshot),
        covers,
        gallery_images,
        slug_collisions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockFetcher;
    use crate::config::Config;
    use tempfile::TempDir;

    const PROFILE: &str = "https://www.behance.net/someone";
    const PROJECT_URL: &str = "https://www.behance.net/gallery/11/Eleven";

    fn quiet() -> DownloadOptions {
        DownloadOptions {
            image_delay: Duration::ZERO,
            project_delay: Duration::ZERO,
            show_progress: false,
        }
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("https://cdn/x/cover.PNG?v=1"), "png");
        assert_eq!(image_extension("https://cdn/x/a.jpeg"), "jpeg");
        assert_eq!(image_extension("https://cdn/x/rendition"), "jpg");
    }

    #[tokio::test]
    async fn test_download_writes_files_meta_and_snapshot() {
        let dir = TempDir::new().unwrap();
        let listing = format!(
            r#"<div class="ProjectCover">
                 <a href="{PROJECT_URL}" title="Eleven">Eleven</a>
                 <img src="https://mir-s3-cdn-cf.behance.net/projects/404/cover.webp">
               </div>"#
        );
        let detail = r#"
            <meta property="og:title" content="Eleven">
            <img src="https://mir-s3-cdn-cf.behance.net/project_modules/1400/one.png">
            <img src="https://mir-s3-cdn-cf.behance.net/project_modules/1400/two.gif">
        "#;

        let fetcher = MockFetcher::new()
            .with_page(PROFILE, &listing)
            .await
            .with_page(PROJECT_URL, detail)
            .await
            .with_image("https://mir-s3-cdn-cf.behance.net/projects/404/cover.webp", b"c")
            .await
            .with_image(
                "https://mir-s3-cdn-cf.behance.net/project_modules/1400/one.png",
                b"1",
            )
            .await;

        let config = Config {
            profile_url: PROFILE.to_string(),
            public_dir: dir.path().to_path_buf(),
            page_delay_ms: 0,
            ..Config::default()
        };
        let service = PortfolioService::new(fetcher, config.clone());

        let report = download_images(&service, &quiet()).await.unwrap();
        assert_eq!(report.covers, 1);
        // two.gif is not served by the mock and is skipped
        assert_eq!(report.gallery_images, 1);

        let slug_dir = config.projects_dir().join("11-eleven");
        assert_eq!(std::fs::read(slug_dir.join("cover.webp")).unwrap(), b"c");
        assert_eq!(std::fs::read(slug_dir.join("gallery-01.png")).unwrap(), b"1");
        assert!(!slug_dir.join("gallery-02.gif").exists());

        let meta = storage::read_meta(&config.projects_dir(), "11-eleven")
            .unwrap()
            .unwrap();
        assert_eq!(
            meta.local_cover_path.as_deref(),
            Some("/projects/11-eleven/cover.webp")
        );
        assert_eq!(meta.gallery(), ["/projects/11-eleven/gallery-01.png"]);

        let snapshot = storage::read_snapshot(&config.snapshot_path())
            .unwrap()
            .unwrap();
        assert_eq!(
            snapshot.projects[0].cover_image_url.as_deref(),
            Some("/projects/11-eleven/cover.webp")
        );
        assert!(report.slug_collisions.is_empty());
    }

    #[tokio::test]
    async fn test_slug_collision_is_reported() {
        let dir = TempDir::new().unwrap();
        // Two distinct URLs without ids that slugify to the same folder
        let listing = r#"
            <a href="https://www.behance.net/gallery/Same-Name" title="Same Name">Same Name</a>
            <a href="https://www.behance.net/gallery/same-name" title="Same name">Same name</a>
        "#;
        let fetcher = MockFetcher::new().with_page(PROFILE, listing).await;

        let config = Config {
            profile_url: PROFILE.to_string(),
            public_dir: dir.path().to_path_buf(),
            page_delay_ms: 0,
            ..Config::default()
        };
        let service = PortfolioService::new(fetcher, config.clone());

        let report = download_images(&service, &quiet()).await.unwrap();
        let snapshot = report.snapshot.unwrap();
        assert_eq!(snapshot.projects.len(), 2);
        assert_eq!(snapshot.projects[0].slug, snapshot.projects[1].slug);
        assert_eq!(report.slug_collisions, vec![snapshot.projects[1].slug.clone()]);

        let meta = storage::read_meta(&config.projects_dir(), &snapshot.projects[1].slug)
            .unwrap()
            .unwrap();
        assert_eq!(meta.project.url, "https://www.behance.net/gallery/same-name");
    }
}
