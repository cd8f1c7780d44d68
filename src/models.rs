//! Project records produced by the scraper and stored in the caches

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Ids arrive as strings or bare numbers depending on who wrote the file
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// One project from a profile listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    /// Source-assigned identifier
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    pub title: String,

    /// Canonical absolute URL, unique within one scrape
    pub url: String,

    /// Internal identifier derived from the URL (not guaranteed unique)
    pub slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,

    /// Category labels in source order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appreciations: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<u64>,
}

/// Full content of a single project page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Deduplicated, at most 12
    #[serde(default)]
    pub tags: Vec<String>,

    /// Deduplicated absolute URLs (or local paths), at most 24
    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,

    /// Local gallery paths, set when synthesized from `meta.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_images: Option<Vec<String>>,
}

/// Durable on-disk snapshot of a profile listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSnapshot {
    pub generated_at: DateTime<Utc>,
    pub profile_url: String,
    #[serde(default)]
    pub projects: Vec<ProjectSummary>,
}

impl CacheSnapshot {
    pub fn new(profile_url: impl Into<String>, projects: Vec<ProjectSummary>) -> Self {
        Self {
            generated_at: Utc::now(),
            profile_url: profile_url.into(),
            projects,
        }
    }
}

/// Per-project `meta.json` written by the image downloader
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    #[serde(flatten)]
    pub project: ProjectSummary,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_cover_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_gallery_paths: Option<Vec<String>>,
}

impl ProjectMeta {
    /// Gallery paths, empty when none were downloaded
    pub fn gallery(&self) -> &[String] {
        self.local_gallery_paths.as_deref().unwrap_or_default()
    }

    /// Detail view served from local files only
    pub fn to_detail(&self) -> ProjectDetail {
        let gallery = self.gallery().to_vec();
        ProjectDetail {
            title: self.project.title.clone(),
            description: None,
            tags: self.project.fields.clone().unwrap_or_default(),
            images: gallery.clone(),
            cover_image_url: self.local_cover_path.clone(),
            local_images: Some(gallery),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_serializes_camel_case_and_skips_absent() {
        let project = ProjectSummary {
            id: Some("42".to_string()),
            title: "Poster".to_string(),
            url: "https://www.behance.net/gallery/42/Poster".to_string(),
            slug: "42-poster".to_string(),
            cover_image_url: Some("https://cdn/x.png".to_string()),
            fields: None,
            appreciations: Some(10),
            views: None,
            comments: None,
        };

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["coverImageUrl"], "https://cdn/x.png");
        assert_eq!(json["appreciations"], 10);
        assert!(json.get("views").is_none());
        assert!(json.get("fields").is_none());
    }

    #[test]
    fn test_meta_reads_flattened_summary() {
        let raw = r#"{
            "id": "7",
            "title": "Card Game",
            "url": "https://www.behance.net/gallery/7/Card-Game",
            "slug": "7-card-game",
            "fields": ["Illustration"],
            "localCoverPath": "/projects/7-card-game/cover.png",
            "localGalleryPaths": ["/projects/7-card-game/gallery-01.png"]
        }"#;

        let meta: ProjectMeta = serde_json::from_str(raw).unwrap();
        assert_eq!(meta.project.slug, "7-card-game");

        let detail = meta.to_detail();
        assert_eq!(detail.title, "Card Game");
        assert_eq!(detail.tags, vec!["Illustration"]);
        assert_eq!(detail.images, vec!["/projects/7-card-game/gallery-01.png"]);
        assert_eq!(detail.local_images.as_deref(), Some(detail.images.as_slice()));
        assert_eq!(
            detail.cover_image_url.as_deref(),
            Some("/projects/7-card-game/cover.png")
        );
    }

    #[test]
    fn test_numeric_ids_are_read_as_strings() {
        let snapshot: CacheSnapshot = serde_json::from_str(
            r#"{
                "generatedAt": "2026-01-05T10:00:00Z",
                "profileUrl": "https://www.behance.net/someone",
                "projects": [
                    {"id": 123, "title": "T", "url": "https://www.behance.net/gallery/123/T", "slug": "123-t"},
                    {"title": "U", "url": "https://www.behance.net/gallery/124/U", "slug": "124-u"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(snapshot.projects[0].id.as_deref(), Some("123"));
        assert_eq!(snapshot.projects[1].id, None);

        let meta: ProjectMeta = serde_json::from_str(
            r#"{"id": 77, "title": "M", "url": "https://www.behance.net/gallery/77/M", "slug": "77-m",
                "localGalleryPaths": ["/projects/77-m/gallery-01.jpg"]}"#,
        )
        .unwrap();
        assert_eq!(meta.project.id.as_deref(), Some("77"));
    }

    #[test]
    fn test_snapshot_roundtrips_timestamp() {
        let snapshot = CacheSnapshot::new("https://www.behance.net/someone", vec![]);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("generatedAt"));

        let back: CacheSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.generated_at, snapshot.generated_at);
    }
}
