//! Table rows for project listings and details

use tabled::Tabled;

use crate::models::{ProjectDetail, ProjectSummary};
use crate::text::format_count;

/// Longest title shown before truncation
const TITLE_WIDTH: usize = 48;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", cut)
}

/// Project listing row
#[derive(Debug, Clone, Tabled)]
pub struct ProjectDisplay {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "TITLE")]
    pub title: String,

    #[tabled(rename = "FIELDS")]
    pub fields: String,

    #[tabled(rename = "APPRECIATIONS")]
    pub appreciations: String,

    #[tabled(rename = "VIEWS")]
    pub views: String,

    #[tabled(rename = "COMMENTS")]
    pub comments: String,
}

impl From<&ProjectSummary> for ProjectDisplay {
    fn from(project: &ProjectSummary) -> Self {
        Self {
            id: project.id.clone().unwrap_or_else(|| "--".to_string()),
            title: truncate(&project.title, TITLE_WIDTH),
            fields: project
                .fields
                .as_ref()
                .map(|f| f.join(", "))
                .unwrap_or_default(),
            appreciations: format_count(project.appreciations),
            views: format_count(project.views),
            comments: format_count(project.comments),
        }
    }
}

/// One labelled line of a project detail
#[derive(Debug, Clone, Tabled)]
pub struct DetailRow {
    #[tabled(rename = "FIELD")]
    pub field: String,

    #[tabled(rename = "VALUE")]
    pub value: String,
}

impl DetailRow {
    fn new(field: &str, value: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
        }
    }
}

/// Flatten a detail into field/value rows, one row per image
pub fn detail_rows(detail: &ProjectDetail) -> Vec<DetailRow> {
    let mut rows = vec![DetailRow::new("Title", detail.title.clone())];

    if let Some(ref description) = detail.description {
        rows.push(DetailRow::new("Description", description.clone()));
    }
    if !detail.tags.is_empty() {
        rows.push(DetailRow::new("Tags", detail.tags.join(", ")));
    }
    if let Some(ref cover) = detail.cover_image_url {
        rows.push(DetailRow::new("Cover", cover.clone()));
    }
    for (i, image) in detail.images.iter().enumerate() {
        rows.push(DetailRow::new(&format!("Image {}", i + 1), image.clone()));
    }

    rows
}
