//! Hand-authored listing used when neither cache nor live scrape has data

use crate::config::DEFAULT_PROFILE_URL;
use crate::models::ProjectSummary;

const PLACEHOLDER_COVER: &str = "/placeholder.svg";

const MANUAL: [(&str, &str, &str, [&str; 2]); 6] = [
    (
        "manual-1",
        "Dolphin Tuna Retro Rebranding",
        "dolphin-tuna-retro-rebranding",
        ["Branding", "Packaging"],
    ),
    (
        "manual-2",
        "TalkTheOne Podcast Branding",
        "talktheone-podcast-branding",
        ["Branding", "Digital"],
    ),
    (
        "manual-3",
        "Wabi Sabi UI Design System",
        "wabi-sabi-ui-design-system",
        ["UI", "Design System"],
    ),
    (
        "manual-4",
        "Ecardi Billboard & Giveaways",
        "ecardi-billboard-giveaways",
        ["Advertising", "Social Media"],
    ),
    (
        "manual-5",
        "Flowers and Legends Card Game",
        "flowers-and-legends-card-game",
        ["Packaging", "Illustration"],
    ),
    (
        "manual-6",
        "Heritage Sweets Reimagined",
        "heritage-sweets-reimagined",
        ["Packaging", "Branding"],
    ),
];

/// The fixed manual dataset. Every record links to the profile page.
pub fn manual_projects() -> Vec<ProjectSummary> {
    MANUAL
        .iter()
        .map(|(id, title, slug, fields)| ProjectSummary {
            id: Some(id.to_string()),
            title: title.to_string(),
            url: DEFAULT_PROFILE_URL.to_string(),
            slug: slug.to_string(),
            cover_image_url: Some(PLACEHOLDER_COVER.to_string()),
            fields: Some(fields.iter().map(|f| f.to_string()).collect()),
            appreciations: None,
            views: None,
            comments: None,
        })
        .collect()
}
