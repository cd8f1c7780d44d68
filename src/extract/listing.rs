//! Profile listing page extractor
//!
//! Sources are tried in a fixed order and share one URL seen-set, so a
//! project found in the embedded payload is not emitted again by the card
//! scan. Later sources add records, they never replace earlier ones.

use std::collections::HashSet;
use std::sync::LazyLock;

use log::warn;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use super::json::{ProjectCollector, Stats, pick_cover, string_list};
use crate::models::ProjectSummary;
use crate::text::{
    ensure_absolute_url, extract_project_id, parse_count, parse_srcset, project_slug_from_url,
};

/// Card-like elements, in the order they are recognised
const CARD_SELECTORS: [&str; 6] = [
    "[data-project-id]",
    "[data-project]",
    ".ProjectCover",
    ".ProjectCoverNeue",
    ".ProjectCover-link",
    "a[href*=\"/gallery/\"]",
];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

static NEXT_DATA: LazyLock<Selector> = LazyLock::new(|| selector("script#__NEXT_DATA__"));
static SCRIPT: LazyLock<Selector> = LazyLock::new(|| selector("script"));
static CARD: LazyLock<Selector> = LazyLock::new(|| selector(&CARD_SELECTORS.join(",")));
static GALLERY_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href*=\"/gallery/\"]"));
static TITLE_LIKE: LazyLock<Selector> =
    LazyLock::new(|| selector("[class*=\"Title\"], [class*=\"title\"]"));
static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static SOURCE: LazyLock<Selector> = LazyLock::new(|| selector("source"));
static LABELLED: LazyLock<Selector> =
    LazyLock::new(|| selector("[title], [aria-label], [data-stat]"));
static STAT_CLASS: LazyLock<Selector> = LazyLock::new(|| {
    selector("[class*=\"Appreciation\"], [class*=\"View\"], [class*=\"Comment\"]")
});
static REL_NEXT: LazyLock<Selector> = LazyLock::new(|| selector("a[rel=\"next\"]"));
static ARIA_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[aria-label]"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));

static INITIAL_STATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)__INITIAL_STATE__\s*=\s*(\{.*?\});").expect("valid state regex")
});
static PRELOADED_STATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)__PRELOADED_STATE__\s*=\s*(\{.*?\});").expect("valid state regex")
});
static BACKGROUND_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(['"]?(.*?)['"]?\)"#).expect("valid background regex")
});

/// Projects found on one listing page plus the link to the next page
#[derive(Debug, Default)]
pub struct ListingPage {
    pub projects: Vec<ProjectSummary>,
    pub next_page_url: Option<String>,
}

/// Extract project records and the next-page link from listing HTML.
pub fn extract_listing(html: &str, base_url: &str) -> ListingPage {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut projects = Vec::new();

    {
        let mut collector = ProjectCollector::new(base_url, &mut seen, &mut projects);

        if let Some(payload) = document.select(&NEXT_DATA).next() {
            let text = element_text(payload);
            if !text.is_empty() {
                match serde_json::from_str::<Value>(&text) {
                    Ok(parsed) => collector.visit(&parsed),
                    Err(e) => warn!("Failed to parse __NEXT_DATA__ payload: {}", e),
                }
            }
        }

        for script in document.select(&SCRIPT) {
            let content: String = script.text().collect();
            if let Some(state) = embedded_state(&content) {
                match serde_json::from_str::<Value>(state) {
                    Ok(parsed) => collector.visit(&parsed),
                    Err(e) => warn!("Failed to parse embedded state: {}", e),
                }
            }
        }
    }

    for card in document.select(&CARD) {
        if let Some(project) = project_from_card(card, base_url, &seen) {
            seen.insert(project.url.clone());
            projects.push(project);
        }
    }

    ListingPage {
        projects,
        next_page_url: find_next_page(&document).map(|href| ensure_absolute_url(&href, base_url)),
    }
}

/// The JSON object assigned to `__INITIAL_STATE__` or `__PRELOADED_STATE__`
fn embedded_state(content: &str) -> Option<&str> {
    if !content.contains("__INITIAL_STATE__") && !content.contains("__PRELOADED_STATE__") {
        return None;
    }
    INITIAL_STATE
        .captures(content)
        .or_else(|| PRELOADED_STATE.captures(content))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name).filter(|v| !v.is_empty())
}

fn project_from_card(
    card: ElementRef<'_>,
    base_url: &str,
    seen: &HashSet<String>,
) -> Option<ProjectSummary> {
    let link = if card.value().name() == "a" {
        card
    } else {
        card.select(&GALLERY_LINK).next()?
    };
    let href = attr(link, "href")?;

    let url = ensure_absolute_url(href, base_url);
    if seen.contains(&url) {
        return None;
    }

    let title = attr(link, "title")
        .map(str::to_string)
        .or_else(|| {
            card.select(&TITLE_LIKE)
                .next()
                .map(element_text)
                .filter(|t| !t.is_empty())
        })
        .or_else(|| {
            link.select(&IMG)
                .next()
                .and_then(|img| attr(img, "alt"))
                .map(str::to_string)
        })
        .or_else(|| Some(element_text(link)).filter(|t| !t.is_empty()))?;

    let cover = image_from_element(card, base_url).or_else(|| image_from_element(link, base_url));
    let card_stats = stats_from_card(card);

    let mut data_fields = None;
    let mut data_cover = None;
    let mut data_stats = Stats::default();
    if let Some(raw) = attr(card, "data-project") {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(parsed)) => {
                data_fields = string_list(parsed.get("fields").or_else(|| parsed.get("tags")));
                data_cover = pick_cover(&parsed);
                data_stats = Stats::from_object(&parsed);
            }
            Ok(_) => {}
            Err(e) => log::debug!("Ignoring malformed data-project attribute: {}", e),
        }
    }

    let fields = match attr(card, "data-fields") {
        Some(raw) => Some(
            raw.split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        None => data_fields,
    };
    let stats = card_stats.or(data_stats);

    Some(ProjectSummary {
        id: attr(card, "data-project-id")
            .map(str::to_string)
            .or_else(|| extract_project_id(&url)),
        slug: project_slug_from_url(&url, Some(&title)),
        title,
        cover_image_url: cover.or_else(|| data_cover.map(|c| ensure_absolute_url(&c, base_url))),
        fields,
        appreciations: stats.appreciations,
        views: stats.views,
        comments: stats.comments,
        url,
    })
}

/// Cover image of a card: `img`, then `source`, then inline background
fn image_from_element(el: ElementRef<'_>, base_url: &str) -> Option<String> {
    if let Some(img) = el.select(&IMG).next() {
        let src = attr(img, "src")
            .or_else(|| attr(img, "data-src"))
            .or_else(|| attr(img, "data-original"))
            .map(str::to_string)
            .or_else(|| {
                attr(img, "srcset")
                    .or_else(|| attr(img, "data-srcset"))
                    .and_then(parse_srcset)
            });
        if let Some(src) = src {
            return Some(ensure_absolute_url(&src, base_url));
        }
    }

    if let Some(source) = el.select(&SOURCE).next() {
        let parsed = attr(source, "srcset")
            .or_else(|| attr(source, "data-srcset"))
            .and_then(parse_srcset);
        if let Some(src) = parsed {
            return Some(ensure_absolute_url(&src, base_url));
        }
    }

    let style = attr(el, "style")?;
    let caps = BACKGROUND_URL.captures(style)?;
    caps.get(1)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| ensure_absolute_url(s, base_url))
}

#[derive(Clone, Copy)]
enum StatKind {
    Appreciations,
    Views,
    Comments,
}

impl StatKind {
    fn from_label(label: &str) -> Option<Self> {
        if label.contains("appreciation") {
            Some(StatKind::Appreciations)
        } else if label.contains("view") {
            Some(StatKind::Views)
        } else if label.contains("comment") {
            Some(StatKind::Comments)
        } else {
            None
        }
    }
}

fn record_stat(stats: &mut Stats, kind: StatKind, text: &str) {
    let slot = match kind {
        StatKind::Appreciations => &mut stats.appreciations,
        StatKind::Views => &mut stats.views,
        StatKind::Comments => &mut stats.comments,
    };
    if slot.is_none() {
        *slot = parse_count(text);
    }
}

/// Engagement counters from labelled descendants, then class names
fn stats_from_card(card: ElementRef<'_>) -> Stats {
    let mut stats = Stats::default();

    for node in card.select(&LABELLED) {
        let label = attr(node, "title")
            .or_else(|| attr(node, "aria-label"))
            .or_else(|| attr(node, "data-stat"))
            .unwrap_or_default()
            .to_lowercase();
        let text = element_text(node);
        if text.is_empty() {
            continue;
        }
        if let Some(kind) = StatKind::from_label(&label) {
            record_stat(&mut stats, kind, &text);
        }
    }

    for node in card.select(&STAT_CLASS) {
        let classes = node.value().attr("class").unwrap_or_default().to_lowercase();
        let text = element_text(node);
        if text.is_empty() {
            continue;
        }
        if let Some(kind) = StatKind::from_label(&classes) {
            record_stat(&mut stats, kind, &text);
        }
    }

    stats
}

/// `rel="next"`, then an aria-label mentioning next, then link text
fn find_next_page(document: &Html) -> Option<String> {
    let first_href = |el: Option<ElementRef<'_>>| el.and_then(|a| attr(a, "href")).map(str::to_string);

    first_href(document.select(&REL_NEXT).next())
        .or_else(|| {
            first_href(document.select(&ARIA_LINK).find(|a| {
                a.value()
                    .attr("aria-label")
                    .is_some_and(|l| l.to_lowercase().contains("next"))
            }))
        })
        .or_else(|| {
            first_href(
                document
                    .select(&ANCHOR)
                    .find(|a| a.text().collect::<String>().contains("Next")),
            )
        })
}
