//! Project detail page extractor

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::models::ProjectDetail;

/// Title used when the page carries none
pub const PLACEHOLDER_TITLE: &str = "Behance Project";

pub const MAX_IMAGES: usize = 24;
pub const MAX_TAGS: usize = 12;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

static OG_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("meta[property=\"og:title\"]"));
static OG_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector("meta[property=\"og:description\"]"));
static OG_IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("meta[property=\"og:image\"]"));
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector("meta[name=\"description\"]"));
static META_KEYWORDS: LazyLock<Selector> = LazyLock::new(|| selector("meta[name=\"keywords\"]"));
static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static LD_JSON: LazyLock<Selector> =
    LazyLock::new(|| selector("script[type=\"application/ld+json\"]"));

static CDN_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"https://(mir-s3-cdn-cf\.behance\.net|mir-cdn\.behance\.net|mir-cdn-cf\.behance\.net|a\d+\.behance\.net)/[^"'\s)]+"#,
    )
    .expect("valid cdn regex")
});
static IMAGE_EXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|webp|gif)(\?|$)").expect("valid ext regex"));

/// Insertion-ordered set with a size cap
struct OrderedSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedSet {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn insert(&mut self, value: String) {
        if self.seen.insert(value.clone()) {
            self.items.push(value);
        }
    }

    fn into_capped(mut self, cap: usize) -> Vec<String> {
        self.items.truncate(cap);
        self.items
    }
}

fn meta_content(document: &Html, sel: &Selector) -> Option<String> {
    document
        .select(sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_text(document: &Html, sel: &Selector) -> Option<String> {
    document
        .select(sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parsed JSON-LD blocks, flattened when a block holds an array
fn ld_json_items(document: &Html) -> Vec<Value> {
    let mut items = Vec::new();
    for script in document.select(&LD_JSON) {
        let text: String = script.text().collect();
        if text.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(values)) => items.extend(values),
            Ok(value) => items.push(value),
            Err(e) => log::debug!("Skipping unparseable JSON-LD block: {}", e),
        }
    }
    items
}

fn image_object_url(value: &Value) -> Option<&str> {
    let obj = value.as_object()?;
    ["url", "contentUrl"]
        .into_iter()
        .find_map(|k| obj.get(k).and_then(Value::as_str).filter(|s| !s.is_empty()))
}

fn ld_images(items: &[Value]) -> Vec<String> {
    let mut images = Vec::new();
    for item in items {
        match item.get("image") {
            Some(Value::String(url)) => images.push(url.clone()),
            Some(Value::Array(entries)) => {
                for entry in entries {
                    match entry {
                        Value::String(url) => images.push(url.clone()),
                        other => images.extend(image_object_url(other).map(str::to_string)),
                    }
                }
            }
            Some(other) => images.extend(image_object_url(other).map(str::to_string)),
            None => {}
        }
    }
    images
}

fn split_keywords(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
}

fn ld_keywords(items: &[Value]) -> Vec<String> {
    let mut tags = Vec::new();
    for item in items {
        match item.get("keywords") {
            Some(Value::String(raw)) => tags.extend(split_keywords(raw)),
            Some(Value::Array(entries)) => {
                tags.extend(entries.iter().filter_map(Value::as_str).map(str::to_string))
            }
            _ => {}
        }
    }
    tags
}

/// Image URLs on the Behance CDN found anywhere in the raw markup
pub fn cdn_images(html: &str) -> Vec<String> {
    CDN_IMAGE
        .find_iter(html)
        .map(|m| m.as_str())
        .filter(|url| IMAGE_EXT.is_match(url))
        .map(str::to_string)
        .collect()
}

/// Extract a [`ProjectDetail`] from a project page.
pub fn extract_detail(html: &str) -> ProjectDetail {
    let document = Html::parse_document(html);

    let title = meta_content(&document, &OG_TITLE)
        .or_else(|| first_text(&document, &H1))
        .or_else(|| first_text(&document, &TITLE))
        .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string());

    let description = meta_content(&document, &OG_DESCRIPTION)
        .or_else(|| meta_content(&document, &META_DESCRIPTION));

    let cover_image_url = meta_content(&document, &OG_IMAGE);

    let ld_items = ld_json_items(&document);

    let mut images = OrderedSet::new();
    for url in ld_images(&ld_items) {
        images.insert(url);
    }
    if let Some(ref cover) = cover_image_url {
        images.insert(cover.clone());
    }
    for url in cdn_images(html) {
        images.insert(url);
    }

    let mut tags = OrderedSet::new();
    for tag in ld_keywords(&ld_items) {
        tags.insert(tag);
    }
    if let Some(keywords) = meta_content(&document, &META_KEYWORDS) {
        for tag in split_keywords(&keywords) {
            tags.insert(tag);
        }
    }

    ProjectDetail {
        title,
        description,
        tags: tags.into_capped(MAX_TAGS),
        images: images.into_capped(MAX_IMAGES),
        cover_image_url,
        local_images: None,
    }
}
