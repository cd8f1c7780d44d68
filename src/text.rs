//! URL and text normalizers
//!
//! Pure helpers shared by the extractors, the scraper and the cache tiers.
//! None of them fail: malformed input falls back to a defined value.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9.]+)\s*([km])?").expect("valid count regex"));

/// Reduce a profile URL to `origin + path` without trailing slashes.
///
/// Returns the input unchanged when it does not parse as a URL.
pub fn normalize_profile_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => format!(
            "{}{}",
            parsed.origin().ascii_serialization(),
            parsed.path().trim_end_matches('/')
        ),
        Err(_) => url.to_string(),
    }
}

/// Lowercase, collapse every run of non `[a-z0-9]` characters into a single
/// hyphen and trim hyphens from both ends.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Resolve a possibly relative URL against `base`.
///
/// Returns `url` unchanged if either side fails to parse.
pub fn ensure_absolute_url(url: &str, base: &str) -> String {
    Url::parse(base)
        .and_then(|b| b.join(url))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

fn path_segments(url: &str) -> Option<Vec<String>> {
    let parsed = Url::parse(url).ok()?;
    Some(
        parsed
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Project id from a `/gallery/{id}/...` URL
pub fn extract_project_id(url: &str) -> Option<String> {
    let segments = path_segments(url)?;
    match segments.as_slice() {
        [first, id, ..] if first == "gallery" && id.chars().any(|c| c.is_ascii_digit()) => {
            Some(id.clone())
        }
        _ => None,
    }
}

/// Derive the internal project slug from its gallery URL.
///
/// `https://www.behance.net/gallery/123/My-Project` becomes `123-my-project`.
/// Unparseable URLs fall back to the slugified title.
pub fn project_slug_from_url(url: &str, title: Option<&str>) -> String {
    let id = extract_project_id(url);

    match path_segments(url) {
        Some(segments) => {
            let raw = segments
                .last()
                .map(String::as_str)
                .filter(|s| !s.is_empty())
                .or(title.filter(|t| !t.is_empty()))
                .unwrap_or("project");
            let base = slugify(raw);

            match id {
                Some(id) if !base.starts_with(&id) => format!("{}-{}", id, base),
                Some(id) if base.is_empty() => format!("project-{}", id),
                _ if base.is_empty() => "project".to_string(),
                _ => base,
            }
        }
        None => slugify(title.filter(|t| !t.is_empty()).unwrap_or("project")),
    }
}

/// Parse human-readable counts such as `1,234`, `1.5k` or `2M`.
pub fn parse_count(text: &str) -> Option<u64> {
    let cleaned = text.replace(',', "").trim().to_lowercase();
    let caps = COUNT_RE.captures(&cleaned)?;

    // "1.2.3" reads as 1.2, anything without a digit is not a number
    let digits = caps.get(1)?.as_str();
    let number = match digits.match_indices('.').nth(1) {
        Some((idx, _)) => &digits[..idx],
        None => digits,
    };
    let mut value: f64 = number.parse().ok()?;

    match caps.get(2).map(|m| m.as_str()) {
        Some("k") => value *= 1_000.0,
        Some("m") => value *= 1_000_000.0,
        _ => {}
    }

    Some(value.round() as u64)
}

/// First URL of a `srcset` attribute
pub fn parse_srcset(srcset: &str) -> Option<String> {
    let first = srcset.split(',').next()?.trim();
    let url = first.split(' ').next()?;
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

/// Short human form of a count: `1.2k`, `45k`, `3.4M`.
pub fn format_count(value: Option<u64>) -> String {
    let Some(value) = value else {
        return String::new();
    };

    if value >= 1_000_000 {
        let scaled = value as f64 / 1_000_000.0;
        if value >= 10_000_000 {
            format!("{:.0}M", scaled)
        } else {
            format!("{:.1}M", scaled)
        }
    } else if value >= 1_000 {
        let scaled = value as f64 / 1_000.0;
        if value >= 100_000 {
            format!("{:.0}k", scaled)
        } else {
            format!("{:.1}k", scaled)
        }
    } else {
        value.to_string()
    }
}
