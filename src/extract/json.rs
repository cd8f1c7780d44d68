//! Recursive project collector over embedded JSON payloads
//!
//! Listing pages ship their data in framework blobs whose shape changes
//! without notice. Rather than binding to a schema, the collector walks
//! every object/array and keeps anything that looks like a project record.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::models::ProjectSummary;
use crate::text::{ensure_absolute_url, extract_project_id, parse_count, project_slug_from_url};

type Object = Map<String, Value>;

/// Engagement counters read from a record
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub appreciations: Option<u64>,
    pub views: Option<u64>,
    pub comments: Option<u64>,
}

impl Stats {
    /// Read counters from `record`, falling back to a nested `stats` object
    pub fn from_object(record: &Object) -> Self {
        let nested = record.get("stats").and_then(Value::as_object);
        let lookup = |keys: [&str; 2]| {
            let nested_values = nested
                .into_iter()
                .flat_map(move |stats| keys.into_iter().filter_map(move |k| stats.get(k)));
            keys.into_iter()
                .filter_map(|k| record.get(k))
                .chain(nested_values)
                .find(|v| !v.is_null())
                .and_then(coerce_number)
        };

        Self {
            appreciations: lookup(["appreciations", "appreciation_count"]),
            views: lookup(["views", "view_count"]),
            comments: lookup(["comments", "comment_count"]),
        }
    }

    /// Fill gaps in `self` from `other`
    pub fn or(self, other: Stats) -> Stats {
        Stats {
            appreciations: self.appreciations.or(other.appreciations),
            views: self.views.or(other.views),
            comments: self.comments.or(other.comments),
        }
    }
}

/// Numbers pass through (rounded), strings go through [`parse_count`]
pub fn coerce_number(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f.round() as u64)),
        Value::String(s) => parse_count(s),
        _ => None,
    }
}

/// Array of strings, or a comma-separated string
pub fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    match value? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        ),
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}

fn non_empty_str<'a>(record: &'a Object, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Cover URL from the direct keys, else the largest entry of a `covers` map
pub fn pick_cover(record: &Object) -> Option<String> {
    let direct = ["coverImageUrl", "cover_image_url", "cover", "cover_image"]
        .into_iter()
        .find_map(|k| non_empty_str(record, k));
    if let Some(url) = direct {
        return Some(url.to_string());
    }

    let covers = record.get("covers")?.as_object()?;
    let mut keys: Vec<&String> = covers.keys().collect();
    keys.sort_by(|a, b| {
        let a = a.parse::<f64>().unwrap_or(f64::NEG_INFINITY);
        let b = b.parse::<f64>().unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });

    keys.into_iter()
        .find_map(|k| covers.get(k).and_then(Value::as_str))
        .map(str::to_string)
}

/// The `url` and title of an object that looks like a project record
pub fn project_identity(record: &Object) -> Option<(&str, &str)> {
    let url = record
        .get("url")
        .and_then(Value::as_str)
        .filter(|u| u.contains("/gallery/"))?;
    let title = ["title", "name", "projectTitle"]
        .into_iter()
        .find_map(|k| non_empty_str(record, k))?;
    Some((url, title))
}

/// Keys that are canonical array indices (`0`, `17`, never `017`)
fn array_index(key: &str) -> Option<u32> {
    if !key.bytes().all(|b| b.is_ascii_digit()) || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    key.parse::<u32>().ok().filter(|&n| n != u32::MAX)
}

/// Values in the order script engines enumerate object properties:
/// index-like keys ascending, then the rest in insertion order.
fn children_in_property_order(record: &Object) -> Vec<&Value> {
    let mut indexed: Vec<(u32, &Value)> = Vec::new();
    let mut named: Vec<&Value> = Vec::new();
    for (key, value) in record {
        match array_index(key) {
            Some(n) => indexed.push((n, value)),
            None => named.push(value),
        }
    }
    indexed.sort_by_key(|(n, _)| *n);
    indexed.into_iter().map(|(_, v)| v).chain(named).collect()
}

/// Collects project records into a shared, URL-deduplicated result list
pub struct ProjectCollector<'a> {
    base_url: &'a str,
    seen: &'a mut HashSet<String>,
    results: &'a mut Vec<ProjectSummary>,
}

impl<'a> ProjectCollector<'a> {
    pub fn new(
        base_url: &'a str,
        seen: &'a mut HashSet<String>,
        results: &'a mut Vec<ProjectSummary>,
    ) -> Self {
        Self {
            base_url,
            seen,
            results,
        }
    }

    /// Walk `value`, visiting each object before its children
    pub fn visit(&mut self, value: &Value) {
        match value {
            Value::Array(items) => {
                for item in items {
                    self.visit(item);
                }
            }
            Value::Object(record) => {
                self.visit_record(record);
                for child in children_in_property_order(record) {
                    self.visit(child);
                }
            }
            _ => {}
        }
    }

    fn visit_record(&mut self, record: &Object) {
        let Some((url, title)) = project_identity(record) else {
            return;
        };

        let url = ensure_absolute_url(url, self.base_url);
        if !self.seen.insert(url.clone()) {
            return;
        }

        let id = match record.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => extract_project_id(&url),
        };
        let stats = Stats::from_object(record);

        self.results.push(ProjectSummary {
            id,
            title: title.to_string(),
            slug: project_slug_from_url(&url, Some(title)),
            cover_image_url: pick_cover(record).map(|c| ensure_absolute_url(&c, self.base_url)),
            fields: string_list(record.get("fields").or_else(|| record.get("tags"))),
            appreciations: stats.appreciations,
            views: stats.views,
            comments: stats.comments,
            url,
        });
    }
}
