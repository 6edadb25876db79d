//! Flattening of nested hit documents into display rows.
//!
//! Documents coming back from the index are irregular: any field the schema
//! declares as a list may instead arrive as a single object, a bare string,
//! or null. [`Shape`] is the single normalization point for that rule, and
//! [`flatten_hits`] applies it at every nesting level while walking each
//! document down to the leaf news items, emitting one [`NewsRow`] per item
//! in document-then-traversal order.
//!
//! Shape surprises are absorbed silently; a field arriving as a type no
//! rule anticipates is replaced by an empty value with a `warn!` diagnostic.
//! Nothing in this module errors.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::config::DatasetProfile;

/// Marker substituted for engagement and provenance fields whose key is
/// absent from the item. A present-but-empty value passes through as-is.
const MISSING_MARKER: &str = "N/A";

/// Display truncation length for item ids.
const ID_PREFIX_LEN: usize = 10;

/// Display truncation length for hidden content.
const CONTENT_PREVIEW_LEN: usize = 50;

/// Normalized shape of a possibly-list field.
///
/// One constructor, applied uniformly at every nesting level: null or
/// absent contributes nothing, a lone object or string counts as a
/// one-element list, a list iterates normally.
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    Empty,
    Single(&'a Value),
    Many(&'a [Value]),
}

impl<'a> Shape<'a> {
    pub fn of(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Empty,
            Some(Value::Array(items)) => Self::Many(items),
            Some(single) => Self::Single(single),
        }
    }
}

impl<'a> IntoIterator for Shape<'a> {
    type Item = &'a Value;
    type IntoIter = ShapeIter<'a>;

    fn into_iter(self) -> ShapeIter<'a> {
        match self {
            Self::Empty => ShapeIter::Single(None),
            Self::Single(value) => ShapeIter::Single(Some(value)),
            Self::Many(items) => ShapeIter::Many(items.iter()),
        }
    }
}

pub enum ShapeIter<'a> {
    Single(Option<&'a Value>),
    Many(std::slice::Iter<'a, Value>),
}

impl<'a> Iterator for ShapeIter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<&'a Value> {
        match self {
            Self::Single(value) => value.take(),
            Self::Many(items) => items.next(),
        }
    }
}

/// One leaf news item, coerced to display-safe values.
///
/// `likes`, `views`, `shares`, `source` and `datetime` keep their raw JSON
/// value (a numeric like-count stays a number); an absent key becomes the
/// literal `"N/A"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsRow {
    pub id: String,
    pub url: String,
    pub content: String,
    pub likes: Value,
    pub views: Value,
    pub shares: Value,
    pub media: String,
    pub source: Value,
    pub datetime: Value,
}

/// Flatten raw hits into one row per reachable news item.
///
/// Traversal starts at `_source.<root_field>` and follows the profile's
/// traversal segments; a news item unreachable through the region path
/// contributes no row. `content_visible = false` truncates content to its
/// first 50 characters for preview display.
pub fn flatten_hits(hits: &[Value], profile: &DatasetProfile, content_visible: bool) -> Vec<NewsRow> {
    let mut rows = Vec::new();
    for hit in hits {
        if let Some(root) = hit.get("_source").and_then(|s| s.get(&profile.root_field)) {
            walk(root, &profile.traversal, content_visible, &mut rows);
        }
    }
    rows
}

fn walk(node: &Value, segments: &[String], content_visible: bool, rows: &mut Vec<NewsRow>) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    for child in Shape::of(node.get(head)) {
        if rest.is_empty() {
            rows.push(row_from_item(child, content_visible));
        } else {
            walk(child, rest, content_visible, rows);
        }
    }
}

fn row_from_item(item: &Value, content_visible: bool) -> NewsRow {
    let content = item.get("content").and_then(Value::as_str).unwrap_or("");
    let content = if content_visible {
        content.to_owned()
    } else {
        clip(content, CONTENT_PREVIEW_LEN).to_owned()
    };

    NewsRow {
        id: clip(&coerce_str(item.get("id")), ID_PREFIX_LEN).to_owned(),
        url: coerce_str(item.get("url")),
        content,
        likes: field_or_missing(item, "likes"),
        views: field_or_missing(item, "views"),
        shares: field_or_missing(item, "shares"),
        media: media_string(item),
        source: field_or_missing(item, "source"),
        datetime: field_or_missing(item, "datetime"),
    }
}

/// First `limit` characters of `s`, on a char boundary.
fn clip(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// String coercion for identifier-like fields: strings pass through, null
/// and absent become empty, anything else renders as its JSON text.
fn coerce_str(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn field_or_missing(item: &Value, key: &str) -> Value {
    item.get(key)
        .cloned()
        .unwrap_or_else(|| Value::String(MISSING_MARKER.to_owned()))
}

/// The `media` field follows its own three-way shape rule: a list is used
/// as-is, null or absent is empty, a bare string is a singleton. Any other
/// scalar is logged and treated as empty rather than propagated.
fn media_string(item: &Value) -> String {
    let parts: Vec<&str> = match item.get("media") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) => vec![s.as_str()],
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| match entry {
                Value::String(s) => s.as_str(),
                Value::Null => "",
                other => {
                    warn!(value = %other, "unexpected media entry type, joining as empty");
                    ""
                }
            })
            .collect(),
        Some(other) => {
            warn!(value = %other, "unexpected media type, treating as empty");
            Vec::new()
        }
    };
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn profile() -> DatasetProfile {
        DatasetProfile::sri_lanka()
    }

    fn hit(root: Value) -> Value {
        json!({ "_source": { "sri_lanka": root } })
    }

    #[test]
    fn test_uniform_lists_cross_product() {
        let hits = vec![hit(json!({
            "province": [
                {
                    "district": [
                        { "news": [ { "id": "a1" }, { "id": "a2" } ] },
                        { "news": [ { "id": "b1" } ] }
                    ]
                },
                {
                    "district": [
                        { "news": [ { "id": "c1" } ] }
                    ]
                }
            ]
        }))];

        let rows = flatten_hits(&hits, &profile(), true);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        // Document-then-traversal order, no resort.
        assert_eq!(ids, vec!["a1", "a2", "b1", "c1"]);
    }

    #[test]
    fn test_singleton_equivalence() {
        let bare = hit(json!({
            "province": {
                "district": {
                    "news": { "id": "x", "media": "photo.jpg" }
                }
            }
        }));
        let wrapped = hit(json!({
            "province": [ {
                "district": [ {
                    "news": [ { "id": "x", "media": ["photo.jpg"] } ]
                } ]
            } ]
        }));

        let from_bare = flatten_hits(std::slice::from_ref(&bare), &profile(), true);
        let from_wrapped = flatten_hits(std::slice::from_ref(&wrapped), &profile(), true);
        assert_eq!(from_bare, from_wrapped);
    }

    #[test]
    fn test_null_levels_contribute_no_rows() {
        let hits = vec![
            hit(json!({ "province": null })),
            hit(json!({})),
            hit(json!({ "province": { "district": { "news": null } } })),
            json!({ "_source": {} }),
        ];
        assert!(flatten_hits(&hits, &profile(), true).is_empty());
    }

    #[test]
    fn test_truncation_rules() {
        let long_content = "0123456789ABCDEFGHIJ".repeat(3);
        let item = json!({
            "id": "abcdefghijklmno",
            "content": long_content.clone(),
            "likes": 5,
            "media": "photo.jpg",
            "datetime": "2024-01-01T00:00:00"
        });
        let hits = vec![hit(json!({ "province": { "district": { "news": item } } }))];

        let hidden = flatten_hits(&hits, &profile(), false);
        assert_eq!(hidden[0].id, "abcdefghij");
        assert_eq!(hidden[0].content.chars().count(), 50);
        assert_eq!(hidden[0].media, "photo.jpg");
        assert_eq!(hidden[0].likes, json!(5));
        assert_eq!(hidden[0].datetime, json!("2024-01-01T00:00:00"));

        let visible = flatten_hits(&hits, &profile(), true);
        assert_eq!(visible[0].content.len(), long_content.len());
    }

    #[test]
    fn test_short_id_passes_through() {
        let hits = vec![hit(json!({
            "province": { "district": { "news": { "id": "abc" } } }
        }))];
        let rows = flatten_hits(&hits, &profile(), false);
        assert_eq!(rows[0].id, "abc");
    }

    #[test]
    fn test_missing_fields_default_to_marker() {
        let hits = vec![hit(json!({
            "province": { "district": { "news": { "id": "abc" } } }
        }))];
        let rows = flatten_hits(&hits, &profile(), false);
        assert_eq!(rows[0].likes, json!("N/A"));
        assert_eq!(rows[0].views, json!("N/A"));
        assert_eq!(rows[0].shares, json!("N/A"));
        assert_eq!(rows[0].source, json!("N/A"));
        assert_eq!(rows[0].datetime, json!("N/A"));
        // Absent content and url default to empty, not the marker.
        assert_eq!(rows[0].content, "");
        assert_eq!(rows[0].url, "");
    }

    #[test]
    fn test_present_but_empty_passes_through() {
        let hits = vec![hit(json!({
            "province": { "district": { "news": { "id": "abc", "likes": "" } } }
        }))];
        let rows = flatten_hits(&hits, &profile(), false);
        assert_eq!(rows[0].likes, json!(""));
    }

    #[test]
    fn test_media_shapes() {
        let news = json!([
            { "id": "n1", "media": null },
            { "id": "n2", "media": "one.jpg" },
            { "id": "n3", "media": ["one.jpg", "two.jpg"] },
            { "id": "n4", "media": ["one.jpg", null, "two.jpg"] },
            { "id": "n5", "media": 42 },
            { "id": "n6" }
        ]);
        let hits = vec![hit(json!({ "province": { "district": { "news": news } } }))];

        let rows = flatten_hits(&hits, &profile(), false);
        let media: Vec<&str> = rows.iter().map(|r| r.media.as_str()).collect();
        assert_eq!(
            media,
            vec!["", "one.jpg", "one.jpg, two.jpg", "one.jpg, , two.jpg", "", ""]
        );
    }

    #[test]
    fn test_flat_regime_traversal() {
        let india = DatasetProfile::india();
        let hits = vec![json!({
            "_source": {
                "india": {
                    "state": "Kerala",
                    "district": "Ernakulam",
                    "news": [ { "id": "k1" }, { "id": "k2" } ]
                }
            }
        })];
        let rows = flatten_hits(&hits, &india, true);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["k1", "k2"]);
    }

    #[test]
    fn test_non_object_level_contributes_no_rows() {
        // A bare string where an object was expected has no children to
        // descend into; it yields zero rows, not an error.
        let hits = vec![hit(json!({ "province": "Western" }))];
        assert!(flatten_hits(&hits, &profile(), true).is_empty());
    }

    #[test]
    fn test_multibyte_truncation_is_char_safe() {
        let content = "й".repeat(60);
        let hits = vec![hit(json!({
            "province": { "district": { "news": { "id": "abc", "content": content } } }
        }))];
        let rows = flatten_hits(&hits, &profile(), false);
        assert_eq!(rows[0].content.chars().count(), 50);
    }
}
