//! Search body construction for one fetch.
//!
//! [`build_search_body`] turns a `(region, sub-region)` selection into the
//! JSON search request: match-all when the top level is wildcarded, a
//! boolean filter when one or both levels are concrete. Filters on a nested
//! level are wrapped in a `nested` clause scoped to that level's own path;
//! flat levels use a plain `term` clause. Every variant carries the same
//! fixed-size result window and a single-key descending sort on the nested
//! datetime field (document order is the implicit tie-break).

use serde_json::{Value, json};

use crate::config::{DatasetProfile, RegionLevel};

/// Selection state for one administrative level.
///
/// `Unset` (the level was never chosen) and `All` (the wildcard sentinel was
/// chosen) both mean "do not filter on this level", but they are distinct
/// states: a selector can legitimately be absent, and the wildcard is an
/// explicit instruction while other levels stay filtered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelPick {
    /// The level was not selected at all.
    Unset,
    /// The wildcard sentinel ("All Provinces", ...) was selected.
    All,
    /// A concrete region name was selected.
    Name(String),
}

impl LevelPick {
    /// Interpret a raw selector string against a level's wildcard label.
    pub fn parse(raw: Option<&str>, level: &RegionLevel) -> Self {
        match raw {
            None => Self::Unset,
            Some(s) if s.is_empty() => Self::Unset,
            Some(s) if s == level.wildcard_label => Self::All,
            Some(s) => Self::Name(s.to_owned()),
        }
    }

    fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            _ => None,
        }
    }
}

/// Filter clause requiring `name` at one level, shaped for that level's
/// nesting. Sibling nested clauses are each scoped to their own path; the
/// sub-region clause does not re-assert the top-level clause inside the
/// same nested scope.
fn level_clause(level: &RegionLevel, name: &str) -> Value {
    let field = level.name_field.as_str();
    match &level.nested_path {
        Some(path) => json!({
            "nested": {
                "path": path,
                "query": {
                    "bool": {
                        "must": [
                            { "match": { field: name } }
                        ]
                    }
                }
            }
        }),
        None => json!({ "term": { field: name } }),
    }
}

fn sort_clause(profile: &DatasetProfile) -> Value {
    let field = profile.sort_field.as_str();
    json!([
        {
            field: {
                "order": "desc",
                "nested": { "path": profile.sort_path }
            }
        }
    ])
}

/// Build the search body for one `(region, sub-region)` selection.
///
/// Decision table, in precedence order:
/// 1. top wildcard or unset (any sub-region input) ⇒ match-all;
/// 2. both levels concrete ⇒ `bool.must` of the two level clauses;
/// 3. only the top level concrete ⇒ that single clause, unwrapped.
pub fn build_search_body(profile: &DatasetProfile, top: &LevelPick, sub: &LevelPick) -> Value {
    let query = match (top.name(), sub.name()) {
        (None, _) => json!({ "match_all": {} }),
        (Some(region), Some(sub_region)) => json!({
            "bool": {
                "must": [
                    level_clause(profile.top_level(), region),
                    level_clause(profile.sub_level(), sub_region),
                ]
            }
        }),
        (Some(region), None) => level_clause(profile.top_level(), region),
    };

    json!({
        "query": query,
        "size": profile.page_size,
        "sort": sort_clause(profile)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sri_lanka_sort() -> Value {
        json!([
            {
                "sri_lanka.province.district.news.datetime": {
                    "order": "desc",
                    "nested": { "path": "sri_lanka.province.district.news" }
                }
            }
        ])
    }

    #[test]
    fn test_wildcard_always_match_all() {
        let profile = DatasetProfile::sri_lanka();
        for sub in [
            LevelPick::Unset,
            LevelPick::All,
            LevelPick::Name("Colombo".into()),
        ] {
            let body = build_search_body(&profile, &LevelPick::All, &sub);
            assert_eq!(body["query"], json!({ "match_all": {} }));
            assert_eq!(body["size"], json!(5000));
            assert_eq!(body["sort"], sri_lanka_sort());
        }
        let body = build_search_body(&profile, &LevelPick::Unset, &LevelPick::Unset);
        assert_eq!(body["query"], json!({ "match_all": {} }));
    }

    #[test]
    fn test_both_concrete_nested() {
        let profile = DatasetProfile::sri_lanka();
        let body = build_search_body(
            &profile,
            &LevelPick::Name("Western".into()),
            &LevelPick::Name("Colombo".into()),
        );

        assert_eq!(
            body["query"],
            json!({
                "bool": {
                    "must": [
                        {
                            "nested": {
                                "path": "sri_lanka.province",
                                "query": {
                                    "bool": {
                                        "must": [
                                            { "match": { "sri_lanka.province.name": "Western" } }
                                        ]
                                    }
                                }
                            }
                        },
                        {
                            "nested": {
                                "path": "sri_lanka.province.district",
                                "query": {
                                    "bool": {
                                        "must": [
                                            { "match": { "sri_lanka.province.district.name": "Colombo" } }
                                        ]
                                    }
                                }
                            }
                        }
                    ]
                }
            })
        );
        assert_eq!(body["sort"], sri_lanka_sort());
    }

    #[test]
    fn test_top_only_is_single_unwrapped_clause() {
        let profile = DatasetProfile::sri_lanka();
        for sub in [LevelPick::Unset, LevelPick::All] {
            let body = build_search_body(&profile, &LevelPick::Name("Western".into()), &sub);
            assert_eq!(
                body["query"],
                json!({
                    "nested": {
                        "path": "sri_lanka.province",
                        "query": {
                            "bool": {
                                "must": [
                                    { "match": { "sri_lanka.province.name": "Western" } }
                                ]
                            }
                        }
                    }
                })
            );
        }
    }

    #[test]
    fn test_flat_regime_uses_term_filters() {
        let profile = DatasetProfile::india();
        let body = build_search_body(
            &profile,
            &LevelPick::Name("Kerala".into()),
            &LevelPick::Name("Ernakulam".into()),
        );

        assert_eq!(
            body["query"],
            json!({
                "bool": {
                    "must": [
                        { "term": { "india.state": "Kerala" } },
                        { "term": { "india.district": "Ernakulam" } }
                    ]
                }
            })
        );
        // Sort is still nested: the datetime lives inside the news array.
        assert_eq!(
            body["sort"],
            json!([
                {
                    "india.news.datetime": {
                        "order": "desc",
                        "nested": { "path": "india.news" }
                    }
                }
            ])
        );
        assert_eq!(body["size"], json!(10000));
    }

    #[test]
    fn test_pick_parsing() {
        let profile = DatasetProfile::sri_lanka();
        let level = profile.top_level();

        assert_eq!(LevelPick::parse(None, level), LevelPick::Unset);
        assert_eq!(LevelPick::parse(Some(""), level), LevelPick::Unset);
        assert_eq!(LevelPick::parse(Some("All Provinces"), level), LevelPick::All);
        assert_eq!(
            LevelPick::parse(Some("Western"), level),
            LevelPick::Name("Western".into())
        );
        // The sub-level wildcard label is not the top-level one.
        assert_eq!(
            LevelPick::parse(Some("All Districts"), level),
            LevelPick::Name("All Districts".into())
        );
    }
}
