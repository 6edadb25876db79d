//! Region Resolver: selector contents from aggregation queries.
//!
//! Both listings issue a zero-result-document aggregation request and read
//! the bucket keys back in response order, deduplicated. Levels with a
//! nested path get a nested aggregation wrapper; flat levels use a plain
//! `terms` aggregation. The bucket cap (`DatasetProfile::agg_size`) is a
//! hard ceiling: distinct values beyond it silently disappear from the
//! selector, so reaching the cap is logged loudly.

use itertools::Itertools;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::{
    client::{IndexClient, IndexError, Result},
    config::{DatasetProfile, RegionLevel},
};

/// List the distinct top-level region names, in aggregation order.
pub fn top_level_inner(
    client: &dyn IndexClient,
    profile: &DatasetProfile,
) -> Result<Vec<String>> {
    let level = profile.top_level();
    let (body, buckets_path) = top_level_agg(level, profile.agg_size);
    debug!(level = %level.label, "listing top-level regions");

    let response = client.search(&profile.index, &body)?;
    bucket_keys(&response, &buckets_path, level, profile.agg_size)
}

/// List the distinct sub-region names under one parent region.
pub fn child_inner(
    client: &dyn IndexClient,
    profile: &DatasetProfile,
    parent: &str,
) -> Result<Vec<String>> {
    let child = profile.sub_level();
    let (body, buckets_path) = child_agg(profile.top_level(), child, parent, profile.agg_size);
    debug!(parent, level = %child.label, "listing child regions");

    let response = client.search(&profile.index, &body)?;
    bucket_keys(&response, &buckets_path, child, profile.agg_size)
}

/// Aggregation body for the top-level listing, plus the JSON pointer where
/// the buckets land in the response.
fn top_level_agg(level: &RegionLevel, agg_size: usize) -> (Value, String) {
    let field = level.name_field.as_str();
    match &level.nested_path {
        Some(path) => (
            json!({
                "size": 0,
                "aggs": {
                    "regions": {
                        "nested": { "path": path },
                        "aggs": {
                            "names": {
                                "terms": { "field": field, "size": agg_size }
                            }
                        }
                    }
                }
            }),
            "/aggregations/regions/names/buckets".to_owned(),
        ),
        None => (
            json!({
                "size": 0,
                "aggs": {
                    "regions": {
                        "terms": { "field": field, "size": agg_size }
                    }
                }
            }),
            "/aggregations/regions/buckets".to_owned(),
        ),
    }
}

/// Aggregation body for the child listing: parent term filter, then the
/// child terms aggregation. For the hierarchical regime both levels carry
/// their own nested scope; for the flat regime the whole tree is flat.
fn child_agg(
    parent_level: &RegionLevel,
    child_level: &RegionLevel,
    parent: &str,
    agg_size: usize,
) -> (Value, String) {
    let parent_field = parent_level.name_field.as_str();
    let child_field = child_level.name_field.as_str();

    match (&parent_level.nested_path, &child_level.nested_path) {
        (Some(parent_path), Some(child_path)) => (
            json!({
                "size": 0,
                "aggs": {
                    "regions": {
                        "nested": { "path": parent_path },
                        "aggs": {
                            "parent": {
                                "filter": {
                                    "term": { parent_field: parent }
                                },
                                "aggs": {
                                    "subregions": {
                                        "nested": { "path": child_path },
                                        "aggs": {
                                            "names": {
                                                "terms": { "field": child_field, "size": agg_size }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }),
            "/aggregations/regions/parent/subregions/names/buckets".to_owned(),
        ),
        _ => (
            json!({
                "size": 0,
                "aggs": {
                    "parent": {
                        "filter": {
                            "term": { parent_field: parent }
                        },
                        "aggs": {
                            "names": {
                                "terms": { "field": child_field, "size": agg_size }
                            }
                        }
                    }
                }
            }),
            "/aggregations/parent/names/buckets".to_owned(),
        ),
    }
}

/// Extract and dedup the bucket keys at `path`, warning when the listing
/// ran into the aggregation bucket cap.
fn bucket_keys(
    response: &Value,
    path: &str,
    level: &RegionLevel,
    agg_size: usize,
) -> Result<Vec<String>> {
    let buckets = response
        .pointer(path)
        .and_then(Value::as_array)
        .ok_or_else(|| IndexError::ResponseShape {
            path: path.to_owned(),
        })?;

    if buckets.len() >= agg_size {
        warn!(
            level = %level.label,
            cap = agg_size,
            "distinct region count reached the aggregation bucket cap; \
             lower-frequency values are missing from the selector"
        );
    }

    let names = buckets
        .iter()
        .filter_map(|bucket| bucket.get("key"))
        .map(|key| match key {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unique()
        .collect();
    Ok(names)
}
