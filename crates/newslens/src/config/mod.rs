//! Dataset descriptors for the supported region hierarchies.
//!
//! Each searchable dataset is described by a [`DatasetProfile`]: where the
//! documents live, how the administrative levels map onto the document
//! schema, how deeply the news items are nested, and how results are sized
//! and sorted. The rest of the crate is parameterized over this descriptor,
//! so the nested Sri Lanka schema and the flat India schema run through one
//! implementation instead of two near-identical copies.

use crate::error::NewslensError;

/// One administrative level of a region hierarchy.
///
/// `nested_path: Some(..)` means the level lives inside a nested array and
/// its filters and aggregations need a nested wrapper scoped to that path.
/// `None` means the level is a plain document field filtered with a flat
/// `term` clause and aggregated with a flat `terms` aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionLevel {
    /// Human-facing name of the level ("Province", "District", ...).
    pub label: String,
    /// Full dotted path of the field holding the region name.
    pub name_field: String,
    /// Nested scope of the level, when the schema nests it.
    pub nested_path: Option<String>,
    /// Reserved selector value meaning "match all values at this level".
    pub wildcard_label: String,
}

impl RegionLevel {
    pub fn nested(
        label: impl Into<String>,
        name_field: impl Into<String>,
        nested_path: impl Into<String>,
        wildcard_label: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            name_field: name_field.into(),
            nested_path: Some(nested_path.into()),
            wildcard_label: wildcard_label.into(),
        }
    }

    pub fn flat(
        label: impl Into<String>,
        name_field: impl Into<String>,
        wildcard_label: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            name_field: name_field.into(),
            nested_path: None,
            wildcard_label: wildcard_label.into(),
        }
    }
}

/// Static description of one dataset: index, schema paths, and paging.
///
/// Profiles are plain data supplied up front (not discovered at run time)
/// and are consumed by the query builder, the region resolver, and the
/// flattener. Use [`DatasetProfile::sri_lanka`] / [`DatasetProfile::india`]
/// for the built-in datasets or [`DatasetProfile::builder`] for a custom one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetProfile {
    /// Name of the search index holding the documents.
    pub index: String,
    /// Top-level document field everything else hangs under.
    pub root_field: String,
    /// Ordered administrative levels, largest first. Always two entries:
    /// the top-level region and the sub-region.
    pub levels: Vec<RegionLevel>,
    /// Object keys walked from the root down to the news item array.
    pub traversal: Vec<String>,
    /// Full dotted path of the news item datetime used for sorting.
    pub sort_field: String,
    /// Nested scope of the news item array, for the sort clause.
    pub sort_path: String,
    /// Result window for one fetch.
    pub page_size: usize,
    /// Bucket cap for region aggregations. Distinct values beyond this
    /// silently disappear from selectors; the resolver warns when the cap
    /// is reached.
    pub agg_size: usize,
}

impl DatasetProfile {
    pub fn builder() -> DatasetProfileBuilder {
        DatasetProfileBuilder::default()
    }

    /// Convenience accessor for the top-level region level.
    pub fn top_level(&self) -> &RegionLevel {
        &self.levels[0]
    }

    /// Convenience accessor for the sub-region level.
    pub fn sub_level(&self) -> &RegionLevel {
        &self.levels[1]
    }

    /// The Sri Lanka news dataset: provinces and districts each nested one
    /// level deeper, news items two levels below the province array.
    pub fn sri_lanka() -> Self {
        Self {
            index: "srilanka_raw_data".into(),
            root_field: "sri_lanka".into(),
            levels: vec![
                RegionLevel::nested(
                    "Province",
                    "sri_lanka.province.name",
                    "sri_lanka.province",
                    "All Provinces",
                ),
                RegionLevel::nested(
                    "District",
                    "sri_lanka.province.district.name",
                    "sri_lanka.province.district",
                    "All Districts",
                ),
            ],
            traversal: vec!["province".into(), "district".into(), "news".into()],
            sort_field: "sri_lanka.province.district.news.datetime".into(),
            sort_path: "sri_lanka.province.district.news".into(),
            page_size: 5000,
            agg_size: 1000,
        }
    }

    /// The India news dataset: state and district are flat document fields,
    /// only the news item array is nested.
    pub fn india() -> Self {
        Self {
            index: "india_raw_data".into(),
            root_field: "india".into(),
            levels: vec![
                RegionLevel::flat("State", "india.state", "All States"),
                RegionLevel::flat("District", "india.district", "All Districts"),
            ],
            traversal: vec!["news".into()],
            sort_field: "india.news.datetime".into(),
            sort_path: "india.news".into(),
            page_size: 10000,
            agg_size: 1000,
        }
    }
}

/// Builder for custom dataset profiles with validation.
#[derive(Debug, Clone, Default)]
pub struct DatasetProfileBuilder {
    index: Option<String>,
    root_field: Option<String>,
    levels: Vec<RegionLevel>,
    traversal: Vec<String>,
    sort_field: Option<String>,
    sort_path: Option<String>,
    page_size: usize,
    agg_size: usize,
}

impl DatasetProfileBuilder {
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn root_field(mut self, root_field: impl Into<String>) -> Self {
        self.root_field = Some(root_field.into());
        self
    }

    /// Append an administrative level, largest first.
    pub fn level(mut self, level: RegionLevel) -> Self {
        self.levels.push(level);
        self
    }

    /// Set the object keys walked from the root down to the news array.
    pub fn traversal<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traversal = segments.into_iter().map(Into::into).collect();
        self
    }

    /// Set the nested datetime sort field and its nested scope.
    pub fn sort(mut self, field: impl Into<String>, path: impl Into<String>) -> Self {
        self.sort_field = Some(field.into());
        self.sort_path = Some(path.into());
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn agg_size(mut self, agg_size: usize) -> Self {
        self.agg_size = agg_size;
        self
    }

    pub fn build(self) -> Result<DatasetProfile, NewslensError> {
        let index = self
            .index
            .filter(|i| !i.is_empty())
            .ok_or_else(|| NewslensError::Config("index name is required".into()))?;
        let root_field = self
            .root_field
            .filter(|r| !r.is_empty())
            .ok_or_else(|| NewslensError::Config("root field is required".into()))?;
        if self.levels.len() != 2 {
            return Err(NewslensError::Config(format!(
                "expected exactly 2 region levels, got {}",
                self.levels.len()
            )));
        }
        if self.traversal.is_empty() {
            return Err(NewslensError::Config(
                "traversal must name at least the news array".into(),
            ));
        }
        let (sort_field, sort_path) = self
            .sort_field
            .zip(self.sort_path)
            .ok_or_else(|| NewslensError::Config("sort field and path are required".into()))?;

        Ok(DatasetProfile {
            index,
            root_field,
            levels: self.levels,
            traversal: self.traversal,
            sort_field,
            sort_path,
            page_size: if self.page_size == 0 {
                5000
            } else {
                self.page_size
            },
            agg_size: if self.agg_size == 0 { 1000 } else { self.agg_size },
        })
    }
}
