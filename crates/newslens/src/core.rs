//! The main browsing facade and its degraded-error boundary.
//!
//! [`FeedBrowser`] drives the three in-scope components — region listing,
//! query building and row flattening — against an injected [`IndexClient`].
//! It is also where the crate's error policy lives: no index failure is
//! fatal. Every transport or response-shape error is caught here, logged,
//! and converted into an empty result carrying a user-visible notice, so a
//! presentation layer can always render "no data" and let the user retry
//! with a different selection.
//!
//! One blocking round trip per user action; no retries, no caching between
//! actions.

use tracing::{error, info, instrument};

use crate::{
    client::{IndexClient, IndexError, Result as IndexResult},
    config::DatasetProfile,
    flatten::{NewsRow, flatten_hits},
    query::{LevelPick, build_search_body},
    regions,
};

/// Selector contents for one administrative level, or an empty list plus a
/// notice when the listing failed. An empty list means "selector has no
/// options", never a crash signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub names: Vec<String>,
    /// User-visible diagnostic when the listing degraded.
    pub notice: Option<String>,
}

impl Listing {
    fn ok(names: Vec<String>) -> Self {
        Self {
            names,
            notice: None,
        }
    }

    fn degraded(notice: String) -> Self {
        Self {
            names: Vec::new(),
            notice: Some(notice),
        }
    }
}

/// One fetched page of flattened rows. `total` is the hit count of the
/// underlying search ("Total feeds"), zero when the fetch degraded.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage {
    pub rows: Vec<NewsRow>,
    pub total: usize,
    /// User-visible diagnostic when the fetch degraded.
    pub notice: Option<String>,
}

impl FeedPage {
    fn degraded(notice: String) -> Self {
        Self {
            rows: Vec::new(),
            total: 0,
            notice: Some(notice),
        }
    }
}

/// The main feed browser over one dataset.
///
/// Holds the index client (opened once, reused read-only) and the dataset
/// profile, both supplied explicitly at construction.
///
/// # Examples
///
/// ```rust,no_run
/// use newslens::{DatasetProfile, FeedBrowser, HttpIndexClient, IndexConfig, LevelPick};
///
/// let client = HttpIndexClient::new(IndexConfig {
///     endpoint: "https://search.example.com".into(),
///     api_key: None,
/// })?;
/// let browser = FeedBrowser::new(client, DatasetProfile::sri_lanka());
///
/// let provinces = browser.top_regions();
/// let page = browser.fetch(&LevelPick::All, &LevelPick::Unset, false);
/// # Ok::<(), newslens::error::NewslensError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FeedBrowser<C: IndexClient> {
    client: C,
    profile: DatasetProfile,
}

impl<C: IndexClient> FeedBrowser<C> {
    pub fn new(client: C, profile: DatasetProfile) -> Self {
        Self { client, profile }
    }

    pub fn profile(&self) -> &DatasetProfile {
        &self.profile
    }

    /// List the top-level regions for the selector, degrading to an empty
    /// listing plus a notice on any index failure.
    #[instrument(skip(self))]
    pub fn top_regions(&self) -> Listing {
        match regions::top_level_inner(&self.client, &self.profile) {
            Ok(names) => Listing::ok(names),
            Err(e) => {
                error!(error = %e, "top-level region listing failed");
                Listing::degraded(format!(
                    "Could not load {} list: {e}",
                    self.profile.top_level().label
                ))
            }
        }
    }

    /// List the sub-regions under `parent`, degrading like [`Self::top_regions`].
    #[instrument(skip(self))]
    pub fn child_regions(&self, parent: &str) -> Listing {
        match regions::child_inner(&self.client, &self.profile, parent) {
            Ok(names) => Listing::ok(names),
            Err(e) => {
                error!(parent, error = %e, "child region listing failed");
                Listing::degraded(format!(
                    "Could not load {} list: {e}",
                    self.profile.sub_level().label
                ))
            }
        }
    }

    /// Fetch one page of flattened rows for a `(region, sub-region)`
    /// selection. `content_visible = false` truncates content for preview.
    ///
    /// Degrades to an empty page with total 0 plus a notice on any index
    /// failure; the search is attempted exactly once.
    #[instrument(skip(self))]
    pub fn fetch(&self, top: &LevelPick, sub: &LevelPick, content_visible: bool) -> FeedPage {
        match self.fetch_inner(top, sub, content_visible) {
            Ok(page) => page,
            Err(e) => {
                error!(error = %e, "feed fetch failed");
                FeedPage::degraded(format!("Could not fetch feeds: {e}"))
            }
        }
    }

    fn fetch_inner(
        &self,
        top: &LevelPick,
        sub: &LevelPick,
        content_visible: bool,
    ) -> IndexResult<FeedPage> {
        let body = build_search_body(&self.profile, top, sub);
        let response = self.client.search(&self.profile.index, &body)?;

        let hits = response
            .pointer("/hits/hits")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| IndexError::ResponseShape {
                path: "/hits/hits".to_owned(),
            })?;

        let rows = flatten_hits(hits, &self.profile, content_visible);
        info!(total = hits.len(), rows = rows.len(), "fetch complete");
        Ok(FeedPage {
            total: hits.len(),
            rows,
            notice: None,
        })
    }
}
