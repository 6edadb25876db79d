//! Newslens - Geotagged News Feed Browsing Core
//!
//! Newslens is the query-construction and result-flattening layer behind a
//! regional news-feed browser. It turns a hierarchical administrative region
//! selection (province → district, or state → district) into a correctly
//! shaped search request against a deeply nested document index, and
//! normalizes the heterogeneous nested JSON documents that come back into a
//! uniform rectangular table.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use newslens::{DatasetProfile, FeedBrowser, HttpIndexClient, IndexConfig, LevelPick};
//!
//! // Connect to the index once; the client is reused read-only.
//! let client = HttpIndexClient::new(IndexConfig {
//!     endpoint: "https://search.example.com".into(),
//!     api_key: Some("secret".into()),
//! })?;
//!
//! let browser = FeedBrowser::new(client, DatasetProfile::sri_lanka());
//!
//! // Populate the selectors.
//! let provinces = browser.top_regions();
//! let districts = browser.child_regions("Western");
//!
//! // Fetch a page of flattened rows.
//! let page = browser.fetch(
//!     &LevelPick::Name("Western".into()),
//!     &LevelPick::All,
//!     false,
//! );
//! println!("Total feeds: {}", page.total);
//! for row in &page.rows {
//!     println!("{} {} {}", row.id, row.datetime, row.media);
//! }
//! # Ok::<(), newslens::error::NewslensError>(())
//! ```
//!
//! # Design
//!
//! - **Region Resolver** ([`FeedBrowser::top_regions`] /
//!   [`FeedBrowser::child_regions`]): aggregation queries that list the valid
//!   child regions for a selected parent.
//! - **Query Builder** ([`build_search_body`]): turns a `(region, sub-region)`
//!   selection, where either level may be a wildcard, into a search body with
//!   nested filters and a nested-path descending datetime sort.
//! - **Result Flattener** ([`flatten_hits`]): walks the irregularly shaped
//!   nested documents down to the leaf news items and emits one display-safe
//!   row per item, tolerating list fields that arrive as single objects,
//!   bare strings, or null.
//!
//! The two supported dataset regimes (two nested region levels vs. flat
//! region fields) share one parameterized implementation driven by a
//! [`DatasetProfile`] descriptor.
//!
//! Every failure degrades to "no data plus a notice": transport and
//! response-shape errors never cross the [`FeedBrowser`] boundary as panics
//! or `Err` values.
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod client;
mod config;
mod core;
pub mod error;
mod flatten;
mod query;
mod regions;

pub use self::core::{FeedBrowser, FeedPage, Listing};

pub use client::{HttpIndexClient, IndexClient, IndexConfig, IndexError};
pub use config::{DatasetProfile, DatasetProfileBuilder, RegionLevel};
pub use flatten::{NewsRow, Shape, flatten_hits};
pub use query::{LevelPick, build_search_body};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the Newslens library.
///
/// This sets up structured logging with configurable levels and filtering.
/// Call this once at the start of your application to enable detailed
/// logging output from Newslens operations.
///
/// # Arguments
///
/// * `level` - The minimum log level to display
///
/// # Examples
///
/// ```rust
/// use newslens::init_logging;
/// use tracing::Level;
///
/// // Initialize with info-level logging
/// init_logging(Level::INFO)?;
/// # Ok::<(), newslens::error::NewslensError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::NewslensError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("hyper_util=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .init();
        Ok(())
    })
}
