//! Connection to the external search index.
//!
//! The rest of the crate talks to the index through the [`IndexClient`]
//! trait, which takes a JSON search body and returns the raw JSON response.
//! Tests inject stub clients; production wiring uses [`HttpIndexClient`],
//! one blocking HTTP client constructed at startup from an explicit
//! [`IndexConfig`] and reused read-only for the process lifetime. Every call
//! is attempted exactly once; there are no retries and no caching.

pub use error::{IndexError, Result};
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tracing::debug;

/// A read-only handle on the search index.
///
/// `search` covers both document searches and zero-size aggregation
/// requests, since the wire shape is the same `_search` body either way.
pub trait IndexClient {
    fn search(&self, index: &str, body: &Value) -> Result<Value>;
}

/// Endpoint and credentials for the index, supplied as static configuration.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Base URL of the search cluster, e.g. `https://search.example.com`.
    pub endpoint: String,
    /// Optional API key sent as `Authorization: ApiKey <key>`.
    pub api_key: Option<String>,
}

/// Blocking HTTP implementation of [`IndexClient`].
///
/// No timeout is configured beyond the transport default; a stalled request
/// blocks the calling thread until the transport's own failure path fires.
#[derive(Debug, Clone)]
pub struct HttpIndexClient {
    http: reqwest::blocking::Client,
    config: IndexConfig,
}

impl HttpIndexClient {
    pub fn new(config: IndexConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder().build()?;
        Ok(Self { http, config })
    }
}

impl IndexClient for HttpIndexClient {
    fn search(&self, index: &str, body: &Value) -> Result<Value> {
        let url = format!(
            "{}/{}/_search",
            self.config.endpoint.trim_end_matches('/'),
            index
        );
        debug!(%url, "submitting search request");

        let mut request = self.http.post(&url).json(body);
        if let Some(key) = &self.config.api_key {
            request = request.header(AUTHORIZATION, format!("ApiKey {key}"));
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(IndexError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json()?)
    }
}

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum IndexError {
        #[error("Transport error: {0}")]
        Transport(#[from] reqwest::Error),
        #[error("Index returned HTTP {status}: {body}")]
        Http { status: u16, body: String },
        #[error("Response missing expected key at {path}")]
        ResponseShape { path: String },
        #[error(transparent)]
        Other(#[from] anyhow::Error),
    }

    pub type Result<T> = std::result::Result<T, IndexError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction() {
        let client = HttpIndexClient::new(IndexConfig {
            endpoint: "https://search.example.com/".into(),
            api_key: None,
        });
        assert!(client.is_ok());
    }

    #[test]
    fn test_response_shape_error_names_path() {
        let err = IndexError::ResponseShape {
            path: "/aggregations/regions/names/buckets".into(),
        };
        assert!(err.to_string().contains("/aggregations/regions/names/buckets"));
    }
}
