//! Poll boundary: the batch wire format and the HTTP fetch collaborator.
//!
//! The data endpoint is expected to return a JSON array of batch items, each
//! shaped `{panel_id, point_id, data: {<label>: <number>, ...}}`, filtered
//! server-side to ids greater than the `max_id` query parameter. Decoding is
//! strict: a malformed payload fails fast with a descriptive error instead of
//! propagating undefined state downstream.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

/// User agent for poll requests
const USER_AGENT: &str = concat!("liveboard/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while polling the data endpoint
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network error during the request
    #[error("network error: {0}")]
    Network(String),

    /// Endpoint answered with a non-success HTTP status
    #[error("endpoint returned status {0}")]
    Status(u16),

    /// Response body did not match the batch schema
    #[error("malformed batch payload: {0}")]
    Malformed(String),
}

// ============================================================================
// Wire Format
// ============================================================================

/// One poll response item: the values sampled for every label of a panel,
/// stamped with a single point id.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Batch {
    /// Panel the values belong to
    pub panel_id: u64,
    /// Identity shared by every value in `data`
    pub point_id: u64,
    /// Label name to sampled value
    pub data: BTreeMap<String, f64>,
}

/// Decode a poll response body into batch items.
///
/// Unknown fields and ill-typed values are rejected rather than ignored.
pub fn decode_batches(payload: &str) -> Result<Vec<Batch>, FetchError> {
    serde_json::from_str(payload).map_err(|e| FetchError::Malformed(e.to_string()))
}

// ============================================================================
// Fetch Collaborator
// ============================================================================

/// Seam for the external fetch collaborator.
///
/// `watermark` is the highest point id the caller has observed; the endpoint
/// contract is to return only newer points. An implementation may block for
/// as long as it likes; the widget applies no timeout of its own.
pub trait Fetcher {
    fn fetch(&mut self, watermark: u64) -> Result<Vec<Batch>, FetchError>;
}

/// HTTP implementation polling a JSON endpoint with `GET ?max_id=<watermark>`
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    endpoint: String,
}

impl HttpFetcher {
    /// Create a fetcher for the given endpoint URL
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// URL for one poll request
    fn poll_url(&self, watermark: u64) -> String {
        format!("{}?max_id={}", self.endpoint, watermark)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&mut self, watermark: u64) -> Result<Vec<Batch>, FetchError> {
        let url = self.poll_url(watermark);

        let mut response = ureq::get(&url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| match e {
                ureq::Error::StatusCode(status) => FetchError::Status(status),
                _ => FetchError::Network(e.to_string()),
            })?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let batches = decode_batches(&body)?;
        tracing::debug!(
            "fetched {} batch item(s) past watermark {}",
            batches.len(),
            watermark
        );
        Ok(batches)
    }
}
