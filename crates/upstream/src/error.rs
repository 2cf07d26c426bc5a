//! Upstream fetch error types.

use thiserror::Error;

/// Failures talking to the upstream data sources.
///
/// Every fetch-path variant maps outward to "service unavailable": the
/// caller's remedy is the same (retry the refresh later) whether the
/// upstream timed out, refused the connection, returned a 5xx, or sent a
/// payload that did not decode.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("could not fetch data from {service}: {source}")]
    Unavailable {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response from {service}: {detail}")]
    BadResponse {
        service: &'static str,
        detail: String,
    },

    #[error("upstream client configuration error: {0}")]
    Config(String),
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = std::result::Result<T, UpstreamError>;
