//! Clients for the external scrubbing, dispatch, and relay services.
//!
//! Each service gets a small client struct holding its endpoint and a
//! `reqwest` client. Responses are surfaced as [`ApiError`] values; nothing
//! here retries.

pub mod backup;
pub mod dispatch;
pub mod scrubbing;

use reqwest::Client as HttpClient;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to an external service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure reaching the service.
    #[error("Network error: {0}")]
    Network(String),
    /// Non-success HTTP status from the service.
    #[error("{service} error: {status}")]
    Status {
        /// Human-readable service name.
        service: &'static str,
        /// Status returned by the service.
        status: StatusCode,
    },
    /// Response body could not be parsed as JSON.
    #[error("JSON error: {0}")]
    Json(String),
    /// Response parsed but lacked required data.
    #[error("{0}")]
    InvalidResponse(String),
    /// Error reported in a response body.
    #[error("{0}")]
    Api(String),
}

/// Creates an HTTP client with the given request timeout.
///
/// Used by the relay for its upstream calls, which carry a fixed bound so a
/// slow upstream cannot pin a relay worker forever.
#[must_use]
pub fn create_http_client(timeout: Duration) -> HttpClient {
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| HttpClient::new())
}
