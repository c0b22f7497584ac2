//! HTTP transport for the catalog API.
//!
//! One configured [`reqwest::Client`] per [`ApiClient`], a fixed request
//! timeout, and a single classification point turning transport and status
//! failures into [`ApiError`]. No retries happen here; retrying is a
//! user-initiated action at the presentation layer.

use std::fmt;
use std::time::Duration;

use log::{debug, warn};
use serde::de::DeserializeOwned;

/// Fixed request timeout for every catalog call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Classified failure of a catalog request, checked in priority order:
/// timeout, then 404, then no-response, then everything else.
#[derive(Debug)]
pub enum ApiError {
    /// The request did not complete within [`REQUEST_TIMEOUT`].
    Timeout,
    /// The remote answered 404 for the requested resource.
    NotFound,
    /// No response arrived at all (DNS failure, connection refused, no
    /// connectivity).
    NetworkUnreachable,
    /// Any other failure: a non-404 error status or an undecodable body.
    /// `status` is `None` when the failure happened before a status line
    /// was read.
    Other {
        status: Option<u16>,
        message: String,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Timeout => write!(f, "request timed out"),
            ApiError::NotFound => write!(f, "resource not found"),
            ApiError::NetworkUnreachable => write!(f, "network unreachable"),
            ApiError::Other {
                status: Some(status),
                message,
            } => write!(f, "API error (HTTP {status}): {message}"),
            ApiError::Other {
                status: None,
                message,
            } => write!(f, "API error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Thin GET-only wrapper around [`reqwest::Client`] with the catalog's base
/// URL baked in.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// The timeout is fixed in production ([`ApiClient::new`]); tests shrink
    /// it to exercise timeout classification without waiting ten seconds.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Performs a single GET of `path` (relative to the base URL) and decodes
    /// the JSON body into `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {url} query={query:?}");

        let mut request = self.client.get(&url).timeout(self.timeout);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(|err| {
            let classified = classify_transport_error(err);
            warn!("GET {url} failed: {classified}");
            classified
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            warn!("GET {url} -> 404");
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("GET {url} -> {status}: {body}");
            return Err(ApiError::Other {
                status: Some(status.as_u16()),
                message: body,
            });
        }

        response.json::<T>().await.map_err(|err| {
            warn!("GET {url} -> undecodable body: {err}");
            ApiError::Other {
                status: Some(status.as_u16()),
                message: format!("undecodable response body: {err}"),
            }
        })
    }
}

/// Maps a [`reqwest::Error`] from `send()` into the taxonomy. Timeout wins
/// over everything; a request that never produced a response is
/// `NetworkUnreachable`.
fn classify_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else if err.is_connect() || err.is_request() {
        ApiError::NetworkUnreachable
    } else {
        ApiError::Other {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
