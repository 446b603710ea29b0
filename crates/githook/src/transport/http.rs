//! reqwest-backed transport.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE};
use tracing::{debug, warn};

use super::{Transport, TransportRequest, TransportResponse};
use crate::error::TransportError;

/// Default timeout for a single outbound call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const JSON: &str = "application/json";

/// Transport that performs real HTTP calls.
///
/// Every request carries `Content-Type: application/json` and
/// `Accept: application/json`. Timeouts, network failures and non-2xx
/// answers all come back as [`TransportError`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Timeout applied to each request.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn make_request(
        &self,
        request: &TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let url = reqwest::Url::parse(&request.url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {e}", request.url)))?;

        debug!(
            method = %request.method,
            url = %url,
            body_len = request.body.len(),
            "Sending outbound request"
        );

        let response = self
            .client
            .request(request.method.into(), url)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .body(request.body.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                method = %request.method,
                url = %request.url,
                status = %status,
                "Outbound request returned non-success status"
            );
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let headers = collect_headers(response.headers());
        debug!(status = %status, "Outbound request succeeded");

        Ok(TransportResponse {
            status_code: status.as_u16(),
            headers,
        })
    }
}

/// Flatten response headers; values that are not UTF-8 are converted lossily.
fn collect_headers(map: &HeaderMap) -> BTreeMap<String, String> {
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in map {
        let value = String::from_utf8_lossy(value.as_bytes());
        match headers.entry(name.as_str().to_string()) {
            Entry::Occupied(mut existing) => {
                let existing = existing.get_mut();
                existing.push_str(", ");
                existing.push_str(&value);
            }
            Entry::Vacant(slot) => {
                slot.insert(value.into_owned());
            }
        }
    }
    headers
}
