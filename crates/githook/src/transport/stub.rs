//! In-process transport that never touches the network.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use super::{Transport, TransportRequest, TransportResponse};
use crate::error::TransportError;

/// Transport double used in the `test` environment and in tests.
///
/// Records every request it receives and answers with a canned outcome:
/// `200` with a JSON content type unless built with [`StubTransport::failing`].
#[derive(Debug)]
pub struct StubTransport {
    outcome: Result<TransportResponse, TransportError>,
    calls: Mutex<Vec<TransportRequest>>,
}

impl StubTransport {
    /// Stub that succeeds with `200`.
    #[must_use]
    pub fn new() -> Self {
        let headers = BTreeMap::from([("content-type".to_string(), "application/json".to_string())]);
        Self::with_outcome(Ok(TransportResponse {
            status_code: 200,
            headers,
        }))
    }

    /// Stub that fails every call with `error`.
    #[must_use]
    pub fn failing(error: TransportError) -> Self {
        Self::with_outcome(Err(error))
    }

    /// Stub that answers every call with `outcome`.
    #[must_use]
    pub fn with_outcome(outcome: Result<TransportResponse, TransportError>) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<TransportRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for StubTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for StubTransport {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn make_request(
        &self,
        request: &TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        debug!(method = %request.method, url = %request.url, "Stub transport recorded request");

        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        self.outcome.clone()
    }
}
