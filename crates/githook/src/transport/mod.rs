//! Outbound HTTP transport capability.
//!
//! [`Transport`] is the boundary every side-effecting handler goes through to
//! reach the network. Two implementations ship with the crate:
//!
//! - [`HttpTransport`] issues real requests with reqwest
//! - [`StubTransport`] records requests and answers with a canned response
//!
//! Which one is used is decided once at startup (see [`crate::config::TransportKind`])
//! and injected into the handlers that need it.

pub mod http;
pub mod stub;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;

use crate::error::TransportError;

pub use http::HttpTransport;
pub use stub::StubTransport;

/// HTTP method of an outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Patch => Self::PATCH,
            Method::Delete => Self::DELETE,
        }
    }
}

/// A single outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    /// Opaque request body, sent as-is
    pub body: Vec<u8>,
}

impl TransportRequest {
    /// Create a request with an empty body.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: Vec::new(),
        }
    }

    /// Attach a body to the request.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

/// Successful outcome of an outbound call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    pub status_code: u16,
    /// Response headers, lower-cased names. Repeated headers are joined with `, `
    /// and values that are not UTF-8 are converted lossily.
    pub headers: BTreeMap<String, String>,
}

/// Capability to perform one outbound HTTP call.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Perform the request once. No retries.
    async fn make_request(
        &self,
        request: &TransportRequest,
    ) -> Result<TransportResponse, TransportError>;
}
