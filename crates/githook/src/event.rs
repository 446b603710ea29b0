//! Inbound webhook event extraction.

use axum::http::HeaderMap;

/// Header carrying the GitHub event type.
pub const EVENT_HEADER: &str = "x-github-event";

/// Header carrying the GitHub delivery GUID.
pub const DELIVERY_HEADER: &str = "x-github-delivery";

/// A classified inbound webhook.
///
/// Built once per request and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    event_type: String,
    delivery_id: Option<String>,
}

impl InboundEvent {
    /// Build an event from a bare token.
    #[must_use]
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            delivery_id: None,
        }
    }

    /// Extract the event from request headers.
    ///
    /// Uses the first `x-github-event` value. A missing header gives an empty
    /// token. In both headers, bytes that are not valid UTF-8 are replaced,
    /// not rejected.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let event_type = headers
            .get(EVENT_HEADER)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_default();

        let delivery_id = headers
            .get(DELIVERY_HEADER)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

        Self {
            event_type,
            delivery_id,
        }
    }

    /// The raw event token, possibly empty.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    #[must_use]
    pub fn delivery_id(&self) -> Option<&str> {
        self.delivery_id.as_deref()
    }
}
