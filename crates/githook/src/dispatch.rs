//! Event dispatcher.
//!
//! Routes an [`InboundEvent`] to the [`EventHandler`] registered for its exact
//! event token, or to the fallback handler when nothing matches. Each dispatch
//! emits two records on the injected [`LogSink`]: one on receipt and one once
//! the handler is chosen.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::event::InboundEvent;
use crate::logging::{LogRecord, LogSink, TracingLogSink};

/// JSON body returned to the webhook sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchBody {
    pub status: String,
    pub event: String,
}

/// Outcome of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub status: StatusCode,
    pub body: DispatchBody,
}

impl DispatchResult {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            status,
            body: DispatchBody {
                status: message.into(),
                event: event.into(),
            },
        }
    }

    /// `200 {"status": "OK", "event": <event>}`
    #[must_use]
    pub fn ok(event: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, "OK", event)
    }

    /// `400 {"status": "Unknown event", "event": <event>}`
    #[must_use]
    pub fn unknown(event: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Unknown event", event)
    }
}

/// Handler for one kind of webhook event.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Message recorded when the dispatcher routes `event` to this handler.
    fn resolution_message(&self, event: &InboundEvent) -> String;

    /// Handle the event. Must not fail; errors are turned into a result.
    async fn handle(&self, event: &InboundEvent) -> DispatchResult;
}

/// Default handler for tokens nobody registered.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownEventHandler;

#[async_trait]
impl EventHandler for UnknownEventHandler {
    fn resolution_message(&self, event: &InboundEvent) -> String {
        format!("Ignoring unknown event: {}", event.event_type())
    }

    async fn handle(&self, event: &InboundEvent) -> DispatchResult {
        DispatchResult::unknown(event.event_type())
    }
}

/// Routes events to handlers keyed on the exact event token.
pub struct Dispatcher {
    handlers: HashMap<String, Arc<dyn EventHandler>>,
    fallback: Arc<dyn EventHandler>,
    sink: Arc<dyn LogSink>,
}

impl Dispatcher {
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Whether a handler is registered for `event_type`.
    #[must_use]
    pub fn handles(&self, event_type: &str) -> bool {
        self.handlers.contains_key(event_type)
    }

    /// Registered event tokens, sorted.
    #[must_use]
    pub fn registered_events(&self) -> Vec<&str> {
        let mut events: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        events.sort_unstable();
        events
    }

    /// Dispatch one event. Never fails.
    pub async fn dispatch(&self, event: &InboundEvent) -> DispatchResult {
        let token = event.event_type();

        self.sink.record(LogRecord::info(
            format!("Received GitHub event: {token}"),
            token,
        ));

        let handler = self.handlers.get(token).unwrap_or(&self.fallback);

        self.sink
            .record(LogRecord::info(handler.resolution_message(event), token));

        handler.handle(event).await
    }

    /// Dispatch a bare event token.
    pub async fn dispatch_token(&self, event_type: &str) -> DispatchResult {
        self.dispatch(&InboundEvent::new(event_type)).await
    }
}

/// Builder for [`Dispatcher`].
pub struct DispatcherBuilder {
    handlers: HashMap<String, Arc<dyn EventHandler>>,
    fallback: Arc<dyn EventHandler>,
    sink: Arc<dyn LogSink>,
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: Arc::new(UnknownEventHandler),
            sink: Arc::new(TracingLogSink),
        }
    }
}

impl DispatcherBuilder {
    /// Register `handler` for `event_type`, replacing any earlier one.
    #[must_use]
    pub fn register(
        mut self,
        event_type: impl Into<String>,
        handler: Arc<dyn EventHandler>,
    ) -> Self {
        self.handlers.insert(event_type.into(), handler);
        self
    }

    /// Handler for unregistered tokens. Defaults to [`UnknownEventHandler`].
    #[must_use]
    pub fn fallback(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.fallback = handler;
        self
    }

    /// Sink for dispatch records. Defaults to [`TracingLogSink`].
    #[must_use]
    pub fn log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub fn build(self) -> Dispatcher {
        Dispatcher {
            handlers: self.handlers,
            fallback: self.fallback,
            sink: self.sink,
        }
    }
}
