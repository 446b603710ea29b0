//! HTTP server for GitHub webhooks.

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::config::Config;
use crate::deployment::{DeploymentEventHandler, DeploymentHandler, DEPLOYMENT_EVENT};
use crate::dispatch::{DispatchResult, Dispatcher};
use crate::event::InboundEvent;
use crate::logging::LogSink;
use crate::transport::Transport;

/// Path GitHub delivers webhooks to.
pub const WEBHOOK_PATH: &str = "/api/githook";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Wire the dispatcher with the deployment handler on `transport`.
    #[must_use]
    pub fn new(config: &Config, transport: Arc<dyn Transport>, sink: Arc<dyn LogSink>) -> Self {
        let deployment = DeploymentHandler::new(transport, config.deployment_url.as_str());
        let dispatcher = Dispatcher::builder()
            .register(
                DEPLOYMENT_EVENT,
                Arc::new(DeploymentEventHandler::new(deployment).strict(config.strict_deployment)),
            )
            .log_sink(sink)
            .build();

        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}

impl IntoResponse for DispatchResult {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Build the HTTP router for the webhook service.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(github_webhook_handler))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Handle an incoming GitHub webhook.
///
/// Only the event header is read; the body is not parsed.
pub async fn github_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> DispatchResult {
    let event = InboundEvent::from_headers(&headers);

    debug!(
        event_type = %event.event_type(),
        delivery_id = ?event.delivery_id(),
        "Webhook request received"
    );

    state.dispatcher.dispatch(&event).await
}
