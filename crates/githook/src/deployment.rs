//! Deployment side effect triggered by `deployment` webhooks.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use tracing::{debug, warn};

use crate::dispatch::{DispatchResult, EventHandler};
use crate::error::TransportError;
use crate::event::InboundEvent;
use crate::transport::{Method, Transport, TransportRequest, TransportResponse};

/// Event token handled by [`DeploymentEventHandler`].
pub const DEPLOYMENT_EVENT: &str = "deployment";

/// Fires the configured deployment hook through a [`Transport`].
#[derive(Clone)]
pub struct DeploymentHandler {
    transport: Arc<dyn Transport>,
    url: String,
}

impl DeploymentHandler {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }

    /// Target URL of the deployment hook.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST an empty body to the deployment URL, once.
    ///
    /// The transport outcome is returned unchanged.
    pub async fn handle_deployment(&self) -> Result<TransportResponse, TransportError> {
        let request = TransportRequest::new(Method::Post, self.url.as_str());

        debug!(
            transport = self.transport.name(),
            url = %self.url,
            "Triggering deployment"
        );

        self.transport.make_request(&request).await
    }
}

/// Dispatcher entry for `deployment` events.
///
/// Answers `200 OK` whatever the deployment call returns, unless `strict` is
/// set, in which case a failed call answers `502`. Failures are always logged.
pub struct DeploymentEventHandler {
    deployment: DeploymentHandler,
    strict: bool,
}

impl DeploymentEventHandler {
    #[must_use]
    pub fn new(deployment: DeploymentHandler) -> Self {
        Self {
            deployment,
            strict: false,
        }
    }

    /// Reflect deployment failures in the HTTP response.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[async_trait]
impl EventHandler for DeploymentEventHandler {
    fn resolution_message(&self, _event: &InboundEvent) -> String {
        "Handling deployment event".to_string()
    }

    async fn handle(&self, event: &InboundEvent) -> DispatchResult {
        match self.deployment.handle_deployment().await {
            Ok(response) => {
                debug!(
                    status_code = response.status_code,
                    delivery_id = ?event.delivery_id(),
                    "Deployment hook accepted"
                );
                DispatchResult::ok(event.event_type())
            }
            Err(e) => {
                warn!(
                    error = %e,
                    url = %self.deployment.url(),
                    delivery_id = ?event.delivery_id(),
                    "Deployment hook failed"
                );
                if self.strict {
                    DispatchResult::new(
                        StatusCode::BAD_GATEWAY,
                        "Deployment failed",
                        event.event_type(),
                    )
                } else {
                    DispatchResult::ok(event.event_type())
                }
            }
        }
    }
}
