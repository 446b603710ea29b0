//! GitHub webhook receiver binary.
//!
//! Standalone HTTP service for GitHub webhook dispatch.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use githook::{server, Config, LogFormat, TracingLogSink};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = EnvFilter::from_default_env().add_directive("githook=info".parse()?);
    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init(),
    }

    info!(
        environment = %config.environment,
        transport = %config.transport,
        deployment_url = %config.deployment_url,
        strict_deployment = config.strict_deployment,
        "Starting GitHub webhook service..."
    );

    let transport = config
        .build_transport()
        .context("Failed to create outbound transport")?;

    let state = server::AppState::new(&config, transport, Arc::new(TracingLogSink));
    let app = server::build_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(port = config.port, "GitHub webhook service listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
