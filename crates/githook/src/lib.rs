//! GitHub webhook receiver.
//!
//! This crate provides:
//! - Extraction of the event token from the `x-github-event` header
//! - A dispatcher that routes events to handlers registered per token, with a
//!   fallback for everything else
//! - A deployment handler that fires one outbound HTTP call per `deployment`
//!   event through a swappable [`Transport`]
//! - An axum router exposing `POST /api/githook`
//!
//! # Architecture
//!
//! - [`Transport`] is the outbound boundary; [`HttpTransport`] talks to the
//!   network, [`StubTransport`] records calls and never does
//! - [`DeploymentHandler`] owns the transport it was given at construction
//! - [`Dispatcher`] holds the handler registry and reports every routing
//!   decision on a [`LogSink`]
//!
//! # Configuration
//!
//! See [`Config`] for the `GITHOOK_*` environment variables. The transport is
//! picked once from the environment (`GITHOOK_ENV=test` selects the stub).

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod deployment;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod logging;
pub mod server;
pub mod transport;

pub use config::{Config, Environment, LogFormat, TransportKind};
pub use deployment::{DeploymentEventHandler, DeploymentHandler, DEPLOYMENT_EVENT};
pub use dispatch::{
    DispatchBody, DispatchResult, Dispatcher, DispatcherBuilder, EventHandler, UnknownEventHandler,
};
pub use error::{ConfigError, TransportError};
pub use event::InboundEvent;
pub use logging::{LogRecord, LogSink, MemoryLogSink, TracingLogSink};
pub use transport::{
    HttpTransport, Method, StubTransport, Transport, TransportRequest, TransportResponse,
};
