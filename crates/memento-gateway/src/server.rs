// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the reminder API.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{delete, get},
    Router,
};
use memento_core::{MementoError, ReminderStore};
use memento_scheduler::SchedulerStatus;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Health state for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: Instant,
    /// Live scheduler status, when a scheduler is running in this process.
    pub scheduler: Option<watch::Receiver<SchedulerStatus>>,
}

impl HealthState {
    pub fn new(scheduler: Option<watch::Receiver<SchedulerStatus>>) -> Self {
        Self {
            start_time: Instant::now(),
            scheduler,
        }
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub store: Arc<dyn ReminderStore>,
    /// Creates are refused once this many reminders exist.
    pub max_reminders: usize,
    pub health: HealthState,
}

/// Gateway server configuration (mirrors GatewayConfig from memento-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Build the gateway router.
///
/// - GET /health
/// - GET, POST, DELETE /reminders
/// - DELETE /reminders/{id}
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route(
            "/reminders",
            get(handlers::list_reminders)
                .post(handlers::create_reminder)
                .delete(handlers::clear_reminders),
        )
        .route("/reminders/{id}", delete(handlers::delete_reminder))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind the listener for `config`.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, MementoError> {
    let addr = config.addr();
    TcpListener::bind(&addr)
        .await
        .map_err(|e| MementoError::Internal(format!("failed to bind gateway to {addr}: {e}")))
}

/// Serve on an already-bound listener until `shutdown` is cancelled.
///
/// In-flight requests are drained before this returns.
pub async fn serve(
    listener: TcpListener,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), MementoError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Gateway server listening on {addr}");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| MementoError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("gateway server stopped");
    Ok(())
}

/// Bind to the configured host:port and serve until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), MementoError> {
    let listener = bind(config).await?;
    serve(listener, state, shutdown).await
}
