// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the reminder REST API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use memento_core::types::{NewReminder, Reminder, ReminderId};
use memento_core::validation::{ensure_capacity, validate_new_reminder};
use memento_core::MementoError;
use memento_scheduler::SchedulerStatus;
use serde::Serialize;

use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok", or "degraded" while the scheduler's last fetch failed.
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub scheduler: Option<SchedulerStatus>,
}

/// Response body for a successful POST /reminders.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub reminder: Reminder,
}

/// Response body for DELETE /reminders.
#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub deleted: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let scheduler = state
        .health
        .scheduler
        .as_ref()
        .map(|rx| rx.borrow().clone());
    let degraded = scheduler
        .as_ref()
        .is_some_and(|s| s.last_error.is_some());

    Json(HealthResponse {
        status: if degraded { "degraded" } else { "ok" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        scheduler,
    })
}

/// GET /reminders
///
/// Every stored reminder, newest first.
pub async fn list_reminders(State(state): State<GatewayState>) -> Response {
    match state.store.list_reminders().await {
        Ok(reminders) => Json(reminders).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch reminders");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch reminders")
        }
    }
}

/// POST /reminders
///
/// Validation runs before the capacity check, so a bad request is reported as
/// such even when the store is full.
pub async fn create_reminder(
    State(state): State<GatewayState>,
    body: Result<Json<NewReminder>, JsonRejection>,
) -> Response {
    let Json(new) = match body {
        Ok(body) => body,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    if let Err(e) = validate_new_reminder(&new) {
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }

    let current = match state.store.count_reminders().await {
        Ok(n) => usize::try_from(n).unwrap_or(usize::MAX),
        Err(e) => {
            tracing::error!(error = %e, "failed to count reminders");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create reminder");
        }
    };
    if let Err(e) = ensure_capacity(current, state.max_reminders) {
        return error_response(StatusCode::CONFLICT, e.to_string());
    }

    match state.store.create_reminder(&new).await {
        Ok(reminder) => {
            tracing::info!(
                reminder_id = reminder.id,
                day = %reminder.day,
                time = %reminder.time,
                "reminder created"
            );
            (
                StatusCode::CREATED,
                Json(CreatedResponse {
                    message: "Reminder created".to_string(),
                    reminder,
                }),
            )
                .into_response()
        }
        Err(e @ MementoError::Validation { .. }) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to create reminder");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create reminder")
        }
    }
}

/// DELETE /reminders/{id}
///
/// Deleting a reminder that does not exist still succeeds.
pub async fn delete_reminder(
    State(state): State<GatewayState>,
    Path(id): Path<ReminderId>,
) -> Response {
    match state.store.delete_reminder(id).await {
        Ok(existed) => {
            tracing::info!(reminder_id = id, existed, "reminder deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            tracing::error!(reminder_id = id, error = %e, "failed to delete reminder");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete reminder")
        }
    }
}

/// DELETE /reminders
pub async fn clear_reminders(State(state): State<GatewayState>) -> Response {
    match state.store.delete_all_reminders().await {
        Ok(deleted) => {
            tracing::info!(deleted, "reminders cleared");
            Json(ClearedResponse { deleted }).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to clear reminders");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to clear reminders")
        }
    }
}
