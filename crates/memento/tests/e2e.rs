// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests across the gateway, SQLite storage, and the scheduler.
//!
//! Each test creates an isolated TestHarness with a temp database, a recording
//! notifier, and a manual clock. Tests are independent and order-insensitive.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::TimeDelta;
use memento_core::{Clock, Notifier};
use memento_gateway::{router, GatewayState, HealthState};
use memento_scheduler::{ReminderScheduler, ScanConfig, SchedulerSettings};
use memento_test_utils::TestHarness;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(value.to_string())),
        None => Request::builder().method(method).uri(uri).body(Body::empty()),
    };
    let response = app.clone().oneshot(request.unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

const WAIT: Duration = Duration::from_secs(5);

/// SQLite runs on its own thread, so these tests use real time with a fast tick
/// and move the manual clock by hand.
fn stack(harness: &TestHarness) -> (Router, ReminderScheduler) {
    let scheduler = ReminderScheduler::new(
        harness.store(),
        Arc::clone(&harness.notifier) as Arc<dyn Notifier>,
        Arc::clone(&harness.clock) as Arc<dyn Clock>,
        SchedulerSettings {
            tick: Duration::from_millis(20),
            scan: ScanConfig::default(),
        },
    );
    let app = router(GatewayState {
        store: harness.store(),
        max_reminders: harness.config.app.max_reminders,
        health: HealthState::new(Some(scheduler.status())),
    });
    (app, scheduler)
}

// ---- Created through the API, fired by the scheduler ----

#[tokio::test]
async fn reminder_created_over_http_fires_once() {
    let harness = TestHarness::new().await.unwrap();
    let (app, scheduler) = stack(&harness);

    let (status, _) = call(
        &app,
        Method::POST,
        "/reminders",
        Some(json!({ "message": "Stand-up", "day": "Monday", "time": "09:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let mut status = scheduler.status();
    scheduler.start().await;
    assert!(harness.notifier.wait_for(1, WAIT).await);
    assert_eq!(harness.notifier.messages().await, vec!["Stand-up"]);

    // Walk the wall clock through the occurrence in 30 s steps.
    for _ in 0..4 {
        harness.clock.advance(TimeDelta::seconds(30));
        let seen = status.borrow_and_update().ticks;
        status.wait_for(|s| s.ticks > seen + 1).await.unwrap();
    }
    assert_eq!(harness.notifier.count().await, 1);

    let (_, health) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["scheduler"]["fired_total"], 1);

    scheduler.stop().await;
}

// ---- Deleted reminders stop firing ----

#[tokio::test]
async fn deleted_reminder_never_fires() {
    let harness = TestHarness::new().await.unwrap();
    let (app, scheduler) = stack(&harness);
    let reminder = harness.seed("Stand-up", "Monday", "09:00").await.unwrap();

    let (status, _) = call(&app, Method::DELETE, &format!("/reminders/{}", reminder.id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let mut status = scheduler.status();
    scheduler.start().await;
    status.wait_for(|s| s.ticks >= 3).await.unwrap();
    assert_eq!(harness.notifier.count().await, 0);

    scheduler.stop().await;
}

// ---- Limits hold across the stack ----

#[tokio::test]
async fn capacity_and_clear_round_trip_through_sqlite() {
    let harness = TestHarness::builder().with_max_reminders(2).build().await.unwrap();
    let (app, _scheduler) = stack(&harness);

    for (message, day) in [("one", "Monday"), ("two", "Tuesday")] {
        let (status, _) = call(
            &app,
            Method::POST,
            "/reminders",
            Some(json!({ "message": message, "day": day, "time": "09:00" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = call(
        &app,
        Method::POST,
        "/reminders",
        Some(json!({ "message": "three", "day": "Friday", "time": "09:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Maximum limit of 2 reminders reached");

    let (status, body) = call(&app, Method::DELETE, "/reminders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 2);

    let (_, list) = call(&app, Method::GET, "/reminders", None).await;
    assert_eq!(list, json!([]));
}

// ---- Failed deliveries are not retried ----

#[tokio::test]
async fn failing_notifier_does_not_cause_refires() {
    let harness = TestHarness::builder().with_failing_notifier().build().await.unwrap();
    let (_app, scheduler) = stack(&harness);
    harness.seed("Stand-up", "Monday", "09:00").await.unwrap();

    let mut status = scheduler.status();
    scheduler.start().await;
    assert!(harness.notifier.wait_for(1, WAIT).await);

    let seen = status.borrow_and_update().ticks;
    status.wait_for(|s| s.ticks > seen + 2).await.unwrap();
    assert_eq!(harness.notifier.count().await, 1);

    scheduler.stop().await;
}
