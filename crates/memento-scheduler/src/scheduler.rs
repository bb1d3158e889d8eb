// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-cadence loop that scans stored reminders and dispatches the due ones.
//!
//! The loop owns the [`FireState`] and hands it through [`TickRunner::tick`]
//! on every wake-up. Notifications are spawned so a slow notifier never
//! delays the next tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use memento_config::model::SchedulerConfig;
use memento_core::types::ReminderId;
use memento_core::{Clock, Notifier, ReminderStore};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::scanner::{self, FireState, ScanConfig};

/// Loop cadence and scan window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSettings {
    pub tick: Duration,
    pub scan: ScanConfig,
}

impl SchedulerSettings {
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self {
            tick: config.tick(),
            scan: ScanConfig::new(config.lookahead(), config.grace()),
        }
    }
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(30),
            scan: ScanConfig::default(),
        }
    }
}

/// Snapshot published after every tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerStatus {
    pub running: bool,
    pub ticks: u64,
    pub fired_total: u64,
    pub last_tick_at: Option<NaiveDateTime>,
    /// Fetch error from the most recent tick, cleared by the next good one.
    pub last_error: Option<String>,
}

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Reminders handed to the notifier, in scan order.
    pub fired: Vec<ReminderId>,
    /// Reminders with an unreadable schedule.
    pub skipped: Vec<ReminderId>,
    pub fetch_error: Option<String>,
    /// The loop was stopped before the scan ran.
    pub cancelled: bool,
}

/// Runs a single fetch, scan, and dispatch cycle.
pub struct TickRunner {
    store: Arc<dyn ReminderStore>,
    notifier: Arc<dyn Notifier>,
    scan: ScanConfig,
}

impl TickRunner {
    pub fn new(store: Arc<dyn ReminderStore>, notifier: Arc<dyn Notifier>, scan: ScanConfig) -> Self {
        Self {
            store,
            notifier,
            scan,
        }
    }

    /// Perform one tick at `now`, returning the state for the next tick.
    ///
    /// On fetch failure or cancellation the incoming state is returned untouched.
    pub async fn tick(
        &self,
        state: FireState,
        now: NaiveDateTime,
        cancel: &CancellationToken,
    ) -> (FireState, TickReport) {
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.store.list_reminders() => Some(result),
        };

        let reminders = match fetched {
            None => {
                debug!("scheduler stopped during fetch, discarding tick");
                return (state, TickReport::cancelled());
            }
            Some(_) if cancel.is_cancelled() => {
                debug!("scheduler stopped during fetch, discarding tick");
                return (state, TickReport::cancelled());
            }
            Some(Err(e)) => {
                warn!(error = %e, "failed to fetch reminders, skipping tick");
                return (
                    state,
                    TickReport {
                        fetch_error: Some(e.to_string()),
                        ..TickReport::default()
                    },
                );
            }
            Some(Ok(reminders)) => reminders,
        };

        let outcome = scanner::scan(now, &reminders, state, &self.scan);

        let mut report = TickReport::default();
        for skipped in &outcome.skipped {
            warn!(reminder_id = skipped.id, error = %skipped.error, "skipping malformed reminder");
            report.skipped.push(skipped.id);
        }

        for due in outcome.due {
            info!(
                reminder_id = due.reminder.id,
                occurrence = %due.at,
                "reminder due"
            );
            report.fired.push(due.reminder.id);
            self.dispatch(due.reminder.id, due.reminder.message);
        }

        debug!(
            %now,
            scanned = reminders.len(),
            fired = report.fired.len(),
            tracked = outcome.fire_state.len(),
            "tick complete"
        );
        (outcome.fire_state, report)
    }

    fn dispatch(&self, reminder_id: ReminderId, message: String) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&message).await {
                warn!(reminder_id, error = %e, "notification failed");
            }
        });
    }
}

impl TickReport {
    fn cancelled() -> Self {
        Self {
            cancelled: true,
            ..Self::default()
        }
    }
}

struct RunningLoop {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Owns the background loop and its lifecycle.
pub struct ReminderScheduler {
    runner: Arc<TickRunner>,
    clock: Arc<dyn Clock>,
    tick: Duration,
    status: watch::Sender<SchedulerStatus>,
    running: Mutex<Option<RunningLoop>>,
}

impl ReminderScheduler {
    pub fn new(
        store: Arc<dyn ReminderStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        settings: SchedulerSettings,
    ) -> Self {
        let (status, _) = watch::channel(SchedulerStatus::default());
        Self {
            runner: Arc::new(TickRunner::new(store, notifier, settings.scan)),
            clock,
            tick: settings.tick,
            status,
            running: Mutex::new(None),
        }
    }

    /// Spawn the loop. Returns `false` if it is already running.
    ///
    /// The first tick happens immediately.
    pub async fn start(&self) -> bool {
        let mut running = self.running.lock().await;
        if running.as_ref().is_some_and(|r| !r.task.is_finished()) {
            info!("scheduler already running");
            return false;
        }

        let cancel = CancellationToken::new();
        self.status.send_modify(|s| {
            s.running = true;
            s.last_error = None;
        });
        let task = tokio::spawn(run_loop(
            Arc::clone(&self.runner),
            Arc::clone(&self.clock),
            self.tick,
            cancel.clone(),
            self.status.clone(),
        ));
        *running = Some(RunningLoop { cancel, task });
        info!(tick_secs = self.tick.as_secs(), "scheduler started");
        true
    }

    /// Cancel the loop and wait for it to exit. Returns `false` if it was not running.
    pub async fn stop(&self) -> bool {
        let Some(running) = self.running.lock().await.take() else {
            return false;
        };

        running.cancel.cancel();
        if let Err(e) = running.task.await {
            warn!(error = %e, "scheduler task ended abnormally");
        }
        self.status.send_modify(|s| s.running = false);
        info!("scheduler stopped");
        true
    }

    pub async fn is_running(&self) -> bool {
        self.running
            .lock()
            .await
            .as_ref()
            .is_some_and(|r| !r.task.is_finished())
    }

    pub fn status(&self) -> watch::Receiver<SchedulerStatus> {
        self.status.subscribe()
    }
}

async fn run_loop(
    runner: Arc<TickRunner>,
    clock: Arc<dyn Clock>,
    tick: Duration,
    cancel: CancellationToken,
    status: watch::Sender<SchedulerStatus>,
) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut state = FireState::new();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let now = clock.now();
        let (next, report) = runner.tick(state, now, &cancel).await;
        state = next;
        if report.cancelled {
            break;
        }

        status.send_modify(|s| {
            s.ticks += 1;
            s.fired_total += report.fired.len() as u64;
            s.last_tick_at = Some(now);
            s.last_error = report.fetch_error.clone();
        });
    }

    status.send_modify(|s| s.running = false);
    debug!("scheduler loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use memento_test_utils::{InMemoryStore, RecordingNotifier};
    use tracing_test::traced_test;

    fn monday_at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[tokio::test]
    #[traced_test]
    async fn malformed_reminders_are_logged_and_skipped() {
        let store = Arc::new(InMemoryStore::new());
        let bad = store.insert_raw("legacy", "Funday", "09:00").await;
        let good = store.insert_raw("Stand-up", "Monday", "09:00").await;
        let runner = TickRunner::new(
            store,
            Arc::new(RecordingNotifier::new()),
            ScanConfig::default(),
        );

        let (_, report) = runner
            .tick(FireState::new(), monday_at(9, 0), &CancellationToken::new())
            .await;
        assert_eq!(report.fired, vec![good.id]);
        assert_eq!(report.skipped, vec![bad.id]);
        assert!(logs_contain("skipping malformed reminder"));
        assert!(logs_contain("reminder due"));
    }

    #[test]
    fn settings_follow_scheduler_config() {
        let config = SchedulerConfig {
            tick_secs: 10,
            lookahead_secs: 45,
            grace_secs: Some(5),
            ..SchedulerConfig::default()
        };
        let settings = SchedulerSettings::from_config(&config);
        assert_eq!(settings.tick, Duration::from_secs(10));
        assert_eq!(settings.scan.lookahead, chrono::TimeDelta::seconds(45));
        assert_eq!(settings.scan.grace, chrono::TimeDelta::seconds(5));
    }

    #[test]
    fn status_serializes_for_health_endpoint() {
        let status = SchedulerStatus {
            running: true,
            ticks: 3,
            fired_total: 1,
            last_tick_at: Some(monday_at(9, 0)),
            last_error: None,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["running"], true);
        assert_eq!(json["ticks"], 3);
        assert_eq!(json["last_tick_at"], "2026-01-05T09:00:00");
        assert!(json["last_error"].is_null());
    }
}
