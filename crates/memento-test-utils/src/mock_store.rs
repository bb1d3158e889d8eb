// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory reminder store for deterministic testing.
//!
//! `InMemoryStore` validates creates the same way the SQLite store does and
//! can be told to fail or stall `list_reminders` to exercise error paths.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use memento_core::types::{AdapterType, HealthStatus, NewReminder, Reminder, ReminderId};
use memento_core::validation::validate_new_reminder;
use memento_core::{MementoError, PluginAdapter, ReminderStore};

#[derive(Default)]
struct Rows {
    next_id: ReminderId,
    reminders: Vec<Reminder>,
}

/// A `ReminderStore` backed by a `Vec`.
#[derive(Default)]
pub struct InMemoryStore {
    rows: Mutex<Rows>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    list_delay: Mutex<Option<Duration>>,
    list_calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row without validation, as an external writer might.
    pub async fn insert_raw(&self, message: &str, day: &str, time: &str) -> Reminder {
        let mut rows = self.rows.lock().await;
        rows.next_id += 1;
        let reminder = Reminder {
            id: rows.next_id,
            message: message.to_string(),
            day: day.to_string(),
            time: time.to_string(),
            created_at: chrono::Utc::now()
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string(),
        };
        rows.reminders.push(reminder.clone());
        reminder
    }

    /// Make every read (`list_reminders`, `count_reminders`) fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write fail with a storage error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delay `list_reminders` to simulate a slow backend.
    pub async fn set_list_delay(&self, delay: Option<Duration>) {
        *self.list_delay.lock().await = delay;
    }

    /// Number of `list_reminders` calls so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check(flag: &AtomicBool, op: &str) -> Result<(), MementoError> {
        if flag.load(Ordering::SeqCst) {
            return Err(MementoError::Storage {
                source: format!("injected {op} failure").into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for InMemoryStore {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MementoError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Unhealthy("injected read failure".into()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MementoError> {
        Ok(())
    }
}

#[async_trait]
impl ReminderStore for InMemoryStore {
    async fn initialize(&self) -> Result<(), MementoError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), MementoError> {
        Ok(())
    }

    async fn list_reminders(&self) -> Result<Vec<Reminder>, MementoError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.list_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Self::check(&self.fail_reads, "read")?;

        let rows = self.rows.lock().await;
        Ok(rows.reminders.iter().rev().cloned().collect())
    }

    async fn create_reminder(&self, new: &NewReminder) -> Result<Reminder, MementoError> {
        validate_new_reminder(new)?;
        Self::check(&self.fail_writes, "write")?;
        Ok(self.insert_raw(&new.message, &new.day, &new.time).await)
    }

    async fn delete_reminder(&self, id: ReminderId) -> Result<bool, MementoError> {
        Self::check(&self.fail_writes, "write")?;
        let mut rows = self.rows.lock().await;
        let before = rows.reminders.len();
        rows.reminders.retain(|r| r.id != id);
        Ok(rows.reminders.len() != before)
    }

    async fn delete_all_reminders(&self) -> Result<u64, MementoError> {
        Self::check(&self.fail_writes, "write")?;
        let mut rows = self.rows.lock().await;
        let removed = rows.reminders.len() as u64;
        rows.reminders.clear();
        Ok(removed)
    }

    async fn count_reminders(&self) -> Result<u64, MementoError> {
        Self::check(&self.fail_reads, "read")?;
        Ok(self.rows.lock().await.reminders.len() as u64)
    }
}
