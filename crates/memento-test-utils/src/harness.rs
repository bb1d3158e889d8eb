// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` opens a real SQLite store in a temp directory and pairs it
//! with a [`RecordingNotifier`] and a [`ManualClock`], so scheduler and
//! gateway tests run against the production storage path.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use memento_config::model::{MementoConfig, StorageConfig};
use memento_core::types::{NewReminder, Reminder};
use memento_core::{MementoError, ReminderStore};
use memento_storage::queries;
use memento_storage::SqliteStorage;

use crate::clock::ManualClock;
use crate::mock_notifier::RecordingNotifier;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    now: NaiveDateTime,
    max_reminders: Option<usize>,
    failing_notifier: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            now: default_now(),
            max_reminders: None,
            failing_notifier: false,
        }
    }

    /// Start the manual clock at `now`.
    pub fn at(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    pub fn with_max_reminders(mut self, max: usize) -> Self {
        self.max_reminders = Some(max);
        self
    }

    /// Use a notifier that records and then fails every delivery.
    pub fn with_failing_notifier(mut self) -> Self {
        self.failing_notifier = true;
        self
    }

    pub async fn build(self) -> Result<TestHarness, MementoError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| MementoError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let storage_config = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        };
        let storage = Arc::new(SqliteStorage::new(storage_config.clone()));
        storage.initialize().await?;

        let mut config = MementoConfig {
            storage: storage_config,
            ..MementoConfig::default()
        };
        if let Some(max) = self.max_reminders {
            config.app.max_reminders = max;
        }

        let notifier = Arc::new(if self.failing_notifier {
            RecordingNotifier::failing()
        } else {
            RecordingNotifier::new()
        });

        Ok(TestHarness {
            storage,
            notifier,
            clock: Arc::new(ManualClock::new(self.now)),
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// 2026-01-05 08:59:45, a Monday just before nine.
fn default_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 5)
        .and_then(|d| d.and_hms_opt(8, 59, 45))
        .unwrap_or_default()
}

/// A ready-to-use temp store with mock notifier and clock.
pub struct TestHarness {
    pub storage: Arc<SqliteStorage>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<ManualClock>,
    pub config: MementoConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub async fn new() -> Result<Self, MementoError> {
        Self::builder().build().await
    }

    /// The store as the trait object the scheduler and gateway consume.
    pub fn store(&self) -> Arc<dyn ReminderStore> {
        self.storage.clone()
    }

    /// Create a validated reminder.
    pub async fn seed(&self, message: &str, day: &str, time: &str) -> Result<Reminder, MementoError> {
        self.storage
            .create_reminder(&NewReminder {
                message: message.to_string(),
                day: day.to_string(),
                time: time.to_string(),
            })
            .await
    }

    /// Write a row straight to the table, bypassing validation.
    pub async fn seed_unchecked(
        &self,
        message: &str,
        day: &str,
        time: &str,
    ) -> Result<Reminder, MementoError> {
        let new = NewReminder {
            message: message.to_string(),
            day: day.to_string(),
            time: time.to_string(),
        };
        queries::reminders::insert_reminder(self.storage.database()?, &new).await
    }
}
