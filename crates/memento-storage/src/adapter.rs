// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the ReminderStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use memento_config::model::StorageConfig;
use memento_core::types::{NewReminder, Reminder, ReminderId};
use memento_core::validation::validate_new_reminder;
use memento_core::{AdapterType, HealthStatus, MementoError, PluginAdapter, ReminderStore};

use crate::database::Database;
use crate::queries;

/// SQLite-backed reminder store.
///
/// Wraps a [`Database`] handle and delegates to [`queries::reminders`]. The
/// database is opened on the first call to [`ReminderStore::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// The database connection is not opened until `initialize` is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// The opened database, for callers that need raw query access.
    pub fn database(&self) -> Result<&Database, MementoError> {
        self.db()
    }

    fn db(&self) -> Result<&Database, MementoError> {
        self.db.get().ok_or_else(|| MementoError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(db: &Database) -> Result<(), MementoError> {
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MementoError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MementoError> {
        if let Some(db) = self.db.get() {
            Self::checkpoint(db).await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl ReminderStore for SqliteStorage {
    async fn initialize(&self) -> Result<(), MementoError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| MementoError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), MementoError> {
        Self::checkpoint(self.db()?).await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn list_reminders(&self) -> Result<Vec<Reminder>, MementoError> {
        queries::reminders::list_reminders(self.db()?).await
    }

    async fn create_reminder(&self, new: &NewReminder) -> Result<Reminder, MementoError> {
        validate_new_reminder(new)?;
        let reminder = queries::reminders::insert_reminder(self.db()?, new).await?;
        debug!(id = reminder.id, day = %reminder.day, time = %reminder.time, "reminder created");
        Ok(reminder)
    }

    async fn delete_reminder(&self, id: ReminderId) -> Result<bool, MementoError> {
        queries::reminders::delete_reminder(self.db()?, id).await
    }

    async fn delete_all_reminders(&self) -> Result<u64, MementoError> {
        queries::reminders::delete_all_reminders(self.db()?).await
    }

    async fn count_reminders(&self) -> Result<u64, MementoError> {
        queries::reminders::count_reminders(self.db()?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    fn request(message: &str, day: &str, time: &str) -> NewReminder {
        NewReminder {
            message: message.to_string(),
            day: day.to_string(),
            time: time.to_string(),
        }
    }

    #[tokio::test]
    async fn sqlite_storage_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert!(storage.health_check().await.is_err());
        assert!(storage.list_reminders().await.is_err());
        assert!(storage.shutdown().await.is_ok(), "shutdown is a no-op when never opened");
    }

    #[tokio::test]
    async fn health_check_returns_healthy_when_initialized() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn create_validates_before_writing() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("validate.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        for bad in [
            request("  ", "Monday", "09:00"),
            request("x", "monday", "09:00"),
            request("x", "Monday", "9am"),
            request(&"a".repeat(251), "Monday", "09:00"),
        ] {
            let err = storage.create_reminder(&bad).await.unwrap_err();
            assert!(err.is_validation(), "{bad:?} gave {err}");
        }
        assert_eq!(storage.count_reminders().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn full_reminder_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        let water = storage
            .create_reminder(&request("Water plants", "Tuesday", "14:30"))
            .await
            .unwrap();
        let bins = storage
            .create_reminder(&request("Bins out", "Sunday", "20:00"))
            .await
            .unwrap();
        assert_eq!(storage.count_reminders().await.unwrap(), 2);

        let listed = storage.list_reminders().await.unwrap();
        assert_eq!(listed[0].id, bins.id);
        assert_eq!(listed[1].id, water.id);

        assert!(storage.delete_reminder(water.id).await.unwrap());
        assert!(!storage.delete_reminder(water.id).await.unwrap());
        assert_eq!(storage.delete_all_reminders().await.unwrap(), 1);
        assert_eq!(storage.count_reminders().await.unwrap(), 0);

        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn message_of_exactly_250_chars_is_accepted() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("limit.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        let message = "é".repeat(250);
        let stored = storage
            .create_reminder(&request(&message, "Friday", "8:05"))
            .await
            .unwrap();
        assert_eq!(stored.message.chars().count(), 250);
        storage.shutdown().await.unwrap();
    }
}
