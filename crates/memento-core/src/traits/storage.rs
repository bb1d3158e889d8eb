// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reminder store trait: the create/read/delete surface over reminder records.

use async_trait::async_trait;

use crate::error::MementoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{NewReminder, Reminder, ReminderId};

/// Adapter for durable reminder storage.
///
/// The scheduler only ever calls [`list_reminders`](ReminderStore::list_reminders);
/// the remaining operations back the HTTP surface and the CLI.
#[async_trait]
pub trait ReminderStore: PluginAdapter {
    /// Initializes the storage backend (migrations, connection setup).
    async fn initialize(&self) -> Result<(), MementoError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), MementoError>;

    /// Lists every reminder, newest first.
    async fn list_reminders(&self) -> Result<Vec<Reminder>, MementoError>;

    /// Validates and persists a new reminder.
    ///
    /// Returns [`MementoError::Validation`] without touching the store when the
    /// message, day, or time is invalid. Capacity limits are the caller's job.
    async fn create_reminder(&self, new: &NewReminder) -> Result<Reminder, MementoError>;

    /// Deletes one reminder. Returns `false` if it did not exist.
    async fn delete_reminder(&self, id: ReminderId) -> Result<bool, MementoError>;

    /// Deletes every reminder and returns how many were removed.
    async fn delete_all_reminders(&self) -> Result<u64, MementoError>;

    /// Number of stored reminders.
    async fn count_reminders(&self) -> Result<u64, MementoError>;
}
