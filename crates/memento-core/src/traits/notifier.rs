// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier trait for delivering fired reminders to the user.

use async_trait::async_trait;

use crate::error::MementoError;
use crate::traits::adapter::PluginAdapter;

/// Adapter that surfaces a reminder message to the user.
///
/// Delivery is best-effort: callers log failures and move on.
#[async_trait]
pub trait Notifier: PluginAdapter {
    /// Delivers `message` to the user.
    async fn notify(&self, message: &str) -> Result<(), MementoError>;
}
