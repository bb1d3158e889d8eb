// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier that records every delivered message.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use memento_core::types::{AdapterType, HealthStatus};
use memento_core::{MementoError, Notifier, PluginAdapter};

/// Captures notification messages for assertion.
///
/// With `failing` set, every call is still recorded and then returns an error.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
    delivered: Notify,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.failing.store(true, Ordering::SeqCst);
        notifier
    }

    /// All messages passed to `notify()`, in call order.
    pub async fn messages(&self) -> Vec<String> {
        self.sent.lock().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Wait until at least `n` messages have arrived. Returns `false` on timeout.
    ///
    /// Notifications are spawned by the scheduler, so tests need this to
    /// observe them deterministically.
    pub async fn wait_for(&self, n: usize, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, async {
            loop {
                let delivered = self.delivered.notified();
                if self.count().await >= n {
                    return;
                }
                delivered.await;
            }
        })
        .await
        .is_ok()
    }
}

#[async_trait]
impl PluginAdapter for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notifier
    }

    async fn health_check(&self) -> Result<HealthStatus, MementoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MementoError> {
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> Result<(), MementoError> {
        self.sent.lock().await.push(message.to_string());
        self.delivered.notify_waiters();
        if self.failing.load(Ordering::SeqCst) {
            return Err(MementoError::Notification {
                message: "injected notifier failure".into(),
                source: None,
            });
        }
        Ok(())
    }
}
