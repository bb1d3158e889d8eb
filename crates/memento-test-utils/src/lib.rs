// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Memento integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic tests without a desktop session or a real clock.
//!
//! # Components
//!
//! - [`InMemoryStore`] - `ReminderStore` with failure and latency injection
//! - [`RecordingNotifier`] - `Notifier` that captures delivered messages
//! - [`ManualClock`] - `Clock` that only moves when told to
//! - [`TestHarness`] - temp SQLite store wired with the mocks above

pub mod clock;
pub mod harness;
pub mod mock_notifier;
pub mod mock_store;

pub use clock::ManualClock;
pub use harness::TestHarness;
pub use mock_notifier::RecordingNotifier;
pub use mock_store::InMemoryStore;
