// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Storage and notifier adapters extend the [`PluginAdapter`] base trait and
//! use `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod clock;
pub mod notifier;
pub mod storage;

pub use adapter::PluginAdapter;
pub use clock::{Clock, SystemClock};
pub use notifier::Notifier;
pub use storage::ReminderStore;
