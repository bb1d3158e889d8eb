// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Due-reminder scheduling for Memento.
//!
//! - [`scanner`]: the pure scan that decides which reminders fire.
//! - [`scheduler`]: the timed loop that fetches, scans, and dispatches.
//! - [`notifier`]: desktop, terminal, and fallback delivery.
//! - [`shutdown`]: signal handling for `memento serve`.

pub mod notifier;
pub mod scanner;
pub mod scheduler;
pub mod shutdown;

pub use notifier::{build_notifier, DesktopNotifier, FallbackNotifier, TerminalAlert};
pub use scanner::{
    next_occurrence, scan, upcoming, FireState, ScanConfig, ScanOutcome, ScheduledReminder,
    SkippedReminder,
};
pub use scheduler::{ReminderScheduler, SchedulerSettings, SchedulerStatus, TickReport, TickRunner};
