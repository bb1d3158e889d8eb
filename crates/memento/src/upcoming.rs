// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `memento upcoming`: print when each stored reminder fires next.

use std::fmt::Write;

use chrono::NaiveDateTime;
use memento_config::model::MementoConfig;
use memento_core::{Clock, MementoError, Reminder, ReminderStore, SystemClock};
use memento_scheduler::upcoming;
use memento_storage::SqliteStorage;

pub async fn run_upcoming(config: &MementoConfig) -> Result<(), MementoError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let reminders = storage.list_reminders().await;
    storage.close().await?;

    print!("{}", render(SystemClock.now(), &reminders?));
    Ok(())
}

/// One line per reminder, soonest first, followed by a count of unreadable rows.
fn render(now: NaiveDateTime, reminders: &[Reminder]) -> String {
    let scheduled = upcoming(now, reminders);
    let mut out = String::new();

    if scheduled.is_empty() {
        out.push_str("No reminders scheduled.\n");
    }
    for entry in &scheduled {
        let _ = writeln!(
            out,
            "{}  #{:<4} {}",
            entry.at.format("%a %Y-%m-%d %H:%M"),
            entry.reminder.id,
            entry.reminder.message
        );
    }

    let skipped = reminders.len() - scheduled.len();
    if skipped > 0 {
        let _ = writeln!(out, "({skipped} reminder(s) with an unreadable schedule skipped)");
    }
    out
}
