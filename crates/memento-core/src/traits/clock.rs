// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wall-clock source for the scheduler.

use chrono::NaiveDateTime;

/// Source of the current local time.
///
/// Reminders are wall-clock anchored, so the clock hands out naive local
/// datetimes and no timezone conversion happens anywhere downstream.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;
}

/// The host clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
