// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Due-reminder scan.
//!
//! [`scan`] is a pure function of `(now, reminders, fire_state, config)`. A
//! reminder is due when its next weekly occurrence falls inside the window
//! `[now - grace, now + lookahead)`. [`FireState`] remembers the occurrence
//! each reminder last fired for, so a tick that observes the same occurrence
//! again stays silent.
//!
//! Successive windows cover every instant as long as `lookahead + grace` is at
//! least the time between scans, so the default grace is one 30 s tick.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{Datelike, NaiveDateTime, TimeDelta};
use memento_core::types::{Reminder, ReminderId, WeeklySchedule};
use memento_core::MementoError;

const DAYS_PER_WEEK: i64 = 7;

/// Per-reminder record of the occurrence that was last notified.
///
/// Owned by the scheduler loop and threaded through successive scans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FireState {
    fired: HashMap<ReminderId, NaiveDateTime>,
}

impl FireState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The occurrence `id` last fired for, if still tracked.
    pub fn last_fired(&self, id: ReminderId) -> Option<NaiveDateTime> {
        self.fired.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }

    /// Drop entries for reminders that were not scanned, and for occurrences
    /// that no later scan can observe again.
    fn prune(&mut self, reminders: &[Reminder], earliest_observable: NaiveDateTime) {
        self.fired.retain(|id, occurrence| {
            *occurrence >= earliest_observable && reminders.iter().any(|r| r.id == *id)
        });
    }
}

/// Width of the due window around `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// How far ahead of `now` an occurrence counts as due (exclusive).
    pub lookahead: TimeDelta,
    /// How far behind `now` an unfired occurrence still counts as due (inclusive).
    pub grace: TimeDelta,
}

impl ScanConfig {
    /// Both windows are clamped to one week.
    pub fn new(lookahead: Duration, grace: Duration) -> Self {
        Self {
            lookahead: clamp_to_week(lookahead),
            grace: clamp_to_week(grace),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            lookahead: TimeDelta::seconds(30),
            grace: TimeDelta::seconds(30),
        }
    }
}

fn clamp_to_week(duration: Duration) -> TimeDelta {
    let week = TimeDelta::days(DAYS_PER_WEEK);
    TimeDelta::from_std(duration).map_or(week, |d| d.min(week))
}

/// A reminder paired with one concrete occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledReminder {
    pub reminder: Reminder,
    pub at: NaiveDateTime,
}

/// A stored reminder the scan could not interpret.
#[derive(Debug)]
pub struct SkippedReminder {
    pub id: ReminderId,
    pub error: MementoError,
}

/// Result of one scan.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Newly due reminders, in input order.
    pub due: Vec<ScheduledReminder>,
    /// State to hand to the next scan.
    pub fire_state: FireState,
    /// Records with an unparseable day or time.
    pub skipped: Vec<SkippedReminder>,
}

/// Earliest occurrence of `schedule` at or after `not_before`.
///
/// Starts from the matching weekday of the week containing `not_before` and
/// moves one week forward if that instant has already passed.
pub fn next_occurrence(schedule: WeeklySchedule, not_before: NaiveDateTime) -> NaiveDateTime {
    let today = not_before.date();
    let target = i64::from(schedule.day.to_chrono().num_days_from_monday());
    let current = i64::from(today.weekday().num_days_from_monday());
    let days_ahead = (target - current).rem_euclid(DAYS_PER_WEEK);

    let candidate = (today + TimeDelta::days(days_ahead)).and_time(schedule.time.to_naive());
    if candidate < not_before {
        candidate + TimeDelta::days(DAYS_PER_WEEK)
    } else {
        candidate
    }
}

/// Determine which reminders are due at `now` and have not yet fired for
/// their current occurrence.
pub fn scan(
    now: NaiveDateTime,
    reminders: &[Reminder],
    mut fire_state: FireState,
    config: &ScanConfig,
) -> ScanOutcome {
    let window_start = now - config.grace;
    let window_end = now + config.lookahead;

    let mut due = Vec::new();
    let mut skipped = Vec::new();

    for reminder in reminders {
        let schedule = match reminder.schedule() {
            Ok(schedule) => schedule,
            Err(error) => {
                skipped.push(SkippedReminder {
                    id: reminder.id,
                    error,
                });
                continue;
            }
        };

        // `next_occurrence` already guarantees `occurrence >= window_start`.
        let occurrence = next_occurrence(schedule, window_start);
        if occurrence >= window_end {
            continue;
        }
        if fire_state.last_fired(reminder.id) == Some(occurrence) {
            continue;
        }

        fire_state.fired.insert(reminder.id, occurrence);
        due.push(ScheduledReminder {
            reminder: reminder.clone(),
            at: occurrence,
        });
    }

    fire_state.prune(reminders, window_start);

    ScanOutcome {
        due,
        fire_state,
        skipped,
    }
}

/// Next occurrence of every well-formed reminder, soonest first.
///
/// Malformed records are left out.
pub fn upcoming(now: NaiveDateTime, reminders: &[Reminder]) -> Vec<ScheduledReminder> {
    let mut scheduled: Vec<_> = reminders
        .iter()
        .filter_map(|reminder| {
            let schedule = reminder.schedule().ok()?;
            Some(ScheduledReminder {
                reminder: reminder.clone(),
                at: next_occurrence(schedule, now),
            })
        })
        .collect();
    scheduled.sort_by_key(|s| s.at);
    scheduled
}
