// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Memento service.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::MementoError;

/// Maximum reminder message length, counted in characters.
pub const MAX_MESSAGE_CHARS: usize = 250;

/// Store-assigned reminder identifier.
pub type ReminderId = i64;

/// A persisted reminder record.
///
/// `day` and `time` are kept as the stored text so that a malformed row
/// can still be listed, deleted, and reported by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ReminderId,
    pub message: String,
    pub day: String,
    pub time: String,
    pub created_at: String,
}

impl Reminder {
    /// Parses the stored `day`/`time` pair into a weekly schedule.
    pub fn schedule(&self) -> Result<WeeklySchedule, MementoError> {
        WeeklySchedule::parse(&self.day, &self.time)
    }
}

/// Request body for creating a reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReminder {
    pub message: String,
    pub day: String,
    pub time: String,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Notifier,
}

/// Day of the week a reminder recurs on.
///
/// Parsing and display use the full English name and are case-sensitive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All seven weekdays, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn to_chrono(self) -> chrono::Weekday {
        match self {
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
            Weekday::Saturday => chrono::Weekday::Sat,
            Weekday::Sunday => chrono::Weekday::Sun,
        }
    }
}

/// Wall-clock time of day at minute resolution (24h).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Builds a time of day, rejecting out-of-range components.
    pub fn new(hour: u8, minute: u8) -> Result<Self, MementoError> {
        if hour > 23 {
            return Err(MementoError::validation(
                "time",
                format!("hour {hour} is out of range 0-23"),
            ));
        }
        if minute > 59 {
            return Err(MementoError::validation(
                "time",
                format!("minute {minute} is out of range 0-59"),
            ));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    pub fn to_naive(self) -> NaiveTime {
        // Components are range-checked in `new`.
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl FromStr for TimeOfDay {
    type Err = MementoError;

    /// Accepts `H:MM` or `HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed =
            || MementoError::validation("time", format!("`{s}` is not a HH:MM time"));

        let (hour, minute) = s.split_once(':').ok_or_else(malformed)?;
        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(hour) || hour.len() > 2 || !all_digits(minute) || minute.len() != 2 {
            return Err(malformed());
        }

        let hour: u8 = hour.parse().map_err(|_| malformed())?;
        let minute: u8 = minute.parse().map_err(|_| malformed())?;
        Self::new(hour, minute)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A parsed weekly anchor: one weekday at one time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeeklySchedule {
    pub day: Weekday,
    pub time: TimeOfDay,
}

impl WeeklySchedule {
    pub fn parse(day: &str, time: &str) -> Result<Self, MementoError> {
        let day = Weekday::from_str(day).map_err(|_| {
            MementoError::validation(
                "day",
                format!("`{day}` is not one of Monday, Tuesday, ..., Sunday"),
            )
        })?;
        let time = TimeOfDay::from_str(time)?;
        Ok(Self { day, time })
    }
}

impl fmt::Display for WeeklySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "every {} at {}", self.day, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_parsing_is_case_sensitive() {
        assert_eq!("Monday".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert!("monday".parse::<Weekday>().is_err());
        assert!("MONDAY".parse::<Weekday>().is_err());
        assert!("Mon".parse::<Weekday>().is_err());
    }

    #[test]
    fn weekday_chrono_mapping_covers_all_days() {
        for (i, day) in Weekday::ALL.into_iter().enumerate() {
            assert_eq!(day.to_chrono().num_days_from_monday() as usize, i);
        }
        assert_eq!(Weekday::Sunday.to_chrono(), chrono::Weekday::Sun);
    }

    #[test]
    fn time_of_day_accepts_html_time_input() {
        let t: TimeOfDay = "09:00".parse().unwrap();
        assert_eq!((t.hour(), t.minute()), (9, 0));
        let t: TimeOfDay = "7:05".parse().unwrap();
        assert_eq!(t.to_string(), "07:05");
        let t: TimeOfDay = "23:59".parse().unwrap();
        assert_eq!(t.to_naive(), NaiveTime::from_hms_opt(23, 59, 0).unwrap());
    }

    #[test]
    fn time_of_day_rejects_malformed_input() {
        for bad in ["", "9", "24:00", "12:60", "12:5", "12:005", "ab:cd", " 9:00", "09:00:00", "-1:00"] {
            let err = bad.parse::<TimeOfDay>().unwrap_err();
            assert!(err.is_validation(), "{bad:?} should be a validation error");
        }
    }

    #[test]
    fn schedule_reports_bad_day_field() {
        let err = WeeklySchedule::parse("Funday", "09:00").unwrap_err();
        assert!(matches!(err, MementoError::Validation { ref field, .. } if field == "day"));
    }

    #[test]
    fn reminder_serializes_with_wire_field_names() {
        let reminder = Reminder {
            id: 7,
            message: "stand-up".into(),
            day: "Monday".into(),
            time: "09:00".into(),
            created_at: "2026-01-05T08:00:00.000Z".into(),
        };
        let json = serde_json::to_value(&reminder).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["created_at"], "2026-01-05T08:00:00.000Z");
        assert_eq!(reminder.schedule().unwrap().to_string(), "every Monday at 09:00");
    }
}
