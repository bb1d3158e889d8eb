// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Input validation for reminder creation.

use crate::error::MementoError;
use crate::types::{NewReminder, WeeklySchedule, MAX_MESSAGE_CHARS};

/// Validate a create request, returning its parsed schedule.
///
/// Checks run in field order (message, day, time) and stop at the first failure.
pub fn validate_new_reminder(new: &NewReminder) -> Result<WeeklySchedule, MementoError> {
    if new.message.trim().is_empty() {
        return Err(MementoError::validation("message", "Message is required"));
    }

    let chars = new.message.chars().count();
    if chars > MAX_MESSAGE_CHARS {
        return Err(MementoError::validation(
            "message",
            format!("message is {chars} characters, the limit is {MAX_MESSAGE_CHARS}"),
        ));
    }

    WeeklySchedule::parse(&new.day, &new.time)
}

/// Reject a create when `current` reminders already fill the `max` allowance.
pub fn ensure_capacity(current: usize, max: usize) -> Result<(), MementoError> {
    if current >= max {
        return Err(MementoError::LimitReached { max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Weekday;
    use proptest::prelude::*;

    fn request(message: &str, day: &str, time: &str) -> NewReminder {
        NewReminder {
            message: message.to_string(),
            day: day.to_string(),
            time: time.to_string(),
        }
    }

    #[test]
    fn valid_request_parses_schedule() {
        let schedule = validate_new_reminder(&request("Water plants", "Tuesday", "14:30")).unwrap();
        assert_eq!(schedule.day, Weekday::Tuesday);
        assert_eq!(schedule.time.to_string(), "14:30");
    }

    #[test]
    fn empty_and_blank_messages_are_rejected() {
        for message in ["", "   ", "\n\t"] {
            let err = validate_new_reminder(&request(message, "Monday", "09:00")).unwrap_err();
            assert!(matches!(err, MementoError::Validation { ref field, .. } if field == "message"));
        }
    }

    #[test]
    fn message_limit_counts_characters_not_bytes() {
        let at_limit = "é".repeat(MAX_MESSAGE_CHARS);
        assert!(validate_new_reminder(&request(&at_limit, "Monday", "09:00")).is_ok());

        let over = "a".repeat(MAX_MESSAGE_CHARS + 1);
        let err = validate_new_reminder(&request(&over, "Monday", "09:00")).unwrap_err();
        assert!(err.to_string().contains("251 characters"));
    }

    #[test]
    fn bad_day_and_time_are_rejected() {
        let err = validate_new_reminder(&request("x", "Someday", "09:00")).unwrap_err();
        assert!(matches!(err, MementoError::Validation { ref field, .. } if field == "day"));

        let err = validate_new_reminder(&request("x", "Monday", "9am")).unwrap_err();
        assert!(matches!(err, MementoError::Validation { ref field, .. } if field == "time"));
    }

    #[test]
    fn capacity_is_exclusive_of_max() {
        assert!(ensure_capacity(0, 10).is_ok());
        assert!(ensure_capacity(9, 10).is_ok());
        assert!(matches!(
            ensure_capacity(10, 10),
            Err(MementoError::LimitReached { max: 10 })
        ));
        assert!(ensure_capacity(11, 10).is_err());
    }

    proptest! {
        #[test]
        fn every_in_range_time_round_trips(hour in 0u8..24, minute in 0u8..60) {
            let text = format!("{hour:02}:{minute:02}");
            let schedule = validate_new_reminder(&request("m", "Friday", &text)).unwrap();
            prop_assert_eq!(schedule.time.to_string(), text);
        }
    }
}
