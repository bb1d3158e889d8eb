// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Memento reminder service.
//!
//! This crate provides the domain types, input validation, error type, and
//! adapter traits shared by the storage, scheduler, and gateway crates.

pub mod error;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export key items at crate root for ergonomic imports.
pub use error::MementoError;
pub use types::{
    AdapterType, HealthStatus, NewReminder, Reminder, ReminderId, TimeOfDay, Weekday,
    WeeklySchedule, MAX_MESSAGE_CHARS,
};

pub use traits::{Clock, Notifier, PluginAdapter, ReminderStore, SystemClock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memento_error_has_all_variants() {
        let _config = MementoError::Config("test".into());
        let _storage = MementoError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _validation = MementoError::validation("message", "test");
        let _limit = MementoError::LimitReached { max: 10 };
        let _notification = MementoError::Notification {
            message: "test".into(),
            source: None,
        };
        let _timeout = MementoError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = MementoError::Internal("test".into());
    }

    #[test]
    fn adapter_type_display_round_trips() {
        use std::str::FromStr;

        for variant in [AdapterType::Storage, AdapterType::Notifier] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn system_clock_is_close_to_local_now() {
        let before = chrono::Local::now().naive_local();
        let now = SystemClock.now();
        assert!(now >= before);
    }

    #[test]
    fn all_traits_are_object_safe() {
        fn _assert_store(_: &dyn ReminderStore) {}
        fn _assert_notifier(_: &dyn Notifier) {}
        fn _assert_clock(_: &dyn Clock) {}
    }
}
