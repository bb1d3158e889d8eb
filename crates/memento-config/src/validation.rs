// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid host names, non-empty paths, and scheduler cadence bounds.

use crate::diagnostic::ConfigError;
use crate::model::MementoConfig;

const MAX_TICK_SECS: u64 = 3600;
const WEEK_SECS: u64 = 7 * 24 * 60 * 60;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MementoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    if config.app.max_reminders == 0 {
        invalid("app.max_reminders must be at least 1".to_string());
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        invalid("gateway.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            invalid(format!(
                "gateway.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.gateway.port == 0 {
        invalid("gateway.port must not be 0".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        invalid("storage.database_path must not be empty".to_string());
    }

    let scheduler = &config.scheduler;
    if scheduler.tick_secs == 0 || scheduler.tick_secs > MAX_TICK_SECS {
        invalid(format!(
            "scheduler.tick_secs must be between 1 and {MAX_TICK_SECS}, got {}",
            scheduler.tick_secs
        ));
    }

    if scheduler.lookahead_secs == 0 || scheduler.lookahead_secs > WEEK_SECS {
        invalid(format!(
            "scheduler.lookahead_secs must be between 1 and {WEEK_SECS}, got {}",
            scheduler.lookahead_secs
        ));
    }

    let grace_secs = scheduler.effective_grace_secs();
    if grace_secs >= WEEK_SECS {
        invalid(format!(
            "scheduler.grace_secs must be shorter than one week ({WEEK_SECS}), got {grace_secs}"
        ));
    }

    // Consecutive scan windows must overlap or an occurrence can fall between them.
    let covered = scheduler.lookahead_secs.saturating_add(grace_secs);
    if scheduler.tick_secs > 0 && covered < scheduler.tick_secs {
        invalid(format!(
            "scheduler.lookahead_secs + scheduler.grace_secs ({covered}) must be at least \
             scheduler.tick_secs ({}), or reminders between scans are missed",
            scheduler.tick_secs
        ));
    }

    if !config.notifier.desktop && !config.notifier.alert {
        invalid("at least one of notifier.desktop or notifier.alert must be enabled".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
