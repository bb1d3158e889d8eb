// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Memento reminder service.

use thiserror::Error;

/// The primary error type used across all Memento adapter traits and core operations.
#[derive(Debug, Error)]
pub enum MementoError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migration failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A reminder field failed validation (empty message, unknown weekday, malformed time).
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// The configured maximum number of reminders already exists.
    #[error("Maximum limit of {max} reminders reached")]
    LimitReached { max: usize },

    /// Notification delivery failed (command missing, permission denied, unsupported platform).
    #[error("notification error: {message}")]
    Notification {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MementoError {
    /// Shorthand for building a [`MementoError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns `true` for errors caused by caller input rather than the backend.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
