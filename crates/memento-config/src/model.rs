// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Memento reminder service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Memento configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MementoConfig {
    /// Application identity and limits.
    #[serde(default)]
    pub app: AppConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Due-reminder scheduler settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Notification delivery settings.
    #[serde(default)]
    pub notifier: NotifierConfig,
}

/// Application identity and limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name used in logs.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Maximum number of stored reminders; creates beyond this are rejected.
    #[serde(default = "default_max_reminders")]
    pub max_reminders: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
            max_reminders: default_max_reminders(),
        }
    }
}

fn default_app_name() -> String {
    "memento".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_reminders() -> usize {
    10
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("memento").join("memento.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("memento.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Due-reminder scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Run the scheduler loop under `memento serve`.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds between scans.
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,

    /// How far ahead of now an occurrence counts as due.
    #[serde(default = "default_lookahead_secs")]
    pub lookahead_secs: u64,

    /// How far behind now an unfired occurrence still counts as due.
    ///
    /// Unset means one tick, so a tick that wakes late still sees the
    /// occurrence the previous window stopped short of.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_secs: Option<u64>,
}

impl SchedulerConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_secs(self.tick_secs)
    }

    pub fn lookahead(&self) -> Duration {
        Duration::from_secs(self.lookahead_secs)
    }

    /// Configured grace, falling back to the tick length.
    pub fn effective_grace_secs(&self) -> u64 {
        self.grace_secs.unwrap_or(self.tick_secs)
    }

    pub fn grace(&self) -> Duration {
        Duration::from_secs(self.effective_grace_secs())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_secs: default_tick_secs(),
            lookahead_secs: default_lookahead_secs(),
            grace_secs: None,
        }
    }
}

fn default_tick_secs() -> u64 {
    30
}

fn default_lookahead_secs() -> u64 {
    30
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Serve the HTTP API under `memento serve`.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Notification delivery configuration.
///
/// With both channels enabled the desktop notification is tried first and
/// the terminal alert is the fallback.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotifierConfig {
    /// Try a system notification (notify-send / osascript).
    #[serde(default = "default_true")]
    pub desktop: bool,

    /// Write a visible alert to the terminal.
    #[serde(default = "default_true")]
    pub alert: bool,

    /// Title shown on desktop notifications.
    #[serde(default = "default_notifier_app_name")]
    pub app_name: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            desktop: true,
            alert: true,
            app_name: default_notifier_app_name(),
        }
    }
}

fn default_notifier_app_name() -> String {
    "Memento".to_string()
}

fn default_true() -> bool {
    true
}
