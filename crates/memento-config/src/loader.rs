// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./memento.toml` > `~/.config/memento/memento.toml` > `/etc/memento/memento.toml`
//! with environment variable overrides via `MEMENTO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MementoConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/memento/memento.toml` (system-wide)
/// 3. `~/.config/memento/memento.toml` (user XDG config)
/// 4. `./memento.toml` (local directory)
/// 5. `MEMENTO_*` environment variables
pub fn load_config() -> Result<MementoConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<MementoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MementoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MementoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MementoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MementoConfig::default()))
        .merge(Toml::file("/etc/memento/memento.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("memento/memento.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("memento.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `MEMENTO_SCHEDULER_TICK_SECS` must map to `scheduler.tick_secs`,
/// not `scheduler.tick.secs`.
fn env_provider() -> Env {
    Env::prefixed("MEMENTO_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to its dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 5] = ["app", "storage", "scheduler", "gateway", "notifier"];

    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
