// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with "did you mean?" suggestions.
//!
//! Unknown keys are matched against the section's valid keys with
//! Jaro-Winkler similarity, and located in the TOML source for a labelled span.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a suggestion (catches `tick_sec` -> `tick_secs`).
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A problem with `memento.toml` or the `MEMENTO_*` environment.
///
/// Variants that can be traced back to a file carry the source text and a span
/// so miette can point at the offending line.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key no section of `MementoConfig` accepts.
    #[error("unknown key `{key}` in {section}")]
    #[diagnostic(
        code(memento::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The unrecognized key name.
        key: String,
        /// `[scheduler]`-style table name, or "the top level".
        section: String,
        /// Closest valid key, when one is similar enough.
        suggestion: Option<String>,
        /// Comma-separated keys the section accepts.
        valid_keys: String,
        #[label("not a memento setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that does not deserialize into the field's type.
    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(memento::config::invalid_type), help("use {expected}"))]
    InvalidType {
        /// Dotted path, e.g. `gateway.port`.
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(memento::config::missing_key),
        help("add `{key} = <value>` to memento.toml")
    )]
    MissingKey { key: String },

    /// A value that parsed but makes no sense, e.g. a zero tick.
    #[error("validation error: {message}")]
    #[diagnostic(code(memento::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(memento::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

fn section_name(path: &[String]) -> String {
    match path.first() {
        Some(section) => format!("[{section}]"),
        None => "the top level".to_string(),
    }
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let (span, src) = locate(&error, &error.path, field, toml_sources);
                ConfigError::UnknownKey {
                    key: field.clone(),
                    section: section_name(&error.path),
                    suggestion: suggest_key(field, expected),
                    valid_keys: expected.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.clone().into_owned(),
            },
            Kind::InvalidType(actual, expected) => {
                // For type errors the path ends with the field itself.
                let (span, src) = match error.path.split_last() {
                    Some((field, section)) => locate(&error, section, field, toml_sources),
                    None => (None, None),
                };
                ConfigError::InvalidType {
                    key: error.path.join("."),
                    detail: format!("found {actual}, expected {expected}"),
                    expected: expected.to_string(),
                    span,
                    src,
                }
            }
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

/// Resolve the file an error came from and the byte span of `field` under `section`.
fn locate(
    error: &figment::error::Error,
    section: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let Some(metadata) = error.metadata.as_ref() else {
        return (None, None);
    };
    let source = match &metadata.source {
        Some(figment::Source::File(path)) => {
            let path = path.display().to_string();
            toml_sources.iter().find(|(p, _)| *p == path)
        }
        // Inline strings carry no path; a lone source is unambiguous.
        None if metadata.name.ends_with("source string") && toml_sources.len() == 1 => {
            toml_sources.first()
        }
        _ => None,
    };
    let Some((path, content)) = source else {
        return (None, None);
    };

    match find_key_offset(content, section, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(path, content.clone())),
        ),
        None => (None, None),
    }
}

/// Find the byte offset of `field` as a key inside the section named by `path[0]`.
///
/// Top-level keys (empty path) are searched from the start of the document.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let start = match path.first() {
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut offset = start;
    for line in content[start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(after) = trimmed.strip_prefix(field)
            && after.trim_start().starts_with('=')
        {
            return Some(offset + (line.len() - trimmed.len()));
        }
        offset += line.len();
    }

    None
}

/// Suggest the closest valid key, if any scores above the threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render every diagnostic into one report, in order.
pub fn render_report(errors: &[ConfigError]) -> String {
    let handler = miette::GraphicalReportHandler::new();
    let mut out = String::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error as &dyn Diagnostic) {
            Ok(()) => out.push_str(&buf),
            Err(_) => out.push_str(&format!("Error: {error}\n")),
        }
    }
    out
}

/// Print [`render_report`] to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    eprint!("{}", render_report(errors));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_tick_secs_for_typo() {
        let valid = &["enabled", "tick_secs", "lookahead_secs", "grace_secs"];
        assert_eq!(suggest_key("tick_sec", valid), Some("tick_secs".to_string()));
    }

    #[test]
    fn suggest_max_reminders_for_transposition() {
        let valid = &["name", "log_level", "max_reminders"];
        assert_eq!(
            suggest_key("max_remidners", valid),
            Some("max_reminders".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["name", "log_level", "max_reminders"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn find_key_offset_in_section() {
        let content = "[app]\nname = \"x\"\n\n[scheduler]\ntick_sec = 30\n";
        let path = vec!["scheduler".to_string()];
        let o = find_key_offset(content, &path, "tick_sec").unwrap();
        assert_eq!(&content[o..o + 8], "tick_sec");
    }

    #[test]
    fn find_key_offset_skips_longer_keys_with_same_prefix() {
        let content = "[scheduler]\ntick_secs = 30\ntick = 5\n";
        let path = vec!["scheduler".to_string()];
        let o = find_key_offset(content, &path, "tick").unwrap();
        assert_eq!(&content[o..], "tick = 5\n");
    }

    #[test]
    fn section_name_covers_top_level() {
        assert_eq!(section_name(&["gateway".to_string()]), "[gateway]");
        assert_eq!(section_name(&[]), "the top level");
    }

    #[test]
    fn render_report_includes_every_error() {
        let errors = [
            ConfigError::Validation {
                message: "gateway.port must not be 0".to_string(),
            },
            ConfigError::MissingKey {
                key: "name".to_string(),
            },
        ];
        let report = render_report(&errors);
        assert!(report.contains("gateway.port must not be 0"));
        assert!(report.contains("missing required key `name`"));
    }

    #[test]
    fn unknown_key_help_lists_valid_keys() {
        let help = unknown_key_help(Some("port"), "enabled, host, port");
        assert!(help.contains("did you mean `port`?"));
        assert!(unknown_key_help(None, "a, b").starts_with("valid keys"));
    }
}
