// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification delivery.
//!
//! [`DesktopNotifier`] shells out to the platform notification tool,
//! [`TerminalAlert`] writes a bell-prefixed line to stderr, and
//! [`FallbackNotifier`] chains the two.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use memento_config::model::NotifierConfig;
use memento_core::{AdapterType, HealthStatus, MementoError, Notifier, PluginAdapter};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    NotifySend,
    Osascript,
    Unsupported,
}

impl Backend {
    fn for_host() -> Self {
        if cfg!(target_os = "macos") {
            Backend::Osascript
        } else if cfg!(any(
            target_os = "linux",
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly"
        )) {
            Backend::NotifySend
        } else {
            Backend::Unsupported
        }
    }
}

/// How long the notification tool may run before it is killed.
const DESKTOP_TIMEOUT: Duration = Duration::from_secs(10);

/// System notification through `notify-send` or `osascript`.
pub struct DesktopNotifier {
    app_name: String,
    backend: Backend,
    program: String,
    timeout: Duration,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        let backend = Backend::for_host();
        let program = match backend {
            Backend::Osascript => "osascript",
            _ => "notify-send",
        };
        Self {
            app_name: app_name.into(),
            backend,
            program: program.to_string(),
            timeout: DESKTOP_TIMEOUT,
        }
    }

    /// Use a different executable with the same arguments as the host backend.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, message: &str) -> Result<tokio::process::Command, MementoError> {
        let mut command = tokio::process::Command::new(&self.program);
        command.kill_on_drop(true);
        match self.backend {
            Backend::NotifySend => {
                command
                    .arg(format!("--app-name={}", self.app_name))
                    .arg(&self.app_name)
                    .arg(message);
            }
            Backend::Osascript => {
                let script = format!(
                    "display notification \"{}\" with title \"{}\"",
                    applescript_escape(message),
                    applescript_escape(&self.app_name)
                );
                command.arg("-e").arg(script);
            }
            Backend::Unsupported => {
                return Err(MementoError::Notification {
                    message: format!(
                        "desktop notifications are not supported on {}",
                        std::env::consts::OS
                    ),
                    source: None,
                });
            }
        }
        Ok(command)
    }
}

fn applescript_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[async_trait]
impl PluginAdapter for DesktopNotifier {
    fn name(&self) -> &str {
        "desktop"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notifier
    }

    async fn health_check(&self) -> Result<HealthStatus, MementoError> {
        Ok(match self.backend {
            Backend::Unsupported => {
                HealthStatus::Degraded(format!("no notification tool for {}", std::env::consts::OS))
            }
            _ => HealthStatus::Healthy,
        })
    }

    async fn shutdown(&self) -> Result<(), MementoError> {
        Ok(())
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, message: &str) -> Result<(), MementoError> {
        let mut command = self.command(message)?;
        // A hung tool is killed when the timed-out future drops the child.
        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| MementoError::Timeout {
                duration: self.timeout,
            })?
            .map_err(|e| MementoError::Notification {
                message: format!("failed to run {}", self.program),
                source: Some(Box::new(e)),
            })?;

        if !output.status.success() {
            return Err(MementoError::Notification {
                message: format!(
                    "{} exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
                source: None,
            });
        }
        debug!(program = %self.program, "desktop notification sent");
        Ok(())
    }
}

/// Visible alert written to a terminal stream, stderr by default.
pub struct TerminalAlert {
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalAlert {
    pub fn new() -> Self {
        Self::to_writer(std::io::stderr())
    }

    pub fn to_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }

    fn write_alert(&self, message: &str) -> Result<(), MementoError> {
        let mut out = self.out.lock().map_err(|_| MementoError::Notification {
            message: "terminal alert writer poisoned".to_string(),
            source: None,
        })?;
        writeln!(out, "\x07Reminder: {message}")
            .and_then(|()| out.flush())
            .map_err(|e| MementoError::Notification {
                message: "failed to write terminal alert".to_string(),
                source: Some(Box::new(e)),
            })
    }
}

impl Default for TerminalAlert {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for TerminalAlert {
    fn name(&self) -> &str {
        "terminal"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notifier
    }

    async fn health_check(&self) -> Result<HealthStatus, MementoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MementoError> {
        Ok(())
    }
}

#[async_trait]
impl Notifier for TerminalAlert {
    async fn notify(&self, message: &str) -> Result<(), MementoError> {
        self.write_alert(message)
    }
}

/// Try `primary`, and on failure deliver through `fallback`.
pub struct FallbackNotifier {
    primary: Arc<dyn Notifier>,
    fallback: Arc<dyn Notifier>,
}

impl FallbackNotifier {
    pub fn new(primary: Arc<dyn Notifier>, fallback: Arc<dyn Notifier>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl PluginAdapter for FallbackNotifier {
    fn name(&self) -> &str {
        "fallback"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notifier
    }

    /// Healthy as long as one of the two channels is.
    async fn health_check(&self) -> Result<HealthStatus, MementoError> {
        let primary = self.primary.health_check().await?;
        if primary == HealthStatus::Healthy {
            return Ok(primary);
        }
        match self.fallback.health_check().await? {
            HealthStatus::Healthy => Ok(HealthStatus::Degraded(format!(
                "{} unavailable, using {}",
                self.primary.name(),
                self.fallback.name()
            ))),
            other => Ok(other),
        }
    }

    async fn shutdown(&self) -> Result<(), MementoError> {
        self.primary.shutdown().await?;
        self.fallback.shutdown().await
    }
}

#[async_trait]
impl Notifier for FallbackNotifier {
    async fn notify(&self, message: &str) -> Result<(), MementoError> {
        match self.primary.notify(message).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    error = %e,
                    "notification failed, using fallback"
                );
                self.fallback.notify(message).await
            }
        }
    }
}

/// Assemble the notifier chain described by configuration.
pub fn build_notifier(config: &NotifierConfig) -> Result<Arc<dyn Notifier>, MementoError> {
    let desktop = || Arc::new(DesktopNotifier::new(config.app_name.clone())) as Arc<dyn Notifier>;
    let alert = || Arc::new(TerminalAlert::new()) as Arc<dyn Notifier>;

    match (config.desktop, config.alert) {
        (true, true) => Ok(Arc::new(FallbackNotifier::new(desktop(), alert()))),
        (true, false) => Ok(desktop()),
        (false, true) => Ok(alert()),
        (false, false) => Err(MementoError::Config(
            "no notifier enabled; set notifier.desktop or notifier.alert".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shared buffer so the test can read what the alert wrote.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    struct Failing;

    #[async_trait]
    impl PluginAdapter for Failing {
        fn name(&self) -> &str {
            "failing"
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 0, 0)
        }
        fn adapter_type(&self) -> AdapterType {
            AdapterType::Notifier
        }
        async fn health_check(&self) -> Result<HealthStatus, MementoError> {
            Ok(HealthStatus::Unhealthy("always fails".into()))
        }
        async fn shutdown(&self) -> Result<(), MementoError> {
            Ok(())
        }
    }

    #[async_trait]
    impl Notifier for Failing {
        async fn notify(&self, _message: &str) -> Result<(), MementoError> {
            Err(MementoError::Notification {
                message: "boom".into(),
                source: None,
            })
        }
    }

    #[tokio::test]
    async fn terminal_alert_writes_bell_and_message() {
        let buf = SharedBuf::default();
        let alert = TerminalAlert::to_writer(buf.clone());
        alert.notify("Stand-up").await.unwrap();
        assert_eq!(buf.contents(), "\x07Reminder: Stand-up\n");
    }

    #[tokio::test]
    async fn fallback_used_when_primary_fails() {
        let buf = SharedBuf::default();
        let chain = FallbackNotifier::new(
            Arc::new(Failing),
            Arc::new(TerminalAlert::to_writer(buf.clone())),
        );
        chain.notify("Water plants").await.unwrap();
        assert_eq!(buf.contents(), "\x07Reminder: Water plants\n");

        let status = chain.health_check().await.unwrap();
        assert!(matches!(status, HealthStatus::Degraded(_)));
    }

    #[tokio::test]
    async fn fallback_error_surfaces_when_both_fail() {
        let chain = FallbackNotifier::new(Arc::new(Failing), Arc::new(Failing));
        let err = chain.notify("x").await.unwrap_err();
        assert!(matches!(err, MementoError::Notification { .. }));
    }

    #[tokio::test]
    async fn desktop_notifier_reports_missing_program() {
        let notifier =
            DesktopNotifier::new("Memento").with_program("memento-no-such-notify-binary");
        let err = notifier.notify("hello").await.unwrap_err();
        assert!(matches!(err, MementoError::Notification { .. }), "got {err}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn hung_desktop_tool_times_out() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("slow-notify");
        std::fs::write(&script, "#!/bin/sh\nsleep 5\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let notifier = DesktopNotifier::new("Memento")
            .with_program(script.display().to_string())
            .with_timeout(Duration::from_millis(100));
        let started = std::time::Instant::now();
        let err = notifier.notify("hello").await.unwrap_err();
        assert!(
            matches!(err, MementoError::Timeout { duration } if duration == Duration::from_millis(100)),
            "got {err}"
        );
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn applescript_quotes_are_escaped() {
        assert_eq!(applescript_escape(r#"say "hi" \o/"#), r#"say \"hi\" \\o/"#);
    }

    #[test]
    fn build_notifier_follows_config() {
        let mut config = NotifierConfig::default();
        assert_eq!(build_notifier(&config).unwrap().name(), "fallback");

        config.desktop = false;
        assert_eq!(build_notifier(&config).unwrap().name(), "terminal");

        config.desktop = true;
        config.alert = false;
        assert_eq!(build_notifier(&config).unwrap().name(), "desktop");

        config.desktop = false;
        assert!(build_notifier(&config).is_err());
    }
}
