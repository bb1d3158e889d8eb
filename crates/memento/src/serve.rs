// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `memento serve` command implementation.
//!
//! Opens SQLite storage, starts the reminder scheduler, and serves the HTTP
//! gateway until SIGINT/SIGTERM. On shutdown the gateway drains, the
//! scheduler stops, and storage is checkpointed.

use std::sync::Arc;

use memento_config::model::MementoConfig;
use memento_core::{Clock, MementoError, PluginAdapter, ReminderStore, SystemClock};
use memento_gateway::{GatewayState, HealthState, ServerConfig};
use memento_scheduler::shutdown;
use memento_scheduler::{build_notifier, ReminderScheduler, SchedulerSettings};
use memento_storage::SqliteStorage;
use tracing::{error, info};

/// Runs the `memento serve` command.
pub async fn run_serve(config: MementoConfig) -> Result<(), MementoError> {
    init_tracing(&config.app.log_level);

    info!(name = %config.app.name, "starting memento serve");

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    let store: Arc<dyn ReminderStore> = storage.clone();

    let notifier = build_notifier(&config.notifier)?;
    info!(notifier = notifier.name(), "notifier ready");

    // Bind before starting the scheduler so a taken port fails fast.
    let listener = if config.gateway.enabled {
        let server_config = ServerConfig {
            host: config.gateway.host.clone(),
            port: config.gateway.port,
        };
        Some(memento_gateway::bind(&server_config).await?)
    } else {
        info!("gateway disabled");
        None
    };

    let scheduler = if config.scheduler.enabled {
        let scheduler = ReminderScheduler::new(
            Arc::clone(&store),
            notifier,
            Arc::new(SystemClock) as Arc<dyn Clock>,
            SchedulerSettings::from_config(&config.scheduler),
        );
        scheduler.start().await;
        Some(scheduler)
    } else {
        info!("scheduler disabled");
        None
    };

    let cancel = shutdown::install_signal_handler();

    let gateway = listener.map(|listener| {
        let state = GatewayState {
            store: Arc::clone(&store),
            max_reminders: config.app.max_reminders,
            health: HealthState::new(scheduler.as_ref().map(ReminderScheduler::status)),
        };
        tokio::spawn(memento_gateway::serve(listener, state, cancel.clone()))
    });

    cancel.cancelled().await;
    info!("shutdown signal received");

    if let Some(gateway) = gateway {
        match gateway.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "gateway exited with error"),
            Err(e) => error!(error = %e, "gateway task panicked"),
        }
    }

    if let Some(scheduler) = &scheduler {
        scheduler.stop().await;
    }

    if let Err(e) = store.close().await {
        error!(error = %e, "failed to close storage");
    }

    info!("memento serve shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber with the configured log level.
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("memento={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
