// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;
use std::time::Duration;

use memento_core::MementoError;
use tracing::debug;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the single SQLite writer connection.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` in WAL mode and apply migrations.
    pub async fn open(path: &str) -> Result<Self, MementoError> {
        Self::open_with(path, true).await
    }

    /// Open the database, choosing the journal mode explicitly.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, MementoError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| MementoError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| MementoError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| -> Result<(), MementoError> {
            configure(conn, wal_mode).map_err(|e| MementoError::Storage {
                source: Box::new(e),
            })?;
            crate::migrations::run_migrations(conn)
        })
        .await
        .map_err(|e| match e {
            tokio_rusqlite::Error::Error(inner) => inner,
            other => MementoError::Storage {
                source: other.to_string().into(),
            },
        })?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying async connection. Every query goes through `call()`.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Close the connection, flushing the background thread.
    pub async fn close(self) -> Result<(), MementoError> {
        self.conn.close().await.map_err(|e| MementoError::Storage {
            source: e.to_string().into(),
        })
    }
}

fn configure(conn: &mut rusqlite::Connection, wal_mode: bool) -> rusqlite::Result<()> {
    if wal_mode {
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(journal_mode = %mode, "journal mode set");
    }
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}

/// Convert a tokio-rusqlite call error into [`MementoError::Storage`].
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> MementoError {
    MementoError::Storage {
        source: Box::new(e),
    }
}
