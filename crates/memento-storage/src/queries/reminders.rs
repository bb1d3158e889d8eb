// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reminder CRUD operations.
//!
//! These functions store what they are given. Input validation happens in
//! [`SqliteStorage`](crate::SqliteStorage) before a row reaches this layer.

use memento_core::MementoError;
use rusqlite::{params, Row};

use crate::database::Database;
use crate::models::{NewReminder, Reminder, ReminderId};

const COLUMNS: &str = "id, message, day, time, created_at";

fn reminder_from_row(row: &Row<'_>) -> rusqlite::Result<Reminder> {
    Ok(Reminder {
        id: row.get(0)?,
        message: row.get(1)?,
        day: row.get(2)?,
        time: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Insert a reminder and return the stored row with its assigned id and timestamp.
pub async fn insert_reminder(db: &Database, new: &NewReminder) -> Result<Reminder, MementoError> {
    let new = new.clone();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!(
                    "INSERT INTO reminders (message, day, time) VALUES (?1, ?2, ?3)
                     RETURNING {COLUMNS}"
                ),
                params![new.message, new.day, new.time],
                reminder_from_row,
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all reminders, newest first.
pub async fn list_reminders(db: &Database) -> Result<Vec<Reminder>, MementoError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM reminders ORDER BY created_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map([], reminder_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete one reminder. Returns `false` if no row had that id.
pub async fn delete_reminder(db: &Database, id: ReminderId) -> Result<bool, MementoError> {
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute("DELETE FROM reminders WHERE id = ?1", params![id])?;
            Ok(deleted > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete every reminder, returning how many were removed.
pub async fn delete_all_reminders(db: &Database) -> Result<u64, MementoError> {
    db.connection()
        .call(|conn| {
            let deleted = conn.execute("DELETE FROM reminders", [])?;
            Ok(deleted as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn count_reminders(db: &Database) -> Result<u64, MementoError> {
    db.connection()
        .call(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM reminders", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
