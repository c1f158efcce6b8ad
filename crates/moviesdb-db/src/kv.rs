//! Key-value row operations.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

/// Loads the value stored under `key`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
        row.get(0)
    })
    .optional()
    .with_context(|| format!("failed to load kv {key}"))
}

/// Stores every `(key, value)` pair in one transaction.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn save_values(conn: &Connection, pairs: &[(&str, &str)]) -> Result<()> {
    let tx = conn
        .unchecked_transaction()
        .context("failed to begin transaction")?;

    let updated_at = Utc::now().to_rfc3339();
    let mut stmt = tx
        .prepare(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .context("failed to prepare kv upsert")?;

    for (key, value) in pairs {
        stmt.execute(rusqlite::params![key, value, updated_at])
            .with_context(|| format!("failed to save kv {key}"))?;
    }

    drop(stmt);
    tx.commit().context("failed to commit kv")?;
    Ok(())
}

/// Deletes the given keys. Missing keys are ignored.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_values(conn: &Connection, keys: &[&str]) -> Result<()> {
    let tx = conn
        .unchecked_transaction()
        .context("failed to begin transaction")?;

    for key in keys {
        tx.execute("DELETE FROM kv WHERE key = ?1", [key])
            .with_context(|| format!("failed to delete kv {key}"))?;
    }

    tx.commit().context("failed to commit kv delete")?;
    Ok(())
}
