//! Schema manager
//!
//! Ensures the per-target revisions table exists, upgrading tables created by
//! earlier generations of the tool in place. The table name is always passed
//! explicitly; no ambient state feeds the DDL.

use crate::config::validate_table_name;
use crate::errors::{Result, StoreError};
use rusqlite::Connection;

/// Ensure `table` exists with the current column set. Idempotent.
///
/// Three cases:
/// - absent: create the table and its `is_active` index
/// - present without an `is_active` column (legacy layout): add the missing
///   columns and port the legacy `current` pointer row to the active flag
/// - present and current: no-op
pub fn ensure_table(conn: &mut Connection, table: &str) -> Result<()> {
    validate_table_name(table)?;

    if !table_exists(conn, table)? {
        return create_table(conn, table);
    }

    if !has_column(conn, table, "is_active")? {
        return upgrade_legacy_table(conn, table);
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |_| Ok(()),
    )
    .map(|_| true)
    .or_else(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Ok(false),
        other => Err(StoreError::schema(table)(other)),
    })
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .map_err(StoreError::schema(table))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(StoreError::schema(table))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(StoreError::schema(table))?;

    Ok(names.iter().any(|n| n == column))
}

fn create_table(conn: &mut Connection, table: &str) -> Result<()> {
    let tx = conn.transaction().map_err(StoreError::schema(table))?;

    tx.execute_batch(&format!(
        "CREATE TABLE {table} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            key TEXT NOT NULL UNIQUE,
            value TEXT NOT NULL,
            version BLOB,
            deployer TEXT,
            description TEXT,
            is_active INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX {table}_is_active_index ON {table} (is_active);"
    ))
    .map_err(StoreError::schema(table))?;

    tx.commit().map_err(StoreError::schema(table))?;

    tracing::debug!(table, "created revisions table");

    Ok(())
}

/// Upgrade a table written by the static-schema predecessors, which had no
/// `description` or `is_active` columns and tracked the live revision through
/// a sentinel row with `key = 'current'` whose value named the active key.
fn upgrade_legacy_table(conn: &mut Connection, table: &str) -> Result<()> {
    let tx = conn.transaction().map_err(StoreError::schema(table))?;

    tx.execute_batch(&format!(
        "ALTER TABLE {table} ADD COLUMN description TEXT;
        ALTER TABLE {table} ADD COLUMN is_active INTEGER NOT NULL DEFAULT 0;
        CREATE INDEX {table}_is_active_index ON {table} (is_active);"
    ))
    .map_err(StoreError::schema(table))?;

    let current: Option<String> = tx
        .query_row(
            &format!("SELECT value FROM {table} WHERE key = 'current'"),
            [],
            |row| row.get(0),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(StoreError::schema(table)(other)),
        })?;

    if let Some(active_key) = current {
        tx.execute(
            &format!("UPDATE {table} SET is_active = 1 WHERE key = ?1"),
            [&active_key],
        )
        .map_err(StoreError::schema(table))?;
        tx.execute(&format!("DELETE FROM {table} WHERE key = 'current'"), [])
            .map_err(StoreError::schema(table))?;

        tracing::info!(table, active_key = %active_key, "ported legacy `current' pointer row");
    }

    tx.commit().map_err(StoreError::schema(table))?;

    tracing::info!(table, "upgraded legacy revisions table");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn test_ensure_table_is_idempotent() {
        let mut conn = db::open_in_memory().unwrap();
        ensure_table(&mut conn, "t_bootstrap").unwrap();
        ensure_table(&mut conn, "t_bootstrap").unwrap();

        assert!(table_exists(&conn, "t_bootstrap").unwrap());
        assert!(has_column(&conn, "t_bootstrap", "is_active").unwrap());
    }

    #[test]
    fn test_rejects_bad_table_name() {
        let mut conn = db::open_in_memory().unwrap();
        let result = ensure_table(&mut conn, "t; DROP TABLE x");
        assert!(matches!(result, Err(crate::StoreError::Config(_))));
    }
}
