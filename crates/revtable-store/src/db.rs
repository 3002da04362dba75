//! Database connection management
//!
//! Provides utilities for opening and managing SQLite connections

use crate::errors::{Result, StoreError};
use rusqlite::Connection;
use std::path::Path;

/// Open the revision database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path).map_err(StoreError::connection("open"))?;
    configure(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(StoreError::connection("open"))?;
    configure(&conn)?;
    Ok(conn)
}

/// Configure a connection with optimal settings
pub fn configure(conn: &Connection) -> Result<()> {
    // WAL mode for better concurrency across parallel deploys
    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(StoreError::connection("configure"))?;

    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(StoreError::connection("configure"))?;

    Ok(())
}
