//! Revision store
//!
//! The core of the crate: upload-with-collision-detection, listing, retention
//! trimming, and atomic activation of deployment revisions, all against a
//! single SQLite connection owned by the store.

use crate::config::{StoreConfig, DEFAULT_REVISION_KEY};
use crate::errors::{Result, StoreError};
use crate::{db, schema};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use std::path::Path;

/// One revision as projected by [`RevisionStore::list_revisions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Revision {
    /// The unique revision key.
    pub revision: String,
    /// Reserved content identifier, rendered as 40 lowercase hex digits when
    /// the underlying 20-byte blob is present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub deployer: Option<String>,
    pub description: Option<String>,
    /// Whether this is the live revision.
    pub active: bool,
    /// Insertion time; the sole recency key.
    pub timestamp: DateTime<Utc>,
}

/// Table/key pair identifying a stored revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionRef {
    pub table_name: String,
    pub revision_key: String,
}

/// SQLite-backed store for deployment revisions.
///
/// Owns the connection for its whole lifetime; [`RevisionStore::close`]
/// releases it exactly once. Operations are short-lived statements or
/// transactions, so concurrent stores pointed at the same database stay
/// consistent through SQLite's own isolation plus the unique `key` constraint.
pub struct RevisionStore {
    conn: Connection,
    config: StoreConfig,
}

impl RevisionStore {
    /// Wrap an existing connection.
    pub fn new(conn: Connection, config: StoreConfig) -> Self {
        Self { conn, config }
    }

    /// Open the database at `path` and bind the store to it.
    pub fn open<P: AsRef<Path>>(path: P, config: StoreConfig) -> Result<Self> {
        Ok(Self::new(db::open(path)?, config))
    }

    /// In-memory store (for testing).
    pub fn open_in_memory(config: StoreConfig) -> Result<Self> {
        Ok(Self::new(db::open_in_memory()?, config))
    }

    /// Release the underlying connection. Every store must be closed exactly
    /// once; no operation opens or closes the connection implicitly.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| StoreError::connection("close")(e))
    }

    /// Store `value` under `revision_key` (defaulted to `"default"` when
    /// empty), creating or upgrading the table first and trimming old
    /// revisions afterwards.
    ///
    /// The overwrite path is a transactional delete+insert rather than an
    /// in-place update: portable across backends, and it resets `created_at`
    /// and the active flag for the key in one step.
    pub fn upload(
        &mut self,
        table: &str,
        revision_key: Option<&str>,
        value: &str,
    ) -> Result<RevisionRef> {
        let key = normalize_key(revision_key);

        schema::ensure_table(&mut self.conn, table)?;

        if self.revision_exists(table, &key)? && !self.config.allow_overwrite {
            return Err(StoreError::DuplicateRevision {
                table: table.to_string(),
                key,
            });
        }

        tracing::debug!(table, key = %key, bytes = value.len(), "uploading revision");

        let tx = self
            .conn
            .transaction()
            .map_err(StoreError::backend(table, "upload"))?;
        tx.execute(&format!("DELETE FROM {table} WHERE key = ?1"), [&key])
            .map_err(StoreError::backend(table, "upload"))?;
        let now = Utc::now().timestamp_millis();
        tx.execute(
            &format!("INSERT INTO {table} (key, value, created_at) VALUES (?1, ?2, ?3)"),
            rusqlite::params![key, value, now],
        )
        .map_err(|e| map_insert_error(table, &key, e))?;
        tx.commit().map_err(StoreError::backend(table, "upload"))?;

        let revisions = self.list_revisions(table)?;
        self.trim_revisions(table, &revisions)?;

        Ok(RevisionRef {
            table_name: table.to_string(),
            revision_key: key,
        })
    }

    /// All revisions in `table`, most recent first.
    ///
    /// A fresh snapshot on every call; `id` breaks same-millisecond ties so
    /// the order always matches insertion order.
    pub fn list_revisions(&self, table: &str) -> Result<Vec<Revision>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT key, version, deployer, description, is_active, created_at
                 FROM {table}
                 ORDER BY created_at DESC, id DESC"
            ))
            .map_err(StoreError::backend(table, "list_revisions"))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Revision {
                    revision: row.get(0)?,
                    version: row.get::<_, Option<Vec<u8>>>(1)?.map(hex::encode),
                    deployer: row.get(2)?,
                    description: row.get(3)?,
                    active: row.get::<_, i64>(4)? != 0,
                    timestamp: DateTime::from_timestamp_millis(row.get(5)?)
                        .unwrap_or(DateTime::UNIX_EPOCH),
                })
            })
            .map_err(StoreError::backend(table, "list_revisions"))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::backend(table, "list_revisions"))?;

        Ok(rows)
    }

    /// Delete inactive revisions beyond the retention cap.
    ///
    /// `revisions` is the most-recent-first snapshot from
    /// [`RevisionStore::list_revisions`]; the first `max_recent_uploads`
    /// inactive entries are kept, the rest deleted by key in one batch.
    /// Active rows are never candidates, whatever their age.
    pub fn trim_revisions(&self, table: &str, revisions: &[Revision]) -> Result<()> {
        let old_keys: Vec<&str> = revisions
            .iter()
            .filter(|r| !r.active)
            .skip(self.config.max_recent_uploads)
            .map(|r| r.revision.as_str())
            .collect();

        if old_keys.is_empty() {
            return Ok(());
        }

        let placeholders = vec!["?"; old_keys.len()].join(", ");
        self.conn
            .execute(
                &format!("DELETE FROM {table} WHERE key IN ({placeholders})"),
                rusqlite::params_from_iter(old_keys.iter()),
            )
            .map_err(StoreError::backend(table, "trim_revisions"))?;

        tracing::debug!(table, trimmed = old_keys.len(), "trimmed old revisions");

        Ok(())
    }

    /// Key of the active revision, or `None` when nothing is active.
    ///
    /// If out-of-band writes left several rows active, which one is returned
    /// is unspecified.
    pub fn active_revision_key(&self, table: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                &format!("SELECT key FROM {table} WHERE is_active = 1 LIMIT 1"),
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::backend(table, "active_revision_key"))
    }

    /// Mark `revision_key` (defaulted to `"default"` when empty) as the one
    /// live revision.
    ///
    /// The flag flip is a single full-table conditional update, so exactly
    /// one row is active afterwards.
    pub fn activate_revision(
        &mut self,
        table: &str,
        revision_key: Option<&str>,
    ) -> Result<RevisionRef> {
        let key = normalize_key(revision_key);

        if !self.revision_exists(table, &key)? {
            return Err(StoreError::InvalidRevisionKey {
                table: table.to_string(),
                key,
            });
        }

        self.conn
            .execute(
                &format!("UPDATE {table} SET is_active = (key = ?1)"),
                [&key],
            )
            .map_err(StoreError::backend(table, "activate_revision"))?;

        tracing::info!(table, key = %key, "activated revision");

        Ok(RevisionRef {
            table_name: table.to_string(),
            revision_key: key,
        })
    }

    fn revision_exists(&self, table: &str, key: &str) -> Result<bool> {
        self.conn
            .query_row(
                &format!("SELECT 1 FROM {table} WHERE key = ?1"),
                [key],
                |_| Ok(()),
            )
            .optional()
            .map(|row| row.is_some())
            .map_err(StoreError::backend(table, "revision_exists"))
    }
}

fn normalize_key(key: Option<&str>) -> String {
    match key {
        Some(k) if !k.is_empty() => k.to_string(),
        _ => DEFAULT_REVISION_KEY.to_string(),
    }
}

/// A uniqueness violation on insert means a concurrent uploader won the race
/// for this key; report it the same way as the up-front existence check.
fn map_insert_error(table: &str, key: &str, err: rusqlite::Error) -> StoreError {
    if err.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) {
        StoreError::DuplicateRevision {
            table: table.to_string(),
            key: key.to_string(),
        }
    } else {
        StoreError::backend(table, "upload")(err)
    }
}
