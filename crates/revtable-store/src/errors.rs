//! Revision store error types.

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Revision store operation errors.
///
/// Business-rule failures ([`StoreError::DuplicateRevision`],
/// [`StoreError::InvalidRevisionKey`]) are distinct from backend failures so
/// callers can recover differently (pick another key vs. abort). Backend
/// errors are passed through with the table and operation preserved, never
/// interpreted or retried here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("schema setup failed for table `{table}': {source}")]
    Schema {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("revision already exists in `{table}': {key}")]
    DuplicateRevision { table: String, key: String },

    #[error("`{key}' is not a valid revision key in `{table}'")]
    InvalidRevisionKey { table: String, key: String },

    #[error("{op} failed for table `{table}': {source}")]
    Backend {
        table: String,
        op: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("database {op} failed: {source}")]
    Connection {
        op: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Wrap a rusqlite error with table and operation context.
    pub(crate) fn backend<'a>(
        table: &'a str,
        op: &'static str,
    ) -> impl FnOnce(rusqlite::Error) -> Self + 'a {
        move |source| StoreError::Backend {
            table: table.to_string(),
            op,
            source,
        }
    }

    pub(crate) fn schema(table: &str) -> impl FnOnce(rusqlite::Error) -> Self + '_ {
        move |source| StoreError::Schema {
            table: table.to_string(),
            source,
        }
    }

    pub(crate) fn connection(op: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| StoreError::Connection { op, source }
    }
}
