//! revtable-store - SQL-backed deployment revision index
//!
//! Provides:
//! - Idempotent per-target table creation with legacy upgrades
//! - Overwrite-guarded revision upload (transactional delete+insert)
//! - Recency-bounded retention trimming of inactive revisions
//! - Atomic single-statement revision activation

pub mod config;
pub mod db;
pub mod errors;
pub mod revisions;
pub mod schema;

// Re-export key types
pub use config::StoreConfig;
pub use errors::{Result, StoreError};
pub use revisions::{Revision, RevisionRef, RevisionStore};
