//! Store configuration.
//!
//! All policy knobs are resolved once, here, before a store is constructed.
//! Nothing reads configuration dynamically per call.

use crate::errors::{Result, StoreError};

/// Default retention cap for inactive revisions.
pub const DEFAULT_MAX_RECENT_UPLOADS: usize = 10;

/// Revision key used when the caller supplies none.
pub const DEFAULT_REVISION_KEY: &str = "default";

/// Policy configuration for a [`crate::RevisionStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Whether re-uploading an existing revision key replaces it (true) or
    /// fails with `DuplicateRevision` (false).
    pub allow_overwrite: bool,
    /// How many recent inactive revisions to retain when trimming.
    pub max_recent_uploads: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            allow_overwrite: false,
            max_recent_uploads: DEFAULT_MAX_RECENT_UPLOADS,
        }
    }
}

/// Derive the default table name for a deployment target from its project
/// identifier: `{project}_bootstrap`, with dashes mapped to underscores.
pub fn default_table_name(project: &str) -> String {
    format!("{}_bootstrap", project.replace('-', "_"))
}

/// Validate a table name as a plain SQL identifier.
///
/// Table names are spliced into statements (identifiers cannot be bound
/// parameters), so anything outside `[A-Za-z_][A-Za-z0-9_]*` is rejected at
/// the configuration boundary.
pub fn validate_table_name(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(StoreError::Config(format!(
            "invalid table name: `{table}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert!(!config.allow_overwrite);
        assert_eq!(config.max_recent_uploads, 10);
    }

    #[test]
    fn test_default_table_name_maps_dashes() {
        assert_eq!(default_table_name("my-app"), "my_app_bootstrap");
        assert_eq!(default_table_name("blog"), "blog_bootstrap");
    }

    #[test]
    fn test_table_name_validation() {
        assert!(validate_table_name("my_app_bootstrap").is_ok());
        assert!(validate_table_name("_private").is_ok());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("1table").is_err());
        assert!(validate_table_name("t; DROP TABLE x").is_err());
        assert!(validate_table_name("my-app").is_err());
    }
}
