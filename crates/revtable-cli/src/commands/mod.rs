//! CLI subcommands, one module per command.

pub mod activate;
pub mod active;
pub mod list;
pub mod upload;

use clap::Args;
use revtable_store::{config, RevisionStore, StoreConfig};
use std::error::Error;

/// Flags shared by every command: where the database lives and which table
/// to operate on.
#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Path to the SQLite database
    #[arg(long, default_value = ".revtable/store.db")]
    pub db: String,

    /// Target table name
    #[arg(long, conflicts_with = "project")]
    pub table: Option<String>,

    /// Project identifier; the table name is derived as `{project}_bootstrap`
    #[arg(long)]
    pub project: Option<String>,
}

impl StoreArgs {
    pub fn table_name(&self) -> Result<String, Box<dyn Error>> {
        match (&self.table, &self.project) {
            (Some(table), _) => Ok(table.clone()),
            (None, Some(project)) => Ok(config::default_table_name(project)),
            (None, None) => Err("Must specify either --table or --project".into()),
        }
    }

    pub fn open_store(&self, config: StoreConfig) -> Result<RevisionStore, Box<dyn Error>> {
        if let Some(parent) = std::path::Path::new(&self.db).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(RevisionStore::open(&self.db, config)?)
    }
}
