//! Upload command

use super::StoreArgs;
use clap::Args;
use revtable_store::config::DEFAULT_MAX_RECENT_UPLOADS;
use revtable_store::StoreConfig;
use std::error::Error;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct UploadArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Revision key; defaults to "default" when omitted
    #[arg(long)]
    pub revision: Option<String>,

    /// Artifact file whose contents become the revision payload
    #[arg(long, default_value = "dist/index.html")]
    pub file: PathBuf,

    /// Replace an existing revision with the same key instead of failing
    #[arg(long)]
    pub allow_overwrite: bool,

    /// How many recent inactive revisions to retain
    #[arg(long, default_value_t = DEFAULT_MAX_RECENT_UPLOADS)]
    pub max_recent_uploads: usize,
}

pub fn execute(args: UploadArgs) -> Result<(), Box<dyn Error>> {
    let table = args.store.table_name()?;
    let value = std::fs::read_to_string(&args.file)
        .map_err(|e| format!("cannot read `{}': {}", args.file.display(), e))?;

    let config = StoreConfig {
        allow_overwrite: args.allow_overwrite,
        max_recent_uploads: args.max_recent_uploads,
    };
    let mut store = args.store.open_store(config)?;

    let outcome = store.upload(&table, args.revision.as_deref(), &value)?;
    let active = store.active_revision_key(&outcome.table_name)?;
    store.close()?;

    println!(
        "Uploaded to table `{}' with key `{}'",
        outcome.table_name, outcome.revision_key
    );

    if active.as_deref() != Some(outcome.revision_key.as_str()) {
        println!(
            "Deployed but did not activate revision `{}'. To activate, run:\n    revtable activate --db {} --table {} --revision {}",
            outcome.revision_key, args.store.db, outcome.table_name, outcome.revision_key
        );
    }

    Ok(())
}
