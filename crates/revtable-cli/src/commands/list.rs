//! List command

use super::StoreArgs;
use clap::Args;
use revtable_store::StoreConfig;
use std::error::Error;

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Emit revisions as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ListArgs) -> Result<(), Box<dyn Error>> {
    let table = args.store.table_name()?;
    let store = args.store.open_store(StoreConfig::default())?;

    let revisions = store.list_revisions(&table)?;
    store.close()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&revisions)?);
        return Ok(());
    }

    if revisions.is_empty() {
        println!("No revisions in `{}'", table);
        return Ok(());
    }

    for rev in &revisions {
        println!(
            "{} {:<24} {} {}",
            if rev.active { "*" } else { " " },
            rev.revision,
            rev.timestamp.format("%Y-%m-%d %H:%M:%S"),
            rev.version.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}
