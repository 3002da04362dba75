//! Activate command

use super::StoreArgs;
use clap::Args;
use revtable_store::StoreConfig;
use std::error::Error;

#[derive(Debug, Args)]
pub struct ActivateArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Revision key to activate; defaults to "default" when omitted
    #[arg(long)]
    pub revision: Option<String>,
}

pub fn execute(args: ActivateArgs) -> Result<(), Box<dyn Error>> {
    let table = args.store.table_name()?;
    let mut store = args.store.open_store(StoreConfig::default())?;

    let outcome = store.activate_revision(&table, args.revision.as_deref())?;
    store.close()?;

    println!("✔ Activated revision `{}'", outcome.revision_key);

    Ok(())
}
