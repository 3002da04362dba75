//! Active-key command

use super::StoreArgs;
use clap::Args;
use revtable_store::StoreConfig;
use std::error::Error;

#[derive(Debug, Args)]
pub struct ActiveArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

pub fn execute(args: ActiveArgs) -> Result<(), Box<dyn Error>> {
    let table = args.store.table_name()?;
    let store = args.store.open_store(StoreConfig::default())?;

    let key = store.active_revision_key(&table)?;
    store.close()?;

    match key {
        Some(key) => println!("{}", key),
        None => println!("none"),
    }

    Ok(())
}
