//! Clear command implementation.

use clap::Args;

use crate::checkpoint::CheckpointStore;
use crate::error::Result;
use crate::host::FileStore;
use crate::output::Printer;
use crate::types::Profile;

/// Remove the checkpoint slot
#[derive(Args, Debug)]
pub struct ClearArgs {}

pub fn run(_args: ClearArgs, printer: &Printer) -> Result<()> {
    let profile = Profile::load_or_default(&std::env::current_dir()?)?;
    let mut store = CheckpointStore::new(FileStore::new(&profile.store_dir));

    if store.load().is_none() {
        printer.info("Clear", "no checkpoint to remove");
        return Ok(());
    }

    store.clear();
    printer.status("Cleared", "checkpoint slot");
    Ok(())
}
