//! Init command implementation.
//!
//! Generates a `placer.yaml` profile with defaulted session settings.

use std::path::PathBuf;

use clap::Args;

use crate::error::{PlacerError, Result};
use crate::output::{display_path, Printer};
use crate::types::{Profile, PROFILE_FILENAME};

/// Initialize a project by generating a placer.yaml profile
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing placer.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let profile_path = args.path.join(PROFILE_FILENAME);

    if profile_path.exists() && !args.force {
        return Err(PlacerError::Validation {
            message: format!("{} already exists", PROFILE_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    Profile::default().save(&profile_path)?;

    printer.status("Created", &display_path(&profile_path));
    Ok(())
}
