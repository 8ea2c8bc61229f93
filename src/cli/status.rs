//! Status command implementation.

use clap::Args;

use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::error::{PlacerError, Result};
use crate::host::FileStore;
use crate::output::{plural, Printer};
use crate::types::Profile;

/// Inspect the checkpoint slot
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit the raw checkpoint as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: StatusArgs, printer: &Printer) -> Result<()> {
    let profile = Profile::load_or_default(&std::env::current_dir()?)?;
    let store = CheckpointStore::new(FileStore::new(&profile.store_dir));

    let Some(checkpoint) = store.load() else {
        printer.info("Status", "no checkpoint saved");
        return Ok(());
    };

    if args.json {
        let json = serde_json::to_string_pretty(&checkpoint).map_err(|e| PlacerError::Parse {
            message: format!("Could not serialize checkpoint: {}", e),
            help: None,
        })?;
        println!("{}", json);
        return Ok(());
    }

    let done = done_count(&checkpoint);
    printer.info("Image", &checkpoint.image_name);
    printer.info(
        "Progress",
        &format!(
            "{} of {} done, {} remaining",
            done,
            checkpoint.total_tasks,
            plural(checkpoint.remaining_queue.len(), "task", "tasks"),
        ),
    );
    printer.info(
        "Origin",
        &format!("({}, {})", checkpoint.start_x, checkpoint.start_y),
    );
    printer.info("Delay", &format!("{}ms", checkpoint.delay_ms));
    match (checkpoint.cell_width, checkpoint.cell_height) {
        (Some(w), Some(h)) => printer.info("Cell", &format!("{}x{} (calibrated)", w, h)),
        _ => printer.info("Cell", "1x1 (uncalibrated)"),
    }

    Ok(())
}

/// Completed-task count. A hand-edited record can claim a remainder larger
/// than its total; corrupt persisted data stays non-fatal, so clamp to zero.
fn done_count(checkpoint: &Checkpoint) -> usize {
    checkpoint
        .total_tasks
        .saturating_sub(checkpoint.remaining_queue.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Colour, PixelTask, SessionConfig};

    #[test]
    fn test_done_count() {
        let remaining = vec![PixelTask::new(0, 0, Colour::BLACK); 3];
        let checkpoint = Checkpoint::new(&SessionConfig::default(), &remaining, 10, 0);
        assert_eq!(done_count(&checkpoint), 7);
    }

    #[test]
    fn test_done_count_clamps_inconsistent_record() {
        let remaining = vec![PixelTask::new(0, 0, Colour::BLACK); 3];
        let checkpoint = Checkpoint::new(&SessionConfig::default(), &remaining, 1, 0);
        assert_eq!(done_count(&checkpoint), 0);
    }
}
