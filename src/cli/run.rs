//! Run and resume command implementations.
//!
//! Binds the engine to the simulated collaborators: a PNG-backed canvas, a
//! fixed palette (optionally loaded from a palette file), and a file-backed
//! checkpoint store in the profile's store directory.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::checkpoint::CheckpointStore;
use crate::engine::{Engine, RunReport, RunState, SystemClock};
use crate::error::{PlacerError, Result};
use crate::host::{brush, FileStore, FixedPalette, PngSurface};
use crate::output::{display_path, plural, Printer};
use crate::types::{LockedMode, Profile, SessionConfig, TaskQueue};
use crate::validation::check_plan;

/// Drive a plan against the simulated canvas
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Input source: image, .json task list, or .txt colour matrix
    pub source: PathBuf,

    /// Maximum plan width when decoding an image
    #[arg(long, default_value = "128")]
    pub max_width: u32,

    /// Maximum plan height when decoding an image
    #[arg(long, default_value = "128")]
    pub max_height: u32,

    #[command(flatten)]
    pub session: SessionArgs,
}

/// Continue from the saved checkpoint
#[derive(Args, Debug)]
pub struct ResumeArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

/// Session flags shared by run and resume, overriding the profile.
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Palette file (YAML); omitting one runs in manual colour mode
    #[arg(long)]
    pub palette: Option<PathBuf>,

    /// Output path for the canvas PNG
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Grid origin in device coordinates
    #[arg(long)]
    pub start_x: Option<i64>,

    #[arg(long)]
    pub start_y: Option<i64>,

    /// Pause between tasks, in milliseconds
    #[arg(long)]
    pub delay: Option<u64>,

    /// Locked-colour handling mode
    #[arg(long, value_enum)]
    pub mode: Option<LockedMode>,

    /// Calibrated cell width in device pixels
    #[arg(long)]
    pub cell_width: Option<u32>,

    /// Calibrated cell height in device pixels
    #[arg(long)]
    pub cell_height: Option<u32>,

    /// Cooperatively stop after this many tasks
    #[arg(long)]
    pub limit: Option<usize>,

    /// Drop the inter-task delay (the settle pause still applies)
    #[arg(long)]
    pub no_delay: bool,

    /// Disable automatic colour selection even with a palette
    #[arg(long)]
    pub manual: bool,

    /// Canvas width override for the simulated surface
    #[arg(long)]
    pub canvas_width: Option<u32>,

    /// Canvas height override for the simulated surface
    #[arg(long)]
    pub canvas_height: Option<u32>,
}

impl SessionArgs {
    fn apply_to(&self, config: &mut SessionConfig) {
        if let Some(x) = self.start_x {
            config.start_x = x;
        }
        if let Some(y) = self.start_y {
            config.start_y = y;
        }
        if let Some(delay) = self.delay {
            config.delay_ms = delay;
        }
        if self.no_delay {
            config.delay_ms = 0;
        }
        if let Some(mode) = self.mode {
            config.locked_mode = mode;
        }
        if let Some(w) = self.cell_width {
            config.cell_width = Some(w);
        }
        if let Some(h) = self.cell_height {
            config.cell_height = Some(h);
        }
    }
}

type SimEngine = Engine<PngSurface, FixedPalette, FileStore, SystemClock>;

pub fn run(args: RunArgs, printer: &Printer) -> Result<()> {
    let profile = Profile::load_or_default(&std::env::current_dir()?)?;

    printer.status("Loading", &display_path(&args.source));
    let (name, queue) = super::load_source(&args.source, args.max_width, args.max_height)?;

    let mut config = profile.to_config(&name);
    args.session.apply_to(&mut config);

    report_plan_warnings(&queue, &config, printer);

    let mut engine = build_engine(&profile, &args.session, &queue, config)?;
    engine.load_queue(queue);

    drive(&mut engine, &args.session, &profile, printer)
}

pub fn resume(args: ResumeArgs, printer: &Printer) -> Result<()> {
    let profile = Profile::load_or_default(&std::env::current_dir()?)?;

    // Peek at the slot first: the canvas has to be sized before the engine
    // that owns the store exists.
    let peek = CheckpointStore::new(FileStore::new(&profile.store_dir));
    let checkpoint = peek.load().ok_or_else(|| PlacerError::Validation {
        message: "No checkpoint to resume".to_string(),
        help: Some("Start a session with `placer run` first".to_string()),
    })?;

    let mut config = profile.to_config(&checkpoint.image_name);
    checkpoint.apply_to(&mut config);
    args.session.apply_to(&mut config);

    let queue = TaskQueue::from_tasks(checkpoint.remaining_queue);
    printer.status(
        "Resuming",
        &format!(
            "{} ({} left of {})",
            config.image_name,
            queue.len(),
            checkpoint.total_tasks
        ),
    );

    let mut engine = build_engine(&profile, &args.session, &queue, config)?;
    if !engine.restore_from_checkpoint() {
        return Err(PlacerError::Validation {
            message: "Checkpoint disappeared while resuming".to_string(),
            help: None,
        });
    }
    // The restore replaced the config with persisted values; flags still win.
    args.session.apply_to(engine.config_mut());

    drive(&mut engine, &args.session, &profile, printer)
}

fn build_engine(
    profile: &Profile,
    session: &SessionArgs,
    queue: &TaskQueue,
    config: SessionConfig,
) -> Result<SimEngine> {
    let shared_brush = brush();

    let palette = match &session.palette {
        Some(path) => FixedPalette::from_yaml(path, shared_brush.clone())?,
        None => FixedPalette::empty(shared_brush.clone()),
    };

    let (width, height) = canvas_extent(queue, &config, session);
    let surface = PngSurface::new(width, height, shared_brush);

    let store = CheckpointStore::new(FileStore::new(&profile.store_dir));

    let mut engine = Engine::new(surface, palette, SystemClock, store, config);
    if session.manual {
        engine.set_auto_colour(false);
    }
    engine.set_step_limit(session.limit);
    Ok(engine)
}

fn drive(
    engine: &mut SimEngine,
    session: &SessionArgs,
    profile: &Profile,
    printer: &Printer,
) -> Result<()> {
    let advisory_printer = Printer::new();
    engine.set_advisor(move |message| advisory_printer.warning("Advisory", message));

    let out = session
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&profile.out));

    let result = engine.run();
    save_canvas(engine.surface(), &out, printer);

    let report = result?;
    print_report(&report, printer);
    Ok(())
}

fn save_canvas(surface: &PngSurface, out: &Path, printer: &Printer) {
    // Best-effort even after a failed run; the canvas shows how far it got.
    match surface.save(out) {
        Ok(()) => printer.info("Saved", &display_path(out)),
        Err(e) => printer.error("Failed", &format!("could not save canvas: {}", e)),
    }
}

fn print_report(report: &RunReport, printer: &Printer) {
    let summary = format!(
        "{} placed, {} skipped, {} remaining",
        report.placed, report.skipped, report.remaining
    );
    match report.state {
        RunState::Finished => printer.status("Finished", &summary),
        RunState::Stopped => printer.warning(
            "Stopped",
            &format!("{} ({})", summary, plural(report.remaining, "task checkpointed", "tasks checkpointed")),
        ),
        _ => printer.info("Done", &summary),
    }
}

/// Size the simulated canvas to cover every device coordinate the plan can
/// touch, unless overridden.
fn canvas_extent(queue: &TaskQueue, config: &SessionConfig, session: &SessionArgs) -> (u32, u32) {
    let (cell_w, cell_h) = config.effective_cell();
    let max_x = queue.iter().map(|t| t.x).max().unwrap_or(0);
    let max_y = queue.iter().map(|t| t.y).max().unwrap_or(0);

    let width = config.start_x + (max_x as i64 + 1) * cell_w as i64;
    let height = config.start_y + (max_y as i64 + 1) * cell_h as i64;

    (
        session.canvas_width.unwrap_or(width.max(1) as u32),
        session.canvas_height.unwrap_or(height.max(1) as u32),
    )
}

fn report_plan_warnings(queue: &TaskQueue, config: &SessionConfig, printer: &Printer) {
    for diagnostic in check_plan(queue, config) {
        printer.warning("Plan", &diagnostic.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Colour, PixelTask};

    fn no_overrides() -> SessionArgs {
        SessionArgs {
            palette: None,
            out: None,
            start_x: None,
            start_y: None,
            delay: None,
            mode: None,
            cell_width: None,
            cell_height: None,
            limit: None,
            no_delay: false,
            manual: false,
            canvas_width: None,
            canvas_height: None,
        }
    }

    #[test]
    fn test_canvas_extent_covers_plan() {
        let queue = TaskQueue::from_tasks([PixelTask::new(4, 2, Colour::BLACK)]);
        let config = SessionConfig {
            start_x: 10,
            start_y: 20,
            ..SessionConfig::default()
        };

        let (w, h) = canvas_extent(&queue, &config, &no_overrides());
        assert_eq!((w, h), (15, 23));
    }

    #[test]
    fn test_canvas_extent_with_cells() {
        let queue = TaskQueue::from_tasks([PixelTask::new(1, 1, Colour::BLACK)]);
        let config = SessionConfig {
            cell_width: Some(10),
            cell_height: Some(10),
            ..SessionConfig::default()
        };

        let (w, h) = canvas_extent(&queue, &config, &no_overrides());
        assert_eq!((w, h), (20, 20));
    }

    #[test]
    fn test_canvas_extent_override_wins() {
        let queue = TaskQueue::from_tasks([PixelTask::new(100, 100, Colour::BLACK)]);
        let mut session = no_overrides();
        session.canvas_width = Some(32);
        session.canvas_height = Some(16);

        let (w, h) = canvas_extent(&queue, &SessionConfig::default(), &session);
        assert_eq!((w, h), (32, 16));
    }

    #[test]
    fn test_cell_overrides_apply_independently() {
        // A restored config carries persisted calibration; overriding one
        // dimension must keep the other, same as on the run path.
        let mut config = SessionConfig {
            cell_width: Some(8),
            cell_height: Some(6),
            ..SessionConfig::default()
        };
        let mut session = no_overrides();
        session.cell_width = Some(4);

        session.apply_to(&mut config);
        assert_eq!(config.cell_width, Some(4));
        assert_eq!(config.cell_height, Some(6));
    }

    #[test]
    fn test_session_args_apply_overrides() {
        let mut config = SessionConfig::default();
        let mut session = no_overrides();
        session.start_x = Some(7);
        session.delay = Some(50);
        session.mode = Some(LockedMode::Map);
        session.no_delay = true;

        session.apply_to(&mut config);
        assert_eq!(config.start_x, 7);
        assert_eq!(config.delay_ms, 0, "--no-delay beats --delay");
        assert_eq!(config.locked_mode, LockedMode::Map);
    }
}
