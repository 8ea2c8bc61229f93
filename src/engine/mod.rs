//! Sequential drawing state machine.
//!
//! One engine drives one session: it walks the task queue front to back,
//! resolves each task's colour against the palette snapshot, maps logical
//! coordinates onto the calibrated device grid, and checkpoints the
//! remaining queue as it goes. Execution is single-threaded and
//! cooperative; every suspension is an explicit [`Clock::sleep`] and a stop
//! request is only observed between tasks, never mid-step.

pub mod clock;
pub mod resolve;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::error::{PlacerError, Result};
use crate::host::{KvStore, PaletteSource, Surface};
use crate::types::{LockedMode, PaletteSnapshot, PixelTask, SessionConfig, TaskQueue};

pub use clock::{Clock, InstantClock, SystemClock};
pub use resolve::{resolve, Resolution};

/// Pause after selecting a swatch, letting the host UI commit the selection
/// before the placement lands.
const SETTLE: Duration = Duration::from_millis(300);

/// Minimal yield after a skipped task, instead of the full inter-task delay.
const SKIP_YIELD: Duration = Duration::from_millis(1);

/// Lifecycle of a drawing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Stopped,
    Finished,
}

/// Cooperative stop flag for a running engine.
///
/// Requesting a stop takes effect at the top of the next iteration; the
/// in-flight step always completes.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Summary of one `run` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Tasks that resulted in a placement.
    pub placed: usize,
    /// Tasks advanced past without a placement (locked colour, skip mode).
    pub skipped: usize,
    /// State the engine ended in.
    pub state: RunState,
    /// Tasks still ahead of the cursor.
    pub remaining: usize,
}

enum StepOutcome {
    Placed,
    Skipped,
}

/// The drawing engine. Owns one session's queue, cursor, and run state.
pub struct Engine<S, P, K, C>
where
    S: Surface,
    P: PaletteSource,
    K: KvStore,
    C: Clock,
{
    surface: S,
    palette_source: P,
    clock: C,
    store: CheckpointStore<K>,
    config: SessionConfig,
    queue: TaskQueue,
    cursor: usize,
    total: usize,
    state: RunState,
    auto_colour: bool,
    palette: PaletteSnapshot,
    stop: StopHandle,
    step_limit: Option<usize>,
    advisor: Option<Box<dyn FnMut(&str)>>,
    advised_uncalibrated: bool,
    advised_manual: bool,
}

impl<S, P, K, C> Engine<S, P, K, C>
where
    S: Surface,
    P: PaletteSource,
    K: KvStore,
    C: Clock,
{
    pub fn new(
        surface: S,
        palette_source: P,
        clock: C,
        store: CheckpointStore<K>,
        config: SessionConfig,
    ) -> Self {
        Self {
            surface,
            palette_source,
            clock,
            store,
            config,
            queue: TaskQueue::default(),
            cursor: 0,
            total: 0,
            state: RunState::Idle,
            auto_colour: true,
            palette: PaletteSnapshot::new(),
            stop: StopHandle::default(),
            step_limit: None,
            advisor: None,
            advised_uncalibrated: false,
            advised_manual: false,
        }
    }

    /// Route one-time advisories (manual downgrade, uncalibrated grid) to
    /// the caller. The engine stays silent without one.
    pub fn set_advisor(&mut self, advisor: impl FnMut(&str) + 'static) {
        self.advisor = Some(Box::new(advisor));
    }

    /// Replace the task queue wholesale and reset the session to `Idle`.
    pub fn load_queue(&mut self, queue: TaskQueue) {
        self.total = queue.len();
        self.queue = queue;
        self.cursor = 0;
        self.state = RunState::Idle;
    }

    /// Restore queue and configuration from the checkpoint slot.
    ///
    /// Returns `false` when no usable checkpoint exists; the session is
    /// left untouched in that case. The locked-colour mode is not part of
    /// the persisted schema and keeps its current value.
    pub fn restore_from_checkpoint(&mut self) -> bool {
        let Some(checkpoint) = self.store.load() else {
            return false;
        };

        checkpoint.apply_to(&mut self.config);
        self.total = checkpoint.total_tasks;
        self.queue = TaskQueue::from_tasks(checkpoint.remaining_queue);
        self.cursor = 0;
        self.state = RunState::Idle;
        true
    }

    /// Replace the palette snapshot with a fresh scan.
    ///
    /// Safe mid-run because reads and rescans share the single worker.
    pub fn rescan_palette(&mut self) {
        self.palette.replace(self.palette_source.scan());
    }

    /// Enable or disable automatic colour selection.
    pub fn set_auto_colour(&mut self, enabled: bool) {
        self.auto_colour = enabled;
    }

    pub fn auto_colour(&self) -> bool {
        self.auto_colour
    }

    pub fn set_start(&mut self, x: i64, y: i64) {
        self.config.start_x = x;
        self.config.start_y = y;
    }

    pub fn set_delay_ms(&mut self, delay_ms: u64) {
        self.config.delay_ms = delay_ms;
    }

    pub fn set_locked_mode(&mut self, mode: LockedMode) {
        self.config.locked_mode = mode;
    }

    /// Record the device-pixel size of one logical drawing cell.
    pub fn calibrate(&mut self, cell_width: u32, cell_height: u32) {
        self.config.cell_width = Some(cell_width);
        self.config.cell_height = Some(cell_height);
    }

    /// Cooperatively stop the run after this many attempted tasks.
    pub fn set_step_limit(&mut self, limit: Option<usize>) {
        self.step_limit = limit;
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn remaining(&self) -> usize {
        self.queue.len() - self.cursor
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Mutable session configuration, for applying overrides after a
    /// checkpoint restore has replaced the config.
    pub fn config_mut(&mut self) -> &mut SessionConfig {
        &mut self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn store(&self) -> &CheckpointStore<K> {
        &self.store
    }

    /// Drive the queue to completion, a stop request, or a failure.
    ///
    /// Preconditions: a non-empty queue and a locatable surface. Calling
    /// while already `Running` is a no-op that only emits an advisory.
    pub fn run(&mut self) -> Result<RunReport> {
        if self.state == RunState::Running {
            self.advise("start ignored: a run is already in progress");
            return Ok(self.report(0, 0));
        }

        if self.remaining() == 0 {
            return Err(PlacerError::Validation {
                message: "No tasks to draw".to_string(),
                help: Some("Load an image, matrix, or task list first".to_string()),
            });
        }

        if !self.surface.locate()? {
            return Err(PlacerError::Surface {
                message: "Drawable surface not located".to_string(),
                help: None,
            });
        }

        self.stop.reset();
        self.state = RunState::Running;

        if self.auto_colour {
            self.rescan_palette();
            if self.palette.is_empty() {
                self.downgrade_to_manual(
                    "palette is empty; continuing in manual colour mode",
                );
            }
        }

        if !self.config.calibrated() && !self.advised_uncalibrated {
            self.advised_uncalibrated = true;
            self.advise("grid uncalibrated; assuming 1x1 cells, placements may not align");
        }

        let mut placed = 0usize;
        let mut skipped = 0usize;
        let mut attempted = 0usize;

        while let Some(task) = self.queue.get(self.cursor).copied() {
            let limit_reached = self.step_limit.is_some_and(|limit| attempted >= limit);
            if self.stop.is_requested() || limit_reached {
                self.state = RunState::Stopped;
                self.save_checkpoint();
                return Ok(self.report(placed, skipped));
            }

            let outcome = match self.step(task) {
                Ok(outcome) => outcome,
                Err(e) => {
                    // Leave the failed task at the head of the remainder.
                    self.state = RunState::Stopped;
                    self.save_checkpoint();
                    return Err(e);
                }
            };

            self.cursor += 1;
            attempted += 1;

            match outcome {
                StepOutcome::Placed => placed += 1,
                StepOutcome::Skipped => skipped += 1,
            }

            if self.config.autosave_every > 0 && self.cursor % self.config.autosave_every == 0 {
                self.save_checkpoint();
            }

            if matches!(outcome, StepOutcome::Placed) {
                self.clock.sleep(Duration::from_millis(self.config.delay_ms));
            }
        }

        self.state = RunState::Finished;
        self.store.clear();
        Ok(self.report(placed, skipped))
    }

    /// Execute one task: resolve its colour, then place (or skip).
    fn step(&mut self, task: PixelTask) -> Result<StepOutcome> {
        let (cell_w, cell_h) = self.config.effective_cell();
        let device_x =
            self.config.start_x + task.x as i64 * cell_w as i64 + cell_w as i64 / 2;
        let device_y =
            self.config.start_y + task.y as i64 * cell_h as i64 + cell_h as i64 / 2;

        if self.auto_colour {
            match resolve(&self.palette, task.colour, self.config.locked_mode) {
                Resolution::Skip => {
                    self.clock.sleep(SKIP_YIELD);
                    return Ok(StepOutcome::Skipped);
                }
                Resolution::Selected(entry) => {
                    self.palette_source.select(entry.id)?;
                    self.clock.sleep(SETTLE);
                }
                Resolution::DeferToManual => {
                    self.downgrade_to_manual(
                        "no selectable swatch; continuing in manual colour mode",
                    );
                }
            }
        }

        // Manual mode places with whatever colour is active externally.
        self.surface.place(device_x, device_y)?;
        Ok(StepOutcome::Placed)
    }

    fn save_checkpoint(&mut self) {
        let checkpoint = Checkpoint::new(
            &self.config,
            self.queue.remaining_from(self.cursor),
            self.total,
            self.clock.now_millis(),
        );
        self.store.save(&checkpoint);
    }

    fn downgrade_to_manual(&mut self, message: &str) {
        if self.auto_colour {
            self.auto_colour = false;
            if !self.advised_manual {
                self.advised_manual = true;
                self.advise(message);
            }
        }
    }

    fn advise(&mut self, message: &str) {
        if let Some(advisor) = &mut self.advisor {
            advisor(message);
        }
    }

    fn report(&self, placed: usize, skipped: usize) -> RunReport {
        RunReport {
            placed,
            skipped,
            state: self.state,
            remaining: self.remaining(),
        }
    }
}
